use sea_orm::entity::prelude::*;

/// Shadow record for an EVE Online character, created on first sight from ESI.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "eve_character")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// EVE Online character ID
    #[sea_orm(unique)]
    pub character_id: i64,
    /// EVE Online ID of the character's corporation
    pub corporation_id: i64,
    pub name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
