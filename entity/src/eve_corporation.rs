use sea_orm::entity::prelude::*;

/// Shadow record for an EVE Online corporation, created on first sight from ESI.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "eve_corporation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// EVE Online corporation ID
    #[sea_orm(unique)]
    pub corporation_id: i64,
    /// EVE Online ID of the corporation's alliance, if any
    pub alliance_id: Option<i64>,
    pub name: String,
    pub ticker: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
