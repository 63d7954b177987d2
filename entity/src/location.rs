use sea_orm::entity::prelude::*;

/// Kind of place a courier contract can start or end at.
///
/// `Unknown` is a valid terminal category for player structures the service has no
/// docking access to; such locations keep a placeholder name until an operator with
/// access re-resolves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LocationCategory {
    #[sea_orm(string_value = "station")]
    Station,
    #[sea_orm(string_value = "structure")]
    Structure,
    #[sea_orm(string_value = "unknown")]
    Unknown,
}

/// A station or player structure contracts start/end at, created lazily on first
/// reference and never deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Remote location ID (station or structure ID), immutable once created
    #[sea_orm(unique)]
    pub location_id: i64,
    pub name: String,
    pub solar_system_id: Option<i64>,
    pub type_id: Option<i64>,
    pub category: LocationCategory,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
