use sea_orm::entity::prelude::*;

/// A priced courier route between two locations.
///
/// The (start, end) pair is unique. When `is_bidirectional` is set the route also
/// matches contracts running in the reverse direction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pricing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub start_location_id: i32,
    pub end_location_id: i32,
    pub is_active: bool,
    pub is_bidirectional: bool,
    /// Fixed price component in ISK
    pub price_base: f64,
    /// Total price floor in ISK, applied after all other components
    pub price_min: Option<f64>,
    /// ISK per m3 of volume
    pub price_per_volume: Option<f64>,
    /// ISK per percent of collateral
    pub price_per_collateral_percent: Option<f64>,
    pub collateral_min: Option<f64>,
    pub collateral_max: Option<f64>,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    /// Recommended expiration period in days
    pub days_to_expire: Option<i32>,
    /// Recommended completion period in days
    pub days_to_complete: Option<i32>,
    /// Free-text instructions shown to contract issuers
    pub details: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::StartLocationId",
        to = "super::location::Column::Id"
    )]
    StartLocation,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::EndLocationId",
        to = "super::location::Column::Id"
    )]
    EndLocation,
}

impl ActiveModelBehavior for ActiveModel {}
