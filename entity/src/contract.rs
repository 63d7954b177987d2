use sea_orm::entity::prelude::*;

/// Lifecycle status of a courier contract.
///
/// The lattice is monotonically terminal: everything past `InProgress` is a final
/// state, and a synced contract is never expected to move back out of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum ContractStatus {
    #[sea_orm(string_value = "outstanding")]
    Outstanding,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "finished_issuer")]
    FinishedIssuer,
    #[sea_orm(string_value = "finished_contractor")]
    FinishedContractor,
    #[sea_orm(string_value = "finished")]
    Finished,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "deleted")]
    Deleted,
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

impl ContractStatus {
    /// Parses the status string used by the remote contract API.
    pub fn from_esi(status: &str) -> Option<Self> {
        match status {
            "outstanding" => Some(Self::Outstanding),
            "in_progress" => Some(Self::InProgress),
            "finished_issuer" => Some(Self::FinishedIssuer),
            "finished_contractor" => Some(Self::FinishedContractor),
            "finished" => Some(Self::Finished),
            // ESI spells it with a double l
            "cancelled" | "canceled" => Some(Self::Canceled),
            "rejected" => Some(Self::Rejected),
            "failed" => Some(Self::Failed),
            "deleted" => Some(Self::Deleted),
            "reversed" => Some(Self::Reversed),
            _ => None,
        }
    }

    /// Whether the status is a final state the contract cannot leave.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Outstanding | Self::InProgress)
    }
}

/// Local mirror of one remote courier contract, keyed by (handler, contract_id).
///
/// All columns are overwritten from the remote payload on every sync except
/// `pricing_id` and `issues` (owned by pricing reconciliation) and `date_notified`
/// (owned by notification dispatch).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contract")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub handler_id: i32,
    /// Remote contract ID, unique together with `handler_id`
    pub contract_id: i64,
    pub status: ContractStatus,
    pub issuer_character_id: i32,
    pub issuer_corporation_id: i32,
    pub acceptor_character_id: Option<i32>,
    pub acceptor_corporation_id: Option<i32>,
    pub start_location_id: i32,
    pub end_location_id: i32,
    pub collateral: f64,
    pub reward: f64,
    pub volume: f64,
    pub days_to_complete: i32,
    pub date_issued: DateTime,
    pub date_expired: DateTime,
    pub date_accepted: Option<DateTime>,
    pub date_completed: Option<DateTime>,
    pub title: Option<String>,
    /// Matched pricing rule; `None` means no active route covers this contract
    pub pricing_id: Option<i32>,
    /// JSON list of price-check failures; `None` = not yet evaluated, `"[]"` = passed
    pub issues: Option<String>,
    /// When the operator audience was notified; `None` = not yet notified
    pub date_notified: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract_handler::Entity",
        from = "Column::HandlerId",
        to = "super::contract_handler::Column::Id"
    )]
    Handler,
    #[sea_orm(
        belongs_to = "super::eve_character::Entity",
        from = "Column::IssuerCharacterId",
        to = "super::eve_character::Column::Id"
    )]
    IssuerCharacter,
    #[sea_orm(
        belongs_to = "super::eve_corporation::Entity",
        from = "Column::IssuerCorporationId",
        to = "super::eve_corporation::Column::Id"
    )]
    IssuerCorporation,
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
    #[sea_orm(
        belongs_to = "super::pricing::Entity",
        from = "Column::PricingId",
        to = "super::pricing::Column::Id"
    )]
    Pricing,
}

impl ActiveModelBehavior for ActiveModel {}
