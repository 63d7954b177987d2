use sea_orm::entity::prelude::*;

/// Whether the synchronized organization is an alliance or a corporation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrganizationCategory {
    #[sea_orm(string_value = "alliance")]
    Alliance,
    #[sea_orm(string_value = "corporation")]
    Corporation,
}

/// Which organizational scope's contracts are visible to the sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum OperationMode {
    /// Contracts assigned alliance-wide to my alliance
    #[sea_orm(string_value = "my_alliance")]
    MyAlliance,
    /// Contracts assigned to my corporation
    #[sea_orm(string_value = "my_corporation")]
    MyCorporation,
    /// Contracts assigned to the sync character's corporation within my alliance
    #[sea_orm(string_value = "corp_in_alliance")]
    CorpInAlliance,
    /// Public contracts assigned to the sync character's corporation
    #[sea_orm(string_value = "corp_public")]
    CorpPublic,
}

impl OperationMode {
    /// Organization category this mode is valid for. A handler whose organization
    /// category disagrees with its mode is a fatal configuration error.
    pub fn required_category(&self) -> OrganizationCategory {
        match self {
            Self::MyAlliance | Self::CorpInAlliance => OrganizationCategory::Alliance,
            Self::MyCorporation | Self::CorpPublic => OrganizationCategory::Corporation,
        }
    }
}

/// Outcome code of the most recent sync run, stored on the handler and shown to
/// operators instead of raw errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum SyncErrorCode {
    #[sea_orm(string_value = "none")]
    None,
    /// No sync character is configured; requires operator action
    #[sea_orm(string_value = "no_character")]
    NoCharacter,
    /// Operation mode inconsistent with the organization type; requires operator action
    #[sea_orm(string_value = "operation_mode_mismatch")]
    OperationModeMismatch,
    /// Stored credential is unusable; resolves once the operator re-authenticates
    #[sea_orm(string_value = "token_invalid")]
    TokenInvalid,
    #[sea_orm(string_value = "token_expired")]
    TokenExpired,
    /// Transient remote failure exhausted its retry budget; retried next run
    #[sea_orm(string_value = "upstream_unavailable")]
    UpstreamUnavailable,
    #[sea_orm(string_value = "unknown")]
    Unknown,
}

/// The one record per synchronized organization. The installation is single-tenant:
/// at most one handler exists system-wide.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contract_handler")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// EVE Online ID of the alliance or corporation being synchronized
    #[sea_orm(unique)]
    pub organization_id: i64,
    pub organization_name: String,
    pub organization_category: OrganizationCategory,
    pub operation_mode: OperationMode,
    /// Designated credential owner for the sync
    pub character_id: Option<i32>,
    /// Content hash of the last-seen filtered contract set
    pub version_hash: Option<String>,
    pub last_sync_at: Option<DateTime>,
    pub last_error: SyncErrorCode,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::eve_character::Entity",
        from = "Column::CharacterId",
        to = "super::eve_character::Column::Id"
    )]
    Character,
}

impl ActiveModelBehavior for ActiveModel {}
