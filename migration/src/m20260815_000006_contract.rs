use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260815_000001_eve_character::EveCharacter, m20260815_000002_eve_corporation::EveCorporation,
    m20260815_000003_location::Location, m20260815_000004_pricing::Pricing,
    m20260815_000005_contract_handler::ContractHandler,
};

static IDX_CONTRACT_HANDLER_CONTRACT_ID: &str = "idx_contract_handler_id_contract_id";
static IDX_CONTRACT_STATUS: &str = "idx_contract_status";
static FK_CONTRACT_HANDLER_ID: &str = "fk_contract_handler_id";
static FK_CONTRACT_ISSUER_CHARACTER_ID: &str = "fk_contract_issuer_character_id";
static FK_CONTRACT_ISSUER_CORPORATION_ID: &str = "fk_contract_issuer_corporation_id";
static FK_CONTRACT_ACCEPTOR_CHARACTER_ID: &str = "fk_contract_acceptor_character_id";
static FK_CONTRACT_ACCEPTOR_CORPORATION_ID: &str = "fk_contract_acceptor_corporation_id";
static FK_CONTRACT_START_LOCATION_ID: &str = "fk_contract_start_location_id";
static FK_CONTRACT_END_LOCATION_ID: &str = "fk_contract_end_location_id";
static FK_CONTRACT_PRICING_ID: &str = "fk_contract_pricing_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contract::Table)
                    .if_not_exists()
                    .col(pk_auto(Contract::Id))
                    .col(integer(Contract::HandlerId))
                    .col(big_integer(Contract::ContractId))
                    .col(string_len(Contract::Status, 24))
                    .col(integer(Contract::IssuerCharacterId))
                    .col(integer(Contract::IssuerCorporationId))
                    .col(integer_null(Contract::AcceptorCharacterId))
                    .col(integer_null(Contract::AcceptorCorporationId))
                    .col(integer(Contract::StartLocationId))
                    .col(integer(Contract::EndLocationId))
                    .col(double(Contract::Collateral))
                    .col(double(Contract::Reward))
                    .col(double(Contract::Volume))
                    .col(integer(Contract::DaysToComplete))
                    .col(timestamp(Contract::DateIssued))
                    .col(timestamp(Contract::DateExpired))
                    .col(timestamp_null(Contract::DateAccepted))
                    .col(timestamp_null(Contract::DateCompleted))
                    .col(string_null(Contract::Title))
                    .col(integer_null(Contract::PricingId))
                    .col(text_null(Contract::Issues))
                    .col(timestamp_null(Contract::DateNotified))
                    .col(timestamp(Contract::CreatedAt))
                    .col(timestamp(Contract::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONTRACT_HANDLER_CONTRACT_ID)
                    .table(Contract::Table)
                    .col(Contract::HandlerId)
                    .col(Contract::ContractId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONTRACT_STATUS)
                    .table(Contract::Table)
                    .col(Contract::Status)
                    .to_owned(),
            )
            .await?;

        for (name, from_col, to_tbl, to_col) in [
            (
                FK_CONTRACT_HANDLER_ID,
                Contract::HandlerId,
                ContractHandler::Table.into_iden(),
                ContractHandler::Id.into_iden(),
            ),
            (
                FK_CONTRACT_ISSUER_CHARACTER_ID,
                Contract::IssuerCharacterId,
                EveCharacter::Table.into_iden(),
                EveCharacter::Id.into_iden(),
            ),
            (
                FK_CONTRACT_ISSUER_CORPORATION_ID,
                Contract::IssuerCorporationId,
                EveCorporation::Table.into_iden(),
                EveCorporation::Id.into_iden(),
            ),
            (
                FK_CONTRACT_ACCEPTOR_CHARACTER_ID,
                Contract::AcceptorCharacterId,
                EveCharacter::Table.into_iden(),
                EveCharacter::Id.into_iden(),
            ),
            (
                FK_CONTRACT_ACCEPTOR_CORPORATION_ID,
                Contract::AcceptorCorporationId,
                EveCorporation::Table.into_iden(),
                EveCorporation::Id.into_iden(),
            ),
            (
                FK_CONTRACT_START_LOCATION_ID,
                Contract::StartLocationId,
                Location::Table.into_iden(),
                Location::Id.into_iden(),
            ),
            (
                FK_CONTRACT_END_LOCATION_ID,
                Contract::EndLocationId,
                Location::Table.into_iden(),
                Location::Id.into_iden(),
            ),
            (
                FK_CONTRACT_PRICING_ID,
                Contract::PricingId,
                Pricing::Table.into_iden(),
                Pricing::Id.into_iden(),
            ),
        ] {
            manager
                .create_foreign_key(
                    ForeignKey::create()
                        .name(name)
                        .from_tbl(Contract::Table)
                        .from_col(from_col)
                        .to_tbl(to_tbl)
                        .to_col(to_col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contract::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Contract {
    Table,
    Id,
    HandlerId,
    ContractId,
    Status,
    IssuerCharacterId,
    IssuerCorporationId,
    AcceptorCharacterId,
    AcceptorCorporationId,
    StartLocationId,
    EndLocationId,
    Collateral,
    Reward,
    Volume,
    DaysToComplete,
    DateIssued,
    DateExpired,
    DateAccepted,
    DateCompleted,
    Title,
    PricingId,
    Issues,
    DateNotified,
    CreatedAt,
    UpdatedAt,
}
