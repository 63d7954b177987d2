use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260815_000001_eve_character::EveCharacter;

static FK_CONTRACT_HANDLER_CHARACTER_ID: &str = "fk_contract_handler_character_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContractHandler::Table)
                    .if_not_exists()
                    .col(pk_auto(ContractHandler::Id))
                    .col(big_integer_uniq(ContractHandler::OrganizationId))
                    .col(string(ContractHandler::OrganizationName))
                    .col(string_len(ContractHandler::OrganizationCategory, 16))
                    .col(string_len(ContractHandler::OperationMode, 24))
                    .col(integer_null(ContractHandler::CharacterId))
                    .col(string_null(ContractHandler::VersionHash))
                    .col(timestamp_null(ContractHandler::LastSyncAt))
                    .col(string_len(ContractHandler::LastError, 32))
                    .col(timestamp(ContractHandler::CreatedAt))
                    .col(timestamp(ContractHandler::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONTRACT_HANDLER_CHARACTER_ID)
                    .from_tbl(ContractHandler::Table)
                    .from_col(ContractHandler::CharacterId)
                    .to_tbl(EveCharacter::Table)
                    .to_col(EveCharacter::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContractHandler::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ContractHandler {
    Table,
    Id,
    OrganizationId,
    OrganizationName,
    OrganizationCategory,
    OperationMode,
    CharacterId,
    VersionHash,
    LastSyncAt,
    LastError,
    CreatedAt,
    UpdatedAt,
}
