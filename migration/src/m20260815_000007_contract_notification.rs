use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260815_000006_contract::Contract;

static IDX_CONTRACT_NOTIFICATION_CONTRACT_STATUS: &str =
    "idx_contract_notification_contract_id_status";
static FK_CONTRACT_NOTIFICATION_CONTRACT_ID: &str = "fk_contract_notification_contract_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContractNotification::Table)
                    .if_not_exists()
                    .col(pk_auto(ContractNotification::Id))
                    .col(integer(ContractNotification::ContractId))
                    .col(string_len(ContractNotification::Status, 24))
                    .col(timestamp(ContractNotification::DateNotified))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CONTRACT_NOTIFICATION_CONTRACT_STATUS)
                    .table(ContractNotification::Table)
                    .col(ContractNotification::ContractId)
                    .col(ContractNotification::Status)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CONTRACT_NOTIFICATION_CONTRACT_ID)
                    .from_tbl(ContractNotification::Table)
                    .from_col(ContractNotification::ContractId)
                    .to_tbl(Contract::Table)
                    .to_col(Contract::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContractNotification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ContractNotification {
    Table,
    Id,
    ContractId,
    Status,
    DateNotified,
}
