use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260815_000003_location::Location;

static IDX_PRICING_ROUTE: &str = "idx_pricing_start_end_location_id";
static FK_PRICING_START_LOCATION_ID: &str = "fk_pricing_start_location_id";
static FK_PRICING_END_LOCATION_ID: &str = "fk_pricing_end_location_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pricing::Table)
                    .if_not_exists()
                    .col(pk_auto(Pricing::Id))
                    .col(integer(Pricing::StartLocationId))
                    .col(integer(Pricing::EndLocationId))
                    .col(boolean(Pricing::IsActive))
                    .col(boolean(Pricing::IsBidirectional))
                    .col(double(Pricing::PriceBase))
                    .col(double_null(Pricing::PriceMin))
                    .col(double_null(Pricing::PricePerVolume))
                    .col(double_null(Pricing::PricePerCollateralPercent))
                    .col(double_null(Pricing::CollateralMin))
                    .col(double_null(Pricing::CollateralMax))
                    .col(double_null(Pricing::VolumeMin))
                    .col(double_null(Pricing::VolumeMax))
                    .col(integer_null(Pricing::DaysToExpire))
                    .col(integer_null(Pricing::DaysToComplete))
                    .col(text_null(Pricing::Details))
                    .col(timestamp(Pricing::CreatedAt))
                    .col(timestamp(Pricing::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PRICING_ROUTE)
                    .table(Pricing::Table)
                    .col(Pricing::StartLocationId)
                    .col(Pricing::EndLocationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PRICING_START_LOCATION_ID)
                    .from_tbl(Pricing::Table)
                    .from_col(Pricing::StartLocationId)
                    .to_tbl(Location::Table)
                    .to_col(Location::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PRICING_END_LOCATION_ID)
                    .from_tbl(Pricing::Table)
                    .from_col(Pricing::EndLocationId)
                    .to_tbl(Location::Table)
                    .to_col(Location::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pricing::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Pricing {
    Table,
    Id,
    StartLocationId,
    EndLocationId,
    IsActive,
    IsBidirectional,
    PriceBase,
    PriceMin,
    PricePerVolume,
    PricePerCollateralPercent,
    CollateralMin,
    CollateralMax,
    VolumeMin,
    VolumeMax,
    DaysToExpire,
    DaysToComplete,
    Details,
    CreatedAt,
    UpdatedAt,
}
