use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(pk_auto(Location::Id))
                    .col(big_integer_uniq(Location::LocationId))
                    .col(string(Location::Name))
                    .col(big_integer_null(Location::SolarSystemId))
                    .col(big_integer_null(Location::TypeId))
                    .col(string_len(Location::Category, 16))
                    .col(timestamp(Location::CreatedAt))
                    .col(timestamp(Location::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Location {
    Table,
    Id,
    LocationId,
    Name,
    SolarSystemId,
    TypeId,
    Category,
    CreatedAt,
    UpdatedAt,
}
