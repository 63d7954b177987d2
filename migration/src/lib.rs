pub use sea_orm_migration::prelude::*;

mod m20260815_000001_eve_character;
mod m20260815_000002_eve_corporation;
mod m20260815_000003_location;
mod m20260815_000004_pricing;
mod m20260815_000005_contract_handler;
mod m20260815_000006_contract;
mod m20260815_000007_contract_notification;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_eve_character::Migration),
            Box::new(m20260815_000002_eve_corporation::Migration),
            Box::new(m20260815_000003_location::Migration),
            Box::new(m20260815_000004_pricing::Migration),
            Box::new(m20260815_000005_contract_handler::Migration),
            Box::new(m20260815_000006_contract::Migration),
            Box::new(m20260815_000007_contract_notification::Migration),
        ]
    }
}
