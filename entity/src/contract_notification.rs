use sea_orm::entity::prelude::*;

use super::contract::ContractStatus;

/// Record of a customer-audience notification sent for a contract in a given
/// status. The (contract, status) pair is unique, which is what bounds the customer
/// audience to one message per contract per state.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contract_notification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub status: ContractStatus,
    pub date_notified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id"
    )]
    Contract,
}

impl ActiveModelBehavior for ActiveModel {}
