use chrono::{NaiveDateTime, Utc};
use entity::contract::ContractStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};
use tracing::warn;

/// Remote-owned fields of a contract, mapped to local row ids. Everything here is
/// overwritten on every sync; `pricing_id`, `issues`, and `date_notified` are
/// deliberately absent because they belong to the reconciliation and notification
/// stages.
#[derive(Debug, Clone)]
pub struct ContractUpsert {
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
    pub date_issued: NaiveDateTime,
    pub date_expired: NaiveDateTime,
    pub date_accepted: Option<NaiveDateTime>,
    pub date_completed: Option<NaiveDateTime>,
    pub title: Option<String>,
}

/// Totals over the outstanding contract set, shown to operators after a sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractSummary {
    pub contracts: usize,
    pub reward: f64,
    pub volume: f64,
    pub collateral: f64,
}

pub struct ContractRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ContractRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get_by_handler_and_contract_id(
        &self,
        handler_id: i32,
        contract_id: i64,
    ) -> Result<Option<entity::contract::Model>, DbErr> {
        entity::prelude::Contract::find()
            .filter(entity::contract::Column::HandlerId.eq(handler_id))
            .filter(entity::contract::Column::ContractId.eq(contract_id))
            .one(self.db)
            .await
    }

    /// Creates or updates the local mirror of one remote contract.
    ///
    /// Returns the stored model and whether a new row was created. On update the
    /// locally owned columns (`pricing_id`, `issues`, `date_notified`) are left
    /// untouched, and a terminal status is never regressed to a non-terminal one:
    /// stale remote data keeps the local status and logs a warning.
    pub async fn upsert(
        &self,
        handler_id: i32,
        update: ContractUpsert,
    ) -> Result<(entity::contract::Model, bool), DbErr> {
        let existing = self
            .get_by_handler_and_contract_id(handler_id, update.contract_id)
            .await?;

        let Some(existing) = existing else {
            let contract = entity::contract::ActiveModel {
                handler_id: ActiveValue::Set(handler_id),
                contract_id: ActiveValue::Set(update.contract_id),
                status: ActiveValue::Set(update.status),
                issuer_character_id: ActiveValue::Set(update.issuer_character_id),
                issuer_corporation_id: ActiveValue::Set(update.issuer_corporation_id),
                acceptor_character_id: ActiveValue::Set(update.acceptor_character_id),
                acceptor_corporation_id: ActiveValue::Set(update.acceptor_corporation_id),
                start_location_id: ActiveValue::Set(update.start_location_id),
                end_location_id: ActiveValue::Set(update.end_location_id),
                collateral: ActiveValue::Set(update.collateral),
                reward: ActiveValue::Set(update.reward),
                volume: ActiveValue::Set(update.volume),
                days_to_complete: ActiveValue::Set(update.days_to_complete),
                date_issued: ActiveValue::Set(update.date_issued),
                date_expired: ActiveValue::Set(update.date_expired),
                date_accepted: ActiveValue::Set(update.date_accepted),
                date_completed: ActiveValue::Set(update.date_completed),
                title: ActiveValue::Set(update.title),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            };

            return Ok((contract.insert(self.db).await?, true));
        };

        let status = if existing.status.is_terminal() && !update.status.is_terminal() {
            warn!(
                "contract {} status regression rejected: {:?} -> {:?}",
                update.contract_id, existing.status, update.status
            );
            existing.status
        } else {
            update.status
        };

        let mut contract = existing.into_active_model();
        contract.status = ActiveValue::Set(status);
        contract.issuer_character_id = ActiveValue::Set(update.issuer_character_id);
        contract.issuer_corporation_id = ActiveValue::Set(update.issuer_corporation_id);
        contract.acceptor_character_id = ActiveValue::Set(update.acceptor_character_id);
        contract.acceptor_corporation_id = ActiveValue::Set(update.acceptor_corporation_id);
        contract.start_location_id = ActiveValue::Set(update.start_location_id);
        contract.end_location_id = ActiveValue::Set(update.end_location_id);
        contract.collateral = ActiveValue::Set(update.collateral);
        contract.reward = ActiveValue::Set(update.reward);
        contract.volume = ActiveValue::Set(update.volume);
        contract.days_to_complete = ActiveValue::Set(update.days_to_complete);
        contract.date_issued = ActiveValue::Set(update.date_issued);
        contract.date_expired = ActiveValue::Set(update.date_expired);
        contract.date_accepted = ActiveValue::Set(update.date_accepted);
        contract.date_completed = ActiveValue::Set(update.date_completed);
        contract.title = ActiveValue::Set(update.title);
        contract.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok((contract.update(self.db).await?, false))
    }

    /// Contracts the pricing reconciliation pass must look at: everything still
    /// outstanding plus anything never evaluated.
    pub async fn needing_pricing_update(
        &self,
        handler_id: i32,
    ) -> Result<Vec<entity::contract::Model>, DbErr> {
        entity::prelude::Contract::find()
            .filter(entity::contract::Column::HandlerId.eq(handler_id))
            .filter(
                Condition::any()
                    .add(entity::contract::Column::Status.eq(ContractStatus::Outstanding))
                    .add(entity::contract::Column::PricingId.is_null()),
            )
            .order_by_asc(entity::contract::Column::Id)
            .all(self.db)
            .await
    }

    /// Contracts in any of the given statuses that have a pricing rule assigned.
    pub async fn by_statuses_with_pricing(
        &self,
        handler_id: i32,
        statuses: &[ContractStatus],
    ) -> Result<Vec<entity::contract::Model>, DbErr> {
        entity::prelude::Contract::find()
            .filter(entity::contract::Column::HandlerId.eq(handler_id))
            .filter(entity::contract::Column::Status.is_in(statuses.iter().copied()))
            .filter(entity::contract::Column::PricingId.is_not_null())
            .order_by_asc(entity::contract::Column::DateIssued)
            .all(self.db)
            .await
    }

    /// Writes the reconciliation outcome. Only this method touches `pricing_id`
    /// and `issues`.
    pub async fn set_pricing(
        &self,
        contract: entity::contract::Model,
        pricing_id: Option<i32>,
        issues: Option<String>,
    ) -> Result<entity::contract::Model, DbErr> {
        let mut contract = contract.into_active_model();
        contract.pricing_id = ActiveValue::Set(pricing_id);
        contract.issues = ActiveValue::Set(issues);
        contract.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        contract.update(self.db).await
    }

    /// Stamps the operator notification timestamp. Only this method touches
    /// `date_notified`.
    pub async fn stamp_notified(
        &self,
        contract: entity::contract::Model,
        notified_at: NaiveDateTime,
    ) -> Result<entity::contract::Model, DbErr> {
        let mut contract = contract.into_active_model();
        contract.date_notified = ActiveValue::Set(Some(notified_at));
        contract.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        contract.update(self.db).await
    }

    /// Whether the customer audience was already notified for this contract in
    /// this status.
    pub async fn customer_notified(
        &self,
        contract_id: i32,
        status: ContractStatus,
    ) -> Result<bool, DbErr> {
        let found = entity::prelude::ContractNotification::find()
            .filter(entity::contract_notification::Column::ContractId.eq(contract_id))
            .filter(entity::contract_notification::Column::Status.eq(status))
            .one(self.db)
            .await?;

        Ok(found.is_some())
    }

    pub async fn record_customer_notification(
        &self,
        contract_id: i32,
        status: ContractStatus,
        notified_at: NaiveDateTime,
    ) -> Result<entity::contract_notification::Model, DbErr> {
        let notification = entity::contract_notification::ActiveModel {
            contract_id: ActiveValue::Set(contract_id),
            status: ActiveValue::Set(status),
            date_notified: ActiveValue::Set(notified_at),
            ..Default::default()
        };

        notification.insert(self.db).await
    }

    /// Totals over the handler's outstanding contracts. Contract volume is bounded
    /// by alliance activity, so folding in memory is fine.
    pub async fn outstanding_summary(&self, handler_id: i32) -> Result<ContractSummary, DbErr> {
        let outstanding = entity::prelude::Contract::find()
            .filter(entity::contract::Column::HandlerId.eq(handler_id))
            .filter(entity::contract::Column::Status.eq(ContractStatus::Outstanding))
            .all(self.db)
            .await?;

        let mut summary = ContractSummary {
            contracts: outstanding.len(),
            ..Default::default()
        };
        for contract in &outstanding {
            summary.reward += contract.reward;
            summary.volume += contract.volume;
            summary.collateral += contract.collateral;
        }

        Ok(summary)
    }
}
