use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Field set for creating or replacing a pricing rule. Operators fill the bounds
/// they care about; unset bounds are simply not checked.
#[derive(Debug, Clone)]
pub struct PricingParams {
    pub start_location_id: i32,
    pub end_location_id: i32,
    pub is_active: bool,
    pub is_bidirectional: bool,
    pub price_base: f64,
    pub price_min: Option<f64>,
    pub price_per_volume: Option<f64>,
    pub price_per_collateral_percent: Option<f64>,
    pub collateral_min: Option<f64>,
    pub collateral_max: Option<f64>,
    pub volume_min: Option<f64>,
    pub volume_max: Option<f64>,
    pub days_to_expire: Option<i32>,
    pub days_to_complete: Option<i32>,
    pub details: Option<String>,
}

impl Default for PricingParams {
    fn default() -> Self {
        Self {
            start_location_id: 0,
            end_location_id: 0,
            is_active: true,
            is_bidirectional: false,
            price_base: 0.0,
            price_min: None,
            price_per_volume: None,
            price_per_collateral_percent: None,
            collateral_min: None,
            collateral_max: None,
            volume_min: None,
            volume_max: None,
            days_to_expire: None,
            days_to_complete: None,
            details: None,
        }
    }
}

pub struct PricingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PricingRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, params: PricingParams) -> Result<entity::pricing::Model, DbErr> {
        let pricing = entity::pricing::ActiveModel {
            start_location_id: ActiveValue::Set(params.start_location_id),
            end_location_id: ActiveValue::Set(params.end_location_id),
            is_active: ActiveValue::Set(params.is_active),
            is_bidirectional: ActiveValue::Set(params.is_bidirectional),
            price_base: ActiveValue::Set(params.price_base),
            price_min: ActiveValue::Set(params.price_min),
            price_per_volume: ActiveValue::Set(params.price_per_volume),
            price_per_collateral_percent: ActiveValue::Set(params.price_per_collateral_percent),
            collateral_min: ActiveValue::Set(params.collateral_min),
            collateral_max: ActiveValue::Set(params.collateral_max),
            volume_min: ActiveValue::Set(params.volume_min),
            volume_max: ActiveValue::Set(params.volume_max),
            days_to_expire: ActiveValue::Set(params.days_to_expire),
            days_to_complete: ActiveValue::Set(params.days_to_complete),
            details: ActiveValue::Set(params.details),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        pricing.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::pricing::Model>, DbErr> {
        entity::prelude::Pricing::find_by_id(id).one(self.db).await
    }

    /// Flips a rule's active flag. Returns `None` when the rule is gone.
    pub async fn set_active(
        &self,
        id: i32,
        is_active: bool,
    ) -> Result<Option<entity::pricing::Model>, DbErr> {
        let Some(rule) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let mut rule = sea_orm::IntoActiveModel::into_active_model(rule);
        rule.is_active = ActiveValue::Set(is_active);
        rule.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(rule.update(self.db).await?))
    }

    /// Active rules ordered by id, oldest first. The route table relies on this
    /// ordering being stable when resolving bidirectional ties.
    pub async fn get_active(&self) -> Result<Vec<entity::pricing::Model>, DbErr> {
        entity::prelude::Pricing::find()
            .filter(entity::pricing::Column::IsActive.eq(true))
            .order_by_asc(entity::pricing::Column::Id)
            .all(self.db)
            .await
    }
}
