use chrono::{NaiveDateTime, Utc};
use entity::contract_handler::{OperationMode, OrganizationCategory, SyncErrorCode};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, QueryFilter,
};

pub struct HandlerRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> HandlerRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// The installed handler. The installation is single-tenant, so there is at
    /// most one row.
    pub async fn get(&self) -> Result<Option<entity::contract_handler::Model>, DbErr> {
        entity::prelude::ContractHandler::find().one(self.db).await
    }

    pub async fn create(
        &self,
        organization_id: i64,
        organization_name: String,
        organization_category: OrganizationCategory,
        operation_mode: OperationMode,
        character_id: Option<i32>,
    ) -> Result<entity::contract_handler::Model, DbErr> {
        let handler = entity::contract_handler::ActiveModel {
            organization_id: ActiveValue::Set(organization_id),
            organization_name: ActiveValue::Set(organization_name),
            organization_category: ActiveValue::Set(organization_category),
            operation_mode: ActiveValue::Set(operation_mode),
            character_id: ActiveValue::Set(character_id),
            version_hash: ActiveValue::Set(None),
            last_sync_at: ActiveValue::Set(None),
            last_error: ActiveValue::Set(SyncErrorCode::None),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        handler.insert(self.db).await
    }

    /// Stamps the outcome code of a sync run without touching the version hash or
    /// last-sync timestamp.
    pub async fn record_error(&self, handler_id: i32, code: SyncErrorCode) -> Result<(), DbErr> {
        entity::prelude::ContractHandler::update_many()
            .col_expr(entity::contract_handler::Column::LastError, Expr::value(code))
            .col_expr(
                entity::contract_handler::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::contract_handler::Column::Id.eq(handler_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Records a fully successful sync: new content hash, fresh timestamp, error
    /// cleared. Called inside the batch transaction so a mid-batch crash cannot
    /// leave the hash ahead of the stored contracts.
    pub async fn record_success(
        &self,
        handler_id: i32,
        version_hash: &str,
        synced_at: NaiveDateTime,
    ) -> Result<(), DbErr> {
        entity::prelude::ContractHandler::update_many()
            .col_expr(
                entity::contract_handler::Column::VersionHash,
                Expr::value(Some(version_hash.to_string())),
            )
            .col_expr(
                entity::contract_handler::Column::LastSyncAt,
                Expr::value(Some(synced_at)),
            )
            .col_expr(
                entity::contract_handler::Column::LastError,
                Expr::value(SyncErrorCode::None),
            )
            .col_expr(
                entity::contract_handler::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::contract_handler::Column::Id.eq(handler_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
