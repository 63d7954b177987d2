use chrono::Utc;
use entity::location::LocationCategory;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct LocationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LocationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        location_id: i64,
        name: String,
        solar_system_id: Option<i64>,
        type_id: Option<i64>,
        category: LocationCategory,
    ) -> Result<entity::location::Model, DbErr> {
        let location = entity::location::ActiveModel {
            location_id: ActiveValue::Set(location_id),
            name: ActiveValue::Set(name),
            solar_system_id: ActiveValue::Set(solar_system_id),
            type_id: ActiveValue::Set(type_id),
            category: ActiveValue::Set(category),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        location.insert(self.db).await
    }

    pub async fn get_by_location_id(
        &self,
        location_id: i64,
    ) -> Result<Option<entity::location::Model>, DbErr> {
        entity::prelude::Location::find()
            .filter(entity::location::Column::LocationId.eq(location_id))
            .one(self.db)
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<entity::location::Model>, DbErr> {
        entity::prelude::Location::find_by_id(id).one(self.db).await
    }

    /// All known locations ordered by name, for route listings.
    pub async fn get_all(&self) -> Result<Vec<entity::location::Model>, DbErr> {
        entity::prelude::Location::find()
            .order_by_asc(entity::location::Column::Name)
            .all(self.db)
            .await
    }
}
