use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

pub struct SettingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the row stored under `(scope, name)`.
    ///
    /// # Arguments
    /// - `scope` - Guild ID string or `global`
    /// - `name` - Setting key
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - Row exists
    /// - `Ok(None)` - Nothing stored yet
    /// - `Err(DbErr)` - Database error during query
    pub async fn find(
        &self,
        scope: &str,
        name: &str,
    ) -> Result<Option<entity::setting::Model>, DbErr> {
        entity::prelude::Setting::find()
            .filter(entity::setting::Column::Scope.eq(scope))
            .filter(entity::setting::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    /// Inserts or replaces the raw JSON value stored under `(scope, name)`.
    ///
    /// Looks the row up first instead of relying on a conflict clause, so the repository
    /// behaves the same on schemas created without the unique index.
    ///
    /// # Arguments
    /// - `scope` - Guild ID string or `global`
    /// - `name` - Setting key
    /// - `value` - Encoded JSON value
    ///
    /// # Returns
    /// - `Ok(Model)` - The stored row
    /// - `Err(DbErr)` - Database error during insert or update
    pub async fn upsert(
        &self,
        scope: &str,
        name: &str,
        value: String,
    ) -> Result<entity::setting::Model, DbErr> {
        match self.find(scope, name).await? {
            Some(existing) => {
                let mut active: entity::setting::ActiveModel = existing.into();
                active.value = ActiveValue::Set(value);
                active.updated_at = ActiveValue::Set(Utc::now());
                active.update(self.db).await
            }
            None => {
                entity::setting::ActiveModel {
                    scope: ActiveValue::Set(scope.to_string()),
                    name: ActiveValue::Set(name.to_string()),
                    value: ActiveValue::Set(value),
                    updated_at: ActiveValue::Set(Utc::now()),
                    ..Default::default()
                }
                .insert(self.db)
                .await
            }
        }
    }

    /// Deletes the row stored under `(scope, name)`.
    ///
    /// # Returns
    /// - `Ok(true)` - A row was deleted
    /// - `Ok(false)` - Nothing was stored
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, scope: &str, name: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::Setting::delete_many()
            .filter(entity::setting::Column::Scope.eq(scope))
            .filter(entity::setting::Column::Name.eq(name))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
