//! Setting factory for creating raw guild store rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Scope string used for values that are not tied to a guild.
pub const GLOBAL_SCOPE: &str = "global";

/// Factory for creating setting rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::setting::SettingFactory;
///
/// let row = SettingFactory::new(&db)
///     .scope("123456789")
///     .name("wizard_divisions")
///     .value(serde_json::json!(["Hugin", "Munin"]))
///     .build()
///     .await?;
/// ```
pub struct SettingFactory<'a> {
    db: &'a DatabaseConnection,
    scope: String,
    name: String,
    value: serde_json::Value,
}

impl<'a> SettingFactory<'a> {
    /// Creates a new SettingFactory with default values.
    ///
    /// Defaults:
    /// - scope: a unique numeric guild ID
    /// - name: `"setting_{id}"`
    /// - value: JSON `null`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the row
    ///
    /// # Returns
    /// - `SettingFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            scope: (100_000_000 + id).to_string(),
            name: format!("setting_{}", id),
            value: serde_json::Value::Null,
        }
    }

    /// Sets the scope (guild ID string or `global`).
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the setting name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the JSON value stored for the setting.
    pub fn value(mut self, value: serde_json::Value) -> Self {
        self.value = value;
        self
    }

    /// Builds and inserts the setting row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::setting::Model)` - Created setting row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::setting::Model, DbErr> {
        entity::setting::ActiveModel {
            id: ActiveValue::NotSet,
            scope: ActiveValue::Set(self.scope),
            name: ActiveValue::Set(self.name),
            value: ActiveValue::Set(self.value.to_string()),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a guild-scoped setting row.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Discord guild ID the value belongs to
/// - `name` - Setting name
/// - `value` - JSON value to store
///
/// # Returns
/// - `Ok(entity::setting::Model)` - Created setting row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_guild_setting(
    db: &DatabaseConnection,
    guild_id: u64,
    name: &str,
    value: serde_json::Value,
) -> Result<entity::setting::Model, DbErr> {
    SettingFactory::new(db)
        .scope(guild_id.to_string())
        .name(name)
        .value(value)
        .build()
        .await
}

/// Creates a global setting row.
///
/// # Arguments
/// - `db` - Database connection
/// - `name` - Setting name
/// - `value` - JSON value to store
///
/// # Returns
/// - `Ok(entity::setting::Model)` - Created setting row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_global_setting(
    db: &DatabaseConnection,
    name: &str,
    value: serde_json::Value,
) -> Result<entity::setting::Model, DbErr> {
    SettingFactory::new(db)
        .scope(GLOBAL_SCOPE)
        .name(name)
        .value(value)
        .build()
        .await
}
