//! Typed JSON key/value store scoped per guild.

use std::{fmt, sync::Arc};

use sea_orm::DatabaseConnection;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{data::setting::SettingRepository, error::AppError};

/// Legacy scheduled-event ID to Discord role ID mapping.
pub const EVENT_ROLES: &str = "event_roles";
/// Published posts keyed by draft ID.
pub const EVENT_POSTS: &str = "event_posts";
/// Ordered division vocabulary for the wizard.
pub const WIZARD_DIVISIONS: &str = "wizard_divisions";
/// Persisted log write counter (global scope).
pub const LOG_WRITES: &str = "log_writes";

/// Addressing scope of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Guild(u64),
    Global,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Guild(id) => write!(f, "{}", id),
            Scope::Global => f.write_str("global"),
        }
    }
}

/// Key/value store over the `setting` table.
///
/// Values are JSON-encoded; a missing key reads as `T::default()`. Writes go through one
/// store-wide async mutex so `update` is an atomic read-modify-write with respect to every
/// other writer in the process.
#[derive(Clone)]
pub struct GuildStore {
    db: DatabaseConnection,
    write_lock: Arc<Mutex<()>>,
}

impl GuildStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Reads the value under `key`, or its default when nothing is stored.
    ///
    /// # Arguments
    /// - `scope` - Guild or global scope
    /// - `key` - Setting key
    ///
    /// # Returns
    /// - `Ok(T)` - Decoded value or `T::default()`
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::SerdeErr)` - Stored value does not decode as `T`
    pub async fn get<T>(&self, scope: Scope, key: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned + Default,
    {
        let row = SettingRepository::new(&self.db)
            .find(&scope.to_string(), key)
            .await?;

        decode(row)
    }

    /// Replaces the value under `key`.
    pub async fn set<T>(&self, scope: Scope, key: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize,
    {
        let encoded = serde_json::to_string(value)?;

        let _guard = self.write_lock.lock().await;
        SettingRepository::new(&self.db)
            .upsert(&scope.to_string(), key, encoded)
            .await?;

        Ok(())
    }

    /// Removes the value under `key`; later reads return the default.
    pub async fn clear(&self, scope: Scope, key: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        SettingRepository::new(&self.db)
            .delete(&scope.to_string(), key)
            .await?;

        Ok(())
    }

    /// Atomically reads, mutates and writes back the value under `key`.
    ///
    /// The closure is synchronous and runs while the store lock is held, so any check it
    /// makes (such as a capacity check) cannot be interleaved with another update. When the
    /// closure returns an error nothing is written.
    ///
    /// # Arguments
    /// - `scope` - Guild or global scope
    /// - `key` - Setting key
    /// - `mutate` - Mutation applied to the decoded value
    ///
    /// # Returns
    /// - `Ok(R)` - Closure result; the mutated value has been stored
    /// - `Err(AppError)` - Closure rejected the change, or a database/decode error occurred
    pub async fn update<T, R, F>(&self, scope: Scope, key: &str, mutate: F) -> Result<R, AppError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R, AppError>,
    {
        let scope = scope.to_string();
        let _guard = self.write_lock.lock().await;
        let repo = SettingRepository::new(&self.db);

        let mut value: T = decode(repo.find(&scope, key).await?)?;
        let result = mutate(&mut value)?;
        repo.upsert(&scope, key, serde_json::to_string(&value)?)
            .await?;

        Ok(result)
    }
}

fn decode<T>(row: Option<entity::setting::Model>) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match row {
        Some(row) => Ok(serde_json::from_str(&row.value)?),
        None => Ok(T::default()),
    }
}
