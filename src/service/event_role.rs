//! Legacy one-role-per-scheduled-event tracking.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    data::guild_store::{GuildStore, Scope, EVENT_ROLES},
    error::AppError,
};

/// Name of the role created for a scheduled event.
pub fn event_role_name(event_name: &str) -> String {
    format!("Event: {}", event_name)
}

/// Membership changes needed to make role holders match the interested users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSyncPlan {
    pub to_add: Vec<u64>,
    pub to_remove: Vec<u64>,
}

/// Computes the set differences between current holders and interested users.
///
/// # Arguments
/// - `holders` - Users currently holding the event role
/// - `interested` - Users interested in the scheduled event
///
/// # Returns
/// - `RoleSyncPlan` - Users to add and remove, each sorted ascending
pub fn plan_role_sync(holders: &[u64], interested: &[u64]) -> RoleSyncPlan {
    let holders: BTreeSet<u64> = holders.iter().copied().collect();
    let interested: BTreeSet<u64> = interested.iter().copied().collect();

    RoleSyncPlan {
        to_add: interested.difference(&holders).copied().collect(),
        to_remove: holders.difference(&interested).copied().collect(),
    }
}

/// Scheduled event ID to Discord role ID mapping stored under `event_roles`.
pub struct EventRoleService<'a> {
    store: &'a GuildStore,
}

impl<'a> EventRoleService<'a> {
    pub fn new(store: &'a GuildStore) -> Self {
        Self { store }
    }

    pub async fn get_all(&self, guild_id: u64) -> Result<BTreeMap<u64, u64>, AppError> {
        self.store.get(Scope::Guild(guild_id), EVENT_ROLES).await
    }

    /// Role tracked for a scheduled event, if any.
    pub async fn tracked_role(&self, guild_id: u64, event_id: u64) -> Result<Option<u64>, AppError> {
        Ok(self.get_all(guild_id).await?.get(&event_id).copied())
    }

    /// Records `role_id` as the role of `event_id`, replacing any previous mapping.
    pub async fn track(&self, guild_id: u64, event_id: u64, role_id: u64) -> Result<(), AppError> {
        self.store
            .update(
                Scope::Guild(guild_id),
                EVENT_ROLES,
                |roles: &mut BTreeMap<u64, u64>| {
                    roles.insert(event_id, role_id);
                    Ok(())
                },
            )
            .await
    }

    /// Drops the mapping of `event_id`.
    ///
    /// # Returns
    /// - `Ok(Some(role_id))` - Mapping removed
    /// - `Ok(None)` - Event was not tracked
    pub async fn untrack(&self, guild_id: u64, event_id: u64) -> Result<Option<u64>, AppError> {
        self.store
            .update(
                Scope::Guild(guild_id),
                EVENT_ROLES,
                |roles: &mut BTreeMap<u64, u64>| Ok(roles.remove(&event_id)),
            )
            .await
    }
}
