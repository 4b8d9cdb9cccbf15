use serenity::async_trait;

use crate::{
    error::AppError,
    model::external_event::{CalendarPatch, ExternalEvent},
};

/// Access to the platform's native scheduled events.
#[async_trait]
pub trait ScheduledEvents: Send + Sync {
    /// Lists a guild's scheduled events with interested counts.
    async fn list(&self, guild_id: u64) -> Result<Vec<ExternalEvent>, AppError>;

    /// Fetches one scheduled event.
    ///
    /// # Returns
    /// - `Ok(Some(ExternalEvent))` - Event exists
    /// - `Ok(None)` - Event was deleted or never existed
    /// - `Err(AppError)` - Platform call failed
    async fn fetch(&self, guild_id: u64, event_id: u64) -> Result<Option<ExternalEvent>, AppError>;

    /// Pushes draft edits back to a linked event.
    async fn update(
        &self,
        guild_id: u64,
        event_id: u64,
        patch: &CalendarPatch,
    ) -> Result<(), AppError>;

    /// User IDs marked as interested in the event.
    async fn interested_users(&self, guild_id: u64, event_id: u64) -> Result<Vec<u64>, AppError>;
}
