//! Models for the platform's native scheduled events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serenity::all::{ScheduledEvent, ScheduledEventStatus};

/// Lifecycle state of a scheduled event as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalEventStatus {
    Scheduled,
    Active,
    Completed,
    Canceled,
}

impl ExternalEventStatus {
    /// Emoji and label used in event listings.
    pub fn badge(&self) -> (&'static str, &'static str) {
        match self {
            Self::Scheduled => ("🔔", "Scheduled"),
            Self::Active => ("🟢", "Active"),
            Self::Completed => ("✅", "Completed"),
            Self::Canceled => ("❌", "Cancelled"),
        }
    }
}

/// Snapshot of a platform scheduled event.
///
/// Used both to hydrate a draft and as the immutable audit snapshot stored in the
/// draft's calendar link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalEvent {
    /// Scheduled event ID.
    pub id: u64,
    /// Guild that owns the event.
    pub guild_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// CDN URL of the cover image, if one is set.
    pub image_url: Option<String>,
    /// User who created the event on the platform.
    pub creator_id: Option<u64>,
    /// Location for external events.
    pub location: Option<String>,
    pub status: ExternalEventStatus,
    /// Interested user count when requested with counts.
    pub user_count: Option<u64>,
}

impl ExternalEvent {
    /// Converts a Serenity scheduled event into the domain model at the bot boundary.
    ///
    /// # Arguments
    /// - `event` - Scheduled event returned by the Discord API
    ///
    /// # Returns
    /// - `ExternalEvent` - The converted snapshot
    pub fn from_scheduled_event(event: &ScheduledEvent) -> Self {
        let status = match event.status {
            ScheduledEventStatus::Scheduled => ExternalEventStatus::Scheduled,
            ScheduledEventStatus::Active => ExternalEventStatus::Active,
            ScheduledEventStatus::Completed => ExternalEventStatus::Completed,
            _ => ExternalEventStatus::Canceled,
        };

        Self {
            id: event.id.get(),
            guild_id: event.guild_id.get(),
            name: event.name.clone(),
            description: event.description.clone().filter(|d| !d.trim().is_empty()),
            start: event.start_time.to_utc(),
            end: event.end_time.map(|t| t.to_utc()),
            image_url: event.image.as_ref().map(|hash| {
                format!(
                    "https://cdn.discordapp.com/guild-events/{}/{}.png",
                    event.id, hash
                )
            }),
            creator_id: event.creator_id.map(|id| id.get()),
            location: event.metadata.as_ref().and_then(|m| m.location.clone()),
            status,
            user_count: event.user_count,
        }
    }
}

/// Fields pushed back to a linked scheduled event when sync-back is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarPatch {
    pub name: String,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::serenity::create_test_scheduled_event;

    #[test]
    fn converts_scheduled_event() {
        let event = create_test_scheduled_event(555, 42, "Raid Night", "2030-01-01T20:00:00Z");

        let external = ExternalEvent::from_scheduled_event(&event);

        assert_eq!(external.id, 555);
        assert_eq!(external.guild_id, 42);
        assert_eq!(external.name, "Raid Night");
        assert_eq!(external.description.as_deref(), Some("Raid Night description"));
        assert_eq!(external.start.to_rfc3339(), "2030-01-01T20:00:00+00:00");
        assert_eq!(
            external.end.map(|e| e.to_rfc3339()),
            Some("2030-01-01T21:00:00+00:00".to_string())
        );
        assert_eq!(external.location.as_deref(), Some("Voice Lobby"));
        assert_eq!(external.creator_id, Some(200000000000000000));
        assert_eq!(external.status, ExternalEventStatus::Scheduled);
        assert_eq!(external.user_count, Some(12));
        assert!(external.image_url.is_none());
    }
}
