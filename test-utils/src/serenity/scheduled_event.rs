//! Test factory for creating Serenity ScheduledEvent objects.

use serenity::all::ScheduledEvent;

/// Creates a test Serenity ScheduledEvent with customizable fields.
///
/// The event is an external (location-based) event in the scheduled state with a
/// description, a creator, an end time one hour after `start_time` and twelve
/// interested users.
///
/// # Arguments
/// - `event_id` - Scheduled event ID (snowflake)
/// - `guild_id` - Discord guild ID owning the event
/// - `name` - Event name
/// - `start_time` - RFC 3339 start timestamp, e.g. `"2030-01-01T20:00:00Z"`
///
/// # Returns
/// - `ScheduledEvent` - A valid Serenity ScheduledEvent struct for testing
///
/// # Panics
/// - If `start_time` is not RFC 3339 or the JSON cannot be deserialized
pub fn create_test_scheduled_event(
    event_id: u64,
    guild_id: u64,
    name: &str,
    start_time: &str,
) -> ScheduledEvent {
    let start = chrono::DateTime::parse_from_rfc3339(start_time)
        .expect("Invalid RFC 3339 start time for test scheduled event");
    let end = start + chrono::Duration::hours(1);

    serde_json::from_value(serde_json::json!({
        "id": event_id.to_string(),
        "guild_id": guild_id.to_string(),
        "channel_id": null,
        "creator_id": "200000000000000000",
        "name": name,
        "description": format!("{} description", name),
        "scheduled_start_time": start.to_rfc3339(),
        "scheduled_end_time": end.to_rfc3339(),
        "privacy_level": 2,
        "status": 1,
        "entity_type": 3,
        "entity_id": null,
        "entity_metadata": { "location": "Voice Lobby" },
        "creator": null,
        "user_count": 12,
        "image": null,
    }))
    .expect("Failed to create test scheduled event - invalid JSON structure")
}
