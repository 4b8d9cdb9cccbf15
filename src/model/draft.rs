//! In-memory event draft edited through the wizard.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::workflow::WorkflowError,
    model::{
        event_post::{format_schedule, group_by_division, MessageRef, RoleOption, MAX_ROLES},
        external_event::{CalendarPatch, ExternalEvent},
    },
};

/// Division given to roles added without one.
pub const DEFAULT_DIVISION: &str = "General";

/// Lifecycle of a draft. `Published` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftStatus {
    Draft,
    Published,
    Canceled,
}

/// Link between a draft and the scheduled event it was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarLink {
    pub event_id: u64,
    /// Event fields at import time; kept for audit, never reconciled.
    pub snapshot: ExternalEvent,
    pub linked_at: DateTime<Utc>,
}

/// Requested calendar linkage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMode {
    /// Keep the existing link; fails when there is none.
    Linked,
    /// Drop the link and disable sync-back.
    Unlinked,
}

/// Partial option update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftOptions {
    pub comms: Option<BTreeSet<String>>,
    pub calendar: Option<CalendarMode>,
    pub sync_back: Option<bool>,
}

/// Event description being built by one organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// `<guild>-<organizer>-<creation millis>`; becomes the published post ID.
    pub id: String,
    pub guild_id: u64,
    pub organizer_id: u64,
    /// Channel the wizard was started in.
    pub channel_id: u64,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub description: String,
    pub image_url: Option<String>,
    pub creator_id: Option<u64>,
    pub comms: BTreeSet<String>,
    pub roles: Vec<RoleOption>,
    pub calendar: Option<CalendarLink>,
    pub sync_back: bool,
    pub status: DraftStatus,
    /// Preview message kept up to date while editing.
    pub preview_message: Option<MessageRef>,
    /// Transient wizard messages deleted on publish or cancel.
    pub wizard_messages: Vec<MessageRef>,
    pub created_at: DateTime<Utc>,
    next_role_seq: u32,
}

impl EventDraft {
    /// Creates an empty draft.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the event belongs to
    /// - `organizer_id` - User who owns the draft
    /// - `channel_id` - Channel the wizard runs in
    /// - `title` - Initial title; blank falls back to `New Event`
    /// - `now` - Creation time, also used to derive the draft ID
    ///
    /// # Returns
    /// - `EventDraft` - New draft in `Draft` status
    pub fn new(
        guild_id: u64,
        organizer_id: u64,
        channel_id: u64,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("New Event")
            .to_string();

        Self {
            id: format!("{}-{}-{}", guild_id, organizer_id, now.timestamp_millis()),
            guild_id,
            organizer_id,
            channel_id,
            title,
            start: None,
            end: None,
            description: String::new(),
            image_url: None,
            creator_id: None,
            comms: BTreeSet::new(),
            roles: Vec::new(),
            calendar: None,
            sync_back: false,
            status: DraftStatus::Draft,
            preview_message: None,
            wizard_messages: Vec::new(),
            created_at: now,
            next_role_seq: 1,
        }
    }

    /// Copies a scheduled event's fields into the draft and links it.
    ///
    /// Sync-back is enabled by default for linked drafts.
    pub fn hydrate(&mut self, event: &ExternalEvent, now: DateTime<Utc>) {
        self.title = event.name.clone();
        self.start = Some(event.start);
        self.end = event.end;
        self.description = event.description.clone().unwrap_or_default();
        self.image_url = event.image_url.clone();
        self.creator_id = event.creator_id;
        self.calendar = Some(CalendarLink {
            event_id: event.id,
            snapshot: event.clone(),
            linked_at: now,
        });
        self.sync_back = true;
    }

    pub fn set_description(&mut self, text: &str) {
        self.description = text.trim().to_string();
    }

    /// Adds a role slot to the draft.
    ///
    /// # Arguments
    /// - `division` - Grouping label; blank means `General`
    /// - `name` - Role name
    /// - `capacity` - Raw capacity input; blank means unlimited
    /// - `description` - Optional role description
    ///
    /// # Returns
    /// - `Ok(RoleOption)` - The added role
    /// - `Err(WorkflowError::Capacity)` - Role limit reached or capacity not a number
    /// - `Err(WorkflowError::DuplicateRole)` - Normalized `(division, name)` already present
    /// - `Err(WorkflowError::EmptyRoleName)` - Name is blank
    pub fn add_role(
        &mut self,
        division: &str,
        name: &str,
        capacity: Option<&str>,
        description: Option<&str>,
    ) -> Result<RoleOption, WorkflowError> {
        let division = match division.trim() {
            "" => DEFAULT_DIVISION,
            other => other,
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkflowError::EmptyRoleName);
        }

        if self.roles.len() >= MAX_ROLES {
            return Err(WorkflowError::Capacity(format!(
                "An event can have at most {} roles.",
                MAX_ROLES
            )));
        }

        if self.roles.iter().any(|r| r.same_slot(division, name)) {
            return Err(WorkflowError::DuplicateRole {
                division: division.to_string(),
                name: name.to_string(),
            });
        }

        let capacity = match capacity.map(str::trim).filter(|c| !c.is_empty()) {
            None => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                WorkflowError::Capacity(format!(
                    "Capacity must be a whole number, got `{}`.",
                    raw
                ))
            })?),
        };

        let role = RoleOption {
            id: format!("r{}", self.next_role_seq),
            division: division.to_string(),
            name: name.to_string(),
            capacity,
            emoji: None,
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };
        self.next_role_seq += 1;
        self.roles.push(role.clone());

        Ok(role)
    }

    /// Sets the display emoji of a role. Returns `false` if the role is gone.
    pub fn set_role_emoji(&mut self, role_id: &str, emoji: &str) -> bool {
        match self.roles.iter_mut().find(|r| r.id == role_id) {
            Some(role) => {
                role.emoji = Some(emoji.to_string());
                true
            }
            None => false,
        }
    }

    /// Applies an option update.
    ///
    /// # Returns
    /// - `Ok(())` - All requested options applied
    /// - `Err(WorkflowError::ExternalEventUnavailable)` - Linking or sync-back requested
    ///   without an imported scheduled event; nothing is changed
    pub fn apply_options(&mut self, options: DraftOptions) -> Result<(), WorkflowError> {
        let unlink = options.calendar == Some(CalendarMode::Unlinked);
        let has_link = self.calendar.is_some() && !unlink;

        if options.calendar == Some(CalendarMode::Linked) && self.calendar.is_none() {
            return Err(WorkflowError::ExternalEventUnavailable(
                "this draft was not imported from a scheduled event".to_string(),
            ));
        }
        if options.sync_back == Some(true) && !has_link {
            return Err(WorkflowError::ExternalEventUnavailable(
                "sync-back needs a linked scheduled event".to_string(),
            ));
        }

        if let Some(comms) = options.comms {
            self.comms = comms
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if unlink {
            self.calendar = None;
            self.sync_back = false;
        }
        if let Some(sync_back) = options.sync_back {
            self.sync_back = sync_back;
        }

        Ok(())
    }

    /// Records a wizard message so it is cleaned up on publish or cancel.
    pub fn track_message(&mut self, message: MessageRef) {
        if !self.wizard_messages.contains(&message) {
            self.wizard_messages.push(message);
        }
    }

    /// Linked scheduled event ID, if any.
    pub fn linked_event_id(&self) -> Option<u64> {
        self.calendar.as_ref().map(|link| link.event_id)
    }

    /// Fields pushed back to the linked scheduled event on publish.
    pub fn calendar_patch(&self) -> CalendarPatch {
        CalendarPatch {
            name: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
        }
    }

    /// Markdown preview shown to the organizer while editing.
    pub fn render_markdown(&self) -> String {
        let mut out = format!("# {}\n", self.title);
        out.push_str(&format!("`draft {}`\n", self.id));
        if let Some(schedule) = format_schedule(self.start, self.end) {
            out.push_str(&schedule);
            out.push('\n');
        }
        if let Some(link) = &self.calendar {
            out.push_str(&format!(
                "📅 Linked to scheduled event `{}` (sync-back {})\n",
                link.event_id,
                if self.sync_back { "on" } else { "off" }
            ));
        }

        out.push('\n');
        if self.description.is_empty() {
            out.push_str("*No description yet.*\n");
        } else {
            out.push_str(&self.description);
            out.push('\n');
        }

        if !self.comms.is_empty() {
            out.push_str(&format!(
                "\n**Comms:** {}\n",
                self.comms.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }

        if self.roles.is_empty() {
            out.push_str("\n*No roles yet.*");
            return out;
        }
        for (division, roles) in group_by_division(&self.roles) {
            out.push_str(&format!("\n## {}\n", division));
            for role in roles {
                let capacity = role
                    .capacity
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "∞".to_string());
                out.push_str(&format!("- `{}` {} (cap {})", role.id, role.label(), capacity));
                if let Some(description) = &role.description {
                    out.push_str(&format!(" - {}", description));
                }
                out.push('\n');
            }
        }

        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::external_event::ExternalEventStatus;

    fn draft() -> EventDraft {
        EventDraft::new(1, 2, 3, Some("Raid Night"), Utc::now())
    }

    fn external_event() -> ExternalEvent {
        ExternalEvent {
            id: 555,
            guild_id: 1,
            name: "Fleet Op".to_string(),
            description: Some("Bring ships".to_string()),
            start: Utc::now(),
            end: None,
            image_url: None,
            creator_id: Some(9),
            location: None,
            status: ExternalEventStatus::Scheduled,
            user_count: None,
        }
    }

    #[test]
    fn draft_id_combines_guild_organizer_and_time() {
        let now = Utc::now();
        let draft = EventDraft::new(1, 2, 3, None, now);

        assert_eq!(draft.id, format!("1-2-{}", now.timestamp_millis()));
        assert_eq!(draft.title, "New Event");
        assert_eq!(draft.status, DraftStatus::Draft);
    }

    #[test]
    fn add_role_rejects_normalized_duplicate() {
        let mut draft = draft();
        draft.add_role("Hugin", "Tank", Some("1"), None).unwrap();

        let result = draft.add_role(" hugin ", "“TANK”", None, None);

        assert!(matches!(result, Err(WorkflowError::DuplicateRole { .. })));
        assert_eq!(draft.roles.len(), 1);
    }

    #[test]
    fn blank_division_counts_as_general_for_duplicates() {
        let mut draft = draft();
        draft.add_role("General", "Tank", None, None).unwrap();

        let result = draft.add_role("  ", "tank", None, None);

        assert!(matches!(result, Err(WorkflowError::DuplicateRole { .. })));
        assert_eq!(draft.roles.len(), 1);
    }

    #[test]
    fn blank_division_is_stored_as_general() {
        let mut draft = draft();

        let role = draft.add_role("", "Scout", None, None).unwrap();

        assert_eq!(role.division, DEFAULT_DIVISION);
        assert!(matches!(
            draft.add_role("general", "Scout", None, None),
            Err(WorkflowError::DuplicateRole { .. })
        ));
    }

    #[test]
    fn blank_role_name_is_rejected() {
        let mut draft = draft();

        let result = draft.add_role("Hugin", "  ", Some("2"), None);

        assert_eq!(result, Err(WorkflowError::EmptyRoleName));
        assert!(draft.roles.is_empty());
    }

    #[test]
    fn same_name_in_other_division_is_allowed() {
        let mut draft = draft();
        draft.add_role("Hugin", "Tank", None, None).unwrap();

        let role = draft.add_role("Munin", "Tank", None, None).unwrap();

        assert_eq!(role.id, "r2");
        assert_eq!(draft.roles.len(), 2);
    }

    #[test]
    fn add_role_rejects_non_numeric_capacity() {
        let mut draft = draft();

        let result = draft.add_role("Hugin", "Tank", Some("lots"), None);

        assert!(matches!(result, Err(WorkflowError::Capacity(_))));
        assert!(draft.roles.is_empty());
    }

    #[test]
    fn add_role_stops_at_role_limit() {
        let mut draft = draft();
        for i in 0..MAX_ROLES {
            draft.add_role("General", &format!("Role {}", i), None, None).unwrap();
        }

        let result = draft.add_role("General", "One too many", None, None);

        assert!(matches!(result, Err(WorkflowError::Capacity(_))));
        assert_eq!(draft.roles.len(), MAX_ROLES);
    }

    #[test]
    fn hydrate_links_and_snapshots_event() {
        let mut draft = draft();
        let event = external_event();

        draft.hydrate(&event, Utc::now());

        assert_eq!(draft.title, "Fleet Op");
        assert_eq!(draft.description, "Bring ships");
        assert_eq!(draft.creator_id, Some(9));
        assert_eq!(draft.linked_event_id(), Some(555));
        assert_eq!(draft.calendar.as_ref().map(|l| &l.snapshot), Some(&event));
        assert!(draft.sync_back);
    }

    #[test]
    fn sync_back_requires_link() {
        let mut draft = draft();

        let result = draft.apply_options(DraftOptions {
            sync_back: Some(true),
            ..Default::default()
        });

        assert!(matches!(result, Err(WorkflowError::ExternalEventUnavailable(_))));
        assert!(!draft.sync_back);
    }

    #[test]
    fn unlinking_clears_link_and_sync_back() {
        let mut draft = draft();
        draft.hydrate(&external_event(), Utc::now());

        draft
            .apply_options(DraftOptions {
                comms: Some(["Voice".to_string(), " ".to_string()].into_iter().collect()),
                calendar: Some(CalendarMode::Unlinked),
                sync_back: None,
            })
            .unwrap();

        assert!(draft.calendar.is_none());
        assert!(!draft.sync_back);
        assert_eq!(draft.comms.len(), 1);
    }
}
