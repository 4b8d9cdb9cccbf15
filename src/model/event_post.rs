//! Domain models for published event posts and their role slots.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{model::draft::EventDraft, util::text::norm_text};

/// Maximum number of roles per event, bounded by the select menu option limit.
pub const MAX_ROLES: usize = 24;

/// Location of a message rendered by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

/// An attendance slot members can sign up for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOption {
    /// Identifier unique within one event.
    pub id: String,
    /// Free-text grouping such as a team or wing.
    pub division: String,
    pub name: String,
    /// Maximum signups; `None` is unlimited.
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RoleOption {
    /// Whether this role has the same normalized `(division, name)` pair.
    pub fn same_slot(&self, division: &str, name: &str) -> bool {
        norm_text(&self.division) == norm_text(division) && norm_text(&self.name) == norm_text(name)
    }

    /// Label used in listings, e.g. `🛡️ Tank`.
    pub fn label(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{} {}", emoji, self.name),
            None => self.name.clone(),
        }
    }
}

/// Durable record of a published event.
///
/// Created once from a draft at publish time and stored under `event_posts` keyed by
/// the draft ID. The core fields never change after publication; `interested` and
/// `signups` are updated by members through the guild store's scoped update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    /// Same as the originating draft ID.
    pub id: String,
    pub guild_id: u64,
    pub organizer_id: u64,
    /// Channel the public post is rendered in.
    pub channel_id: u64,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub description: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub comms: BTreeSet<String>,
    pub roles: Vec<RoleOption>,
    /// Scheduled event this post was created from, if any.
    pub linked_event_id: Option<u64>,
    /// Rendered public message, once it has been sent.
    #[serde(default)]
    pub message: Option<MessageRef>,
    /// Users who marked themselves as interested.
    #[serde(default)]
    pub interested: BTreeSet<u64>,
    /// User ID to role ID; at most one role per user.
    #[serde(default)]
    pub signups: BTreeMap<u64, String>,
    pub published_at: DateTime<Utc>,
}

impl PublishedPost {
    /// Builds the record for a draft being published.
    ///
    /// # Arguments
    /// - `draft` - Draft being published
    /// - `channel_id` - Destination channel for the public post
    /// - `now` - Publication time
    ///
    /// # Returns
    /// - `PublishedPost` - Record with empty interest and signup sets
    pub fn from_draft(draft: &EventDraft, channel_id: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: draft.id.clone(),
            guild_id: draft.guild_id,
            organizer_id: draft.organizer_id,
            channel_id,
            title: draft.title.clone(),
            start: draft.start,
            end: draft.end,
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            comms: draft.comms.clone(),
            roles: draft.roles.clone(),
            linked_event_id: draft.calendar.as_ref().map(|link| link.event_id),
            message: None,
            interested: BTreeSet::new(),
            signups: BTreeMap::new(),
            published_at: now,
        }
    }

    /// Looks up a role by ID.
    pub fn role(&self, role_id: &str) -> Option<&RoleOption> {
        self.roles.iter().find(|role| role.id == role_id)
    }

    /// Resolves user input to a role.
    ///
    /// Accepts a role ID, a role name, or `division/name`, compared after normalization.
    /// A bare name only resolves when it is unambiguous across divisions.
    ///
    /// # Arguments
    /// - `query` - Role ID or name typed by the user
    ///
    /// # Returns
    /// - `Some(&RoleOption)` - The single matching role
    /// - `None` - No role, or more than one role, matches
    pub fn find_role(&self, query: &str) -> Option<&RoleOption> {
        if let Some(role) = self.role(query.trim()) {
            return Some(role);
        }

        if let Some((division, name)) = query.split_once('/') {
            if let Some(role) = self.roles.iter().find(|r| r.same_slot(division, name)) {
                return Some(role);
            }
        }

        let needle = norm_text(query);
        let mut matches = self.roles.iter().filter(|r| norm_text(&r.name) == needle);
        match (matches.next(), matches.next()) {
            (Some(role), None) => Some(role),
            _ => None,
        }
    }

    /// Number of signups currently referencing `role_id`.
    pub fn occupancy(&self, role_id: &str) -> usize {
        self.signups.values().filter(|r| r.as_str() == role_id).count()
    }

    /// Number of signups for `role_id` ignoring `user_id`'s own signup.
    pub fn occupancy_excluding(&self, role_id: &str, user_id: u64) -> usize {
        self.signups
            .iter()
            .filter(|(user, role)| **user != user_id && role.as_str() == role_id)
            .count()
    }

    /// Markdown body of the public post.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n", self.title));
        if let Some(schedule) = format_schedule(self.start, self.end) {
            out.push_str(&schedule);
            out.push('\n');
        }
        if !self.description.trim().is_empty() {
            out.push('\n');
            out.push_str(self.description.trim());
            out.push('\n');
        }
        if !self.comms.is_empty() {
            out.push_str(&format!(
                "\n**Comms:** {}\n",
                self.comms.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }

        for (division, roles) in group_by_division(&self.roles) {
            out.push_str(&format!("\n## {}\n", division));
            for role in roles {
                let taken = self.occupancy(&role.id);
                let count = match role.capacity {
                    Some(capacity) => format!("{}/{}", taken, capacity),
                    None => taken.to_string(),
                };
                out.push_str(&format!("- {} ({})", role.label(), count));
                let members: Vec<String> = self
                    .signups
                    .iter()
                    .filter(|(_, r)| **r == role.id)
                    .map(|(user, _)| format!("<@{}>", user))
                    .collect();
                if !members.is_empty() {
                    out.push_str(&format!(": {}", members.join(" ")));
                }
                out.push('\n');
            }
        }

        out.push_str(&format!("\n⭐ Interested: {}", self.interested.len()));
        out
    }
}

/// Formats a start/end pair with Discord timestamp markup.
pub(crate) fn format_schedule(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Option<String> {
    let start = start?;
    Some(match end {
        Some(end) => format!(
            "🗓️ <t:{}:F> – <t:{}:t>",
            start.timestamp(),
            end.timestamp()
        ),
        None => format!("🗓️ <t:{}:F>", start.timestamp()),
    })
}

/// Groups roles by division, keeping first-seen division order.
pub(crate) fn group_by_division(roles: &[RoleOption]) -> Vec<(&str, Vec<&RoleOption>)> {
    let mut groups: Vec<(&str, Vec<&RoleOption>)> = Vec::new();
    for role in roles {
        match groups
            .iter_mut()
            .find(|(division, _)| norm_text(division) == norm_text(&role.division))
        {
            Some((_, members)) => members.push(role),
            None => groups.push((role.division.as_str(), vec![role])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &str, division: &str, name: &str, capacity: Option<u32>) -> RoleOption {
        RoleOption {
            id: id.to_string(),
            division: division.to_string(),
            name: name.to_string(),
            capacity,
            emoji: None,
            description: None,
        }
    }

    fn post() -> PublishedPost {
        PublishedPost {
            id: "1-2-3".to_string(),
            guild_id: 1,
            organizer_id: 2,
            channel_id: 3,
            title: "Raid Night".to_string(),
            start: None,
            end: None,
            description: "Bring consumables".to_string(),
            image_url: None,
            comms: BTreeSet::new(),
            roles: vec![
                role("r1", "Hugin", "Tank", Some(2)),
                role("r2", "Munin", "Tank", None),
                role("r3", "Hugin", "Healer", None),
            ],
            linked_event_id: None,
            message: None,
            interested: BTreeSet::new(),
            signups: BTreeMap::new(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn find_role_by_id_name_and_division() {
        let post = post();

        assert_eq!(post.find_role("r3").map(|r| r.id.as_str()), Some("r3"));
        assert_eq!(post.find_role("healer").map(|r| r.id.as_str()), Some("r3"));
        assert_eq!(post.find_role("munin/TANK").map(|r| r.id.as_str()), Some("r2"));
        // Two divisions have a Tank
        assert!(post.find_role("Tank").is_none());
    }

    #[test]
    fn occupancy_excludes_requesting_user() {
        let mut post = post();
        post.signups.insert(10, "r1".to_string());
        post.signups.insert(11, "r1".to_string());

        assert_eq!(post.occupancy("r1"), 2);
        assert_eq!(post.occupancy_excluding("r1", 10), 1);
        assert_eq!(post.occupancy_excluding("r1", 99), 2);
    }

    #[test]
    fn markdown_lists_roles_grouped_by_division() {
        let mut post = post();
        post.signups.insert(10, "r1".to_string());
        post.interested.insert(12);

        let body = post.render_markdown();

        assert!(body.starts_with("# Raid Night"));
        assert!(body.contains("## Hugin\n- Tank (1/2): <@10>\n- Healer (0)"));
        assert!(body.contains("## Munin\n- Tank (0)"));
        assert!(body.ends_with("⭐ Interested: 1"));
    }
}
