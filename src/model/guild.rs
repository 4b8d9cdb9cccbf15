//! Lightweight views of guild members and channels used by listing commands.

use chrono::{DateTime, Utc};

/// Member fields needed by the membership listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: u64,
    pub display_name: String,
    pub joined_at: Option<DateTime<Utc>>,
}

/// Text channel offered as a publish destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub id: u64,
    pub name: String,
}
