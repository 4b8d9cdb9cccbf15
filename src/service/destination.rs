//! Publish destination search.

use crate::{model::guild::ChannelSummary, util::text::norm_text};

/// Most destinations offered at once.
pub const MAX_DESTINATIONS: usize = 25;

/// Channels whose normalized name contains the normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    /// At most `MAX_DESTINATIONS` channels, in input order.
    pub channels: Vec<ChannelSummary>,
    /// Number of matches before the cap.
    pub total: usize,
}

/// Filters candidate channels by substring; a blank query keeps all of them.
pub fn search_destinations(channels: &[ChannelSummary], query: Option<&str>) -> Destinations {
    let needle = query.map(norm_text).unwrap_or_default();

    let matches: Vec<&ChannelSummary> = channels
        .iter()
        .filter(|c| needle.is_empty() || norm_text(&c.name).contains(&needle))
        .collect();

    Destinations {
        total: matches.len(),
        channels: matches
            .into_iter()
            .take(MAX_DESTINATIONS)
            .cloned()
            .collect(),
    }
}
