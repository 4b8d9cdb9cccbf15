//! Recently joined member listing.

use chrono::{DateTime, Duration, Utc};

use crate::{error::AppError, model::guild::MemberSummary};

/// Most members shown in one listing.
pub const MAX_LISTED: usize = 25;

/// Parses `<amount> <unit>` into a look-back window.
///
/// Months are approximated as 30 days.
///
/// # Arguments
/// - `amount` - Number of units; must be positive
/// - `unit` - `day(s)`, `week(s)` or `month(s)`, case-insensitive
///
/// # Returns
/// - `Ok(Duration)` - Look-back window
/// - `Err(AppError::BadRequest)` - Unknown unit or non-positive amount
pub fn parse_period(amount: i64, unit: &str) -> Result<Duration, AppError> {
    if amount <= 0 {
        return Err(AppError::BadRequest("Amount must be a positive number.".to_string()));
    }

    let days = match unit.to_lowercase().as_str() {
        "day" | "days" => amount,
        "week" | "weeks" => amount.saturating_mul(7),
        "month" | "months" => amount.saturating_mul(30),
        _ => {
            return Err(AppError::BadRequest(
                "Period must be 'days', 'weeks', or 'months'".to_string(),
            ))
        }
    };

    Duration::try_days(days)
        .ok_or_else(|| AppError::BadRequest(format!("{} {} is too far back.", amount, unit)))
}

/// Start of the look-back window `<amount> <unit>` before `now`.
///
/// # Returns
/// - `Ok(DateTime<Utc>)` - Join cutoff
/// - `Err(AppError::BadRequest)` - Invalid period, or one reaching past the earliest
///   representable date
pub fn join_cutoff(amount: i64, unit: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
    let window = parse_period(amount, unit)?;

    now.checked_sub_signed(window)
        .ok_or_else(|| AppError::BadRequest(format!("{} {} is too far back.", amount, unit)))
}

/// Members who joined after a cutoff, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentMembers {
    /// At most `MAX_LISTED` members.
    pub shown: Vec<MemberSummary>,
    /// Number of members matching before truncation.
    pub total: usize,
}

/// Filters members who joined strictly after `cutoff`, sorted newest first.
pub fn recent_members(members: Vec<MemberSummary>, cutoff: DateTime<Utc>) -> RecentMembers {
    let mut recent: Vec<MemberSummary> = members
        .into_iter()
        .filter(|m| m.joined_at.is_some_and(|joined| joined > cutoff))
        .collect();
    recent.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));

    let total = recent.len();
    recent.truncate(MAX_LISTED);

    RecentMembers {
        shown: recent,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u64, days_ago: Option<i64>, now: DateTime<Utc>) -> MemberSummary {
        MemberSummary {
            id,
            display_name: format!("member{}", id),
            joined_at: days_ago.map(|d| now - Duration::days(d)),
        }
    }

    #[test]
    fn parses_units() {
        assert_eq!(parse_period(2, "days").unwrap(), Duration::days(2));
        assert_eq!(parse_period(1, "Week").unwrap(), Duration::days(7));
        assert_eq!(parse_period(3, "months").unwrap(), Duration::days(90));
    }

    #[test]
    fn rejects_unknown_unit_and_non_positive_amount() {
        assert!(matches!(parse_period(1, "years"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_period(0, "days"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn cutoff_is_now_minus_period() {
        let now = Utc::now();

        assert_eq!(join_cutoff(2, "weeks", now).unwrap(), now - Duration::days(14));
    }

    #[test]
    fn cutoff_before_earliest_date_is_rejected() {
        let now = Utc::now();

        let result = join_cutoff(100_000_000, "days", now);

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn filters_and_sorts_newest_first() {
        let now = Utc::now();
        let members = vec![
            member(1, Some(5), now),
            member(2, Some(1), now),
            member(3, Some(30), now),
            member(4, None, now),
        ];

        let recent = recent_members(members, now - Duration::days(7));

        let ids: Vec<u64> = recent.shown.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(recent.total, 2);
    }

    #[test]
    fn caps_listing() {
        let now = Utc::now();
        let members = (0..40).map(|i| member(i, Some(1), now)).collect();

        let recent = recent_members(members, now - Duration::days(7));

        assert_eq!(recent.shown.len(), MAX_LISTED);
        assert_eq!(recent.total, 40);
    }
}
