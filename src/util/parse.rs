/// Extracts a snowflake from a raw ID or a `<#123>`, `<@123>`, `<@!123>`, `<@&123>` mention.
///
/// # Arguments
/// - `input` - User-supplied token
///
/// # Returns
/// - `Some(u64)` - The embedded ID
/// - `None` - The token is neither an ID nor a mention
pub fn parse_mention_id(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches(['#', '@', '!', '&']))
        .unwrap_or(trimmed);

    inner.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mentions_and_raw_ids() {
        assert_eq!(parse_mention_id("<#42>"), Some(42));
        assert_eq!(parse_mention_id("<@!42>"), Some(42));
        assert_eq!(parse_mention_id("<@&42>"), Some(42));
        assert_eq!(parse_mention_id(" 42 "), Some(42));
        assert_eq!(parse_mention_id("general"), None);
    }
}
