//! Text normalization used wherever user input is compared with stored names.

use caseless::default_case_fold_str;
use unicode_normalization::UnicodeNormalization;

const QUOTES: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Normalizes text for comparisons.
///
/// Applies NFKC, strips surrounding whitespace and straight/curly quotes, then applies
/// full Unicode case folding. Two strings name the same thing iff their normalized forms
/// are equal.
///
/// # Arguments
/// - `s` - Raw user or platform text
///
/// # Returns
/// - `String` - Comparison key
pub fn norm_text(s: &str) -> String {
    let composed: String = s.nfkc().collect();

    default_case_fold_str(
        composed.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c)),
    )
}

/// Finds the first item whose name matches `query`.
///
/// A normalized exact match wins over any normalized substring match; among equal
/// kinds of match the earliest item wins.
///
/// # Arguments
/// - `items` - Candidates in display order
/// - `query` - User-supplied name
/// - `name` - Extracts the name to compare from an item
///
/// # Returns
/// - `Some(&T)` - Best matching item
/// - `None` - Nothing matched
pub fn find_by_name<'a, T, F>(items: &'a [T], query: &str, name: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    let needle = norm_text(query);
    if needle.is_empty() {
        return None;
    }

    items
        .iter()
        .find(|item| norm_text(name(item)) == needle)
        .or_else(|| items.iter().find(|item| norm_text(name(item)).contains(&needle)))
}

/// Cuts text to at most `max` characters, ending with `…` when anything was dropped.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_and_cased_names_compare_equal() {
        let a = norm_text(" \"Game Night\" ");
        let b = norm_text("game night");
        let c = norm_text("GAME NIGHT");

        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn curly_quotes_and_compatibility_forms_are_normalized() {
        assert_eq!(norm_text("\u{201C}Raid\u{201D}"), "raid");
        // Fullwidth letters fold to ASCII under NFKC
        assert_eq!(norm_text("\u{FF32}aid"), "raid");
    }

    #[test]
    fn case_folding_expands_sharp_s() {
        assert_eq!(norm_text("Straße"), norm_text("STRASSE"));
        assert_eq!(norm_text("Straße"), "strasse");
    }

    #[test]
    fn exact_match_beats_earlier_partial_match() {
        let names = vec!["Game Night Extended", "Game Night"];

        let found = find_by_name(&names, "game night", |n| *n);

        assert_eq!(found, Some(&"Game Night"));
    }

    #[test]
    fn falls_back_to_substring_match() {
        let names = vec!["Weekly Raid Night", "Movie Night"];

        let found = find_by_name(&names, "raid", |n| *n);

        assert_eq!(found, Some(&"Weekly Raid Night"));
    }

    #[test]
    fn blank_query_matches_nothing() {
        let names = vec!["Anything"];

        assert!(find_by_name(&names, " \"\" ", |n| *n).is_none());
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo wörld", 5), "héll…");
    }
}
