//! Splitting long replies into messages that fit Discord's content limit.

/// Maximum characters per page, kept below Discord's 2000 character limit.
pub const MAX_MSG: usize = 1900;

/// Packs text sections into pages of at most [`MAX_MSG`] characters.
///
/// The header opens the first page followed by a blank line. Sections are joined with
/// newlines and never split unless a single section is itself too long. The footer is
/// appended to the last page when it fits, otherwise it is sent as its own page.
///
/// # Arguments
/// - `chunks` - Sections in display order
/// - `header` - Optional heading for the first page
/// - `footer` - Optional trailer for the last page
///
/// # Returns
/// - `Vec<String>` - Non-blank pages in send order
pub fn paginate(chunks: &[String], header: Option<&str>, footer: Option<&str>) -> Vec<String> {
    let header = header.unwrap_or("");
    let footer = footer.unwrap_or("");
    let footer_len = if footer.is_empty() {
        0
    } else {
        char_len(footer) + 2
    };

    let mut pages: Vec<String> = Vec::new();
    let mut current = if header.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", header)
    };

    for part in chunks.iter().flat_map(|c| split_oversized(c)) {
        let sep = if current.is_empty() || current.ends_with('\n') {
            ""
        } else {
            "\n"
        };

        if char_len(&current) + sep.len() + char_len(&part) + footer_len > MAX_MSG {
            pages.push(current.trim_end().to_string());
            current = part;
        } else {
            current.push_str(sep);
            current.push_str(&part);
        }
    }

    if !current.trim().is_empty() {
        if !footer.is_empty() && char_len(&current) + footer_len <= MAX_MSG {
            current.push_str("\n\n");
            current.push_str(footer);
        }
        pages.push(current.trim_end().to_string());
    }

    if !footer.is_empty() && pages.last().map_or(true, |last| !last.ends_with(footer)) {
        pages.push(footer.to_string());
    }

    pages.retain(|page| !page.trim().is_empty());
    pages
}

/// Groups lines into sections of at most [`MAX_MSG`] characters each.
///
/// # Arguments
/// - `lines` - Lines in display order
///
/// # Returns
/// - `Vec<String>` - Newline-joined sections
pub fn chunk_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = line.as_ref();
        let extra = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && char_len(&current) + extra + char_len(line) > MAX_MSG {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn split_oversized(part: &str) -> Vec<String> {
    if char_len(part) <= MAX_MSG {
        return vec![part.to_string()];
    }

    let chars: Vec<char> = part.chars().collect();
    chars
        .chunks(MAX_MSG)
        .map(|piece| piece.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_fits_on_one_page_with_header_and_footer() {
        let pages = paginate(
            &["line one".to_string(), "line two".to_string()],
            Some("# Title"),
            Some("end"),
        );

        assert_eq!(pages, vec!["# Title\n\nline one\nline two\n\nend".to_string()]);
    }

    #[test]
    fn long_content_is_split_below_limit() {
        let chunks: Vec<String> = (0..40).map(|i| format!("{:0>100}", i)).collect();

        let pages = paginate(&chunks, Some("# Logs"), None);

        assert!(pages.len() > 1);
        assert!(pages.iter().all(|p| p.chars().count() <= MAX_MSG));
        assert!(pages[0].starts_with("# Logs"));
    }

    #[test]
    fn footer_that_does_not_fit_is_sent_alone() {
        let chunk = "x".repeat(MAX_MSG - 5);

        let pages = paginate(&[chunk], None, Some("footer text"));

        assert_eq!(pages.last().map(String::as_str), Some("footer text"));
        assert!(pages.iter().all(|p| p.chars().count() <= MAX_MSG));
    }

    #[test]
    fn oversized_section_is_hard_split() {
        let pages = paginate(&["y".repeat(MAX_MSG * 2 + 10)], None, None);

        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn chunk_lines_respects_limit() {
        let lines: Vec<String> = (0..100).map(|_| "z".repeat(50)).collect();

        let chunks = chunk_lines(&lines);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_MSG));
        assert_eq!(chunks.join("\n"), lines.join("\n"));
    }
}
