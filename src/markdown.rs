//! Markdown re-formatting and description extraction.

use pulldown_cmark::{Options, Parser};
use pulldown_cmark_to_cmark::cmark;
use tracing::warn;

/// Maximum number of characters kept from the body.
pub const DESCRIPTION_LIMIT: usize = 155;

/// Appended to every description, truncated or not.
pub const DESCRIPTION_MARKER: &str = "...";

/// Normalize a Markdown body by parsing it and re-emitting CommonMark.
///
/// Pure function. If serialization fails the body is returned unchanged.
pub fn format_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(body, options);
    let mut output = String::with_capacity(body.len());
    match cmark(parser, &mut output) {
        Ok(_) => output,
        Err(err) => {
            warn!(category = "parse", error = %err, "markdown formatting failed, keeping raw body");
            body.to_string()
        }
    }
}

/// Single-line summary of a body: newlines removed, trimmed, cut to
/// [`DESCRIPTION_LIMIT`] characters, then [`DESCRIPTION_MARKER`].
pub fn describe(body: &str) -> String {
    let flat: String = body.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    let mut description: String = flat.trim().chars().take(DESCRIPTION_LIMIT).collect();
    description.push_str(DESCRIPTION_MARKER);
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_short_body_gets_marker() {
        assert_eq!(describe("  Hello\nworld  \n"), "Helloworld...");
    }

    #[test]
    fn test_describe_empty_body() {
        assert_eq!(describe(""), DESCRIPTION_MARKER);
    }

    #[test]
    fn test_describe_truncates_long_body() {
        let body = "a".repeat(400);
        let d = describe(&body);
        assert!(d.ends_with(DESCRIPTION_MARKER));
        assert_eq!(d.chars().count(), DESCRIPTION_LIMIT + DESCRIPTION_MARKER.len());
    }

    #[test]
    fn test_describe_counts_chars_not_bytes() {
        let body = "é".repeat(200);
        let d = describe(&body);
        assert_eq!(d.chars().count(), DESCRIPTION_LIMIT + DESCRIPTION_MARKER.len());
    }

    #[test]
    fn test_describe_bound_holds_for_any_length() {
        for len in [0, 1, 154, 155, 156, 1000] {
            let body = "x\n".repeat(len);
            let d = describe(&body);
            assert!(d.ends_with(DESCRIPTION_MARKER));
            assert!(d.chars().count() <= DESCRIPTION_LIMIT + DESCRIPTION_MARKER.len());
        }
    }

    #[test]
    fn test_format_keeps_content() {
        let out = format_markdown("# Title\n\nSome *emphasis* here.\n\n- one\n- two\n");
        assert!(out.contains("Title"));
        assert!(out.contains("emphasis"));
        assert!(out.contains("one"));
        assert!(out.contains("two"));
    }
}
