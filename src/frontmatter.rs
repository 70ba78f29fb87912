//! Front-matter splitting and decoding.
//!
//! A passage file optionally starts with a YAML header fenced by `---`
//! marker lines:
//!
//! ```text
//! ---
//! permalink: getting-started
//! title: Getting Started
//! date: 2024-03-01
//! ---
//! # Body
//! ```
//!
//! Text without an opening and closing marker is all body.

use serde_yaml::{Mapping, Value};

use crate::error::PassageError;

const MARKER: &str = "---";

/// Decoded header plus the remaining Markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub fields: Mapping,
    pub body: String,
}

impl FrontMatter {
    pub fn permalink(&self) -> Option<String> {
        self.scalar("permalink")
    }

    pub fn title(&self) -> Option<String> {
        self.scalar("title")
    }

    pub fn date(&self) -> Option<String> {
        self.scalar("date")
    }

    /// Stringified scalar value. Blank strings count as absent.
    fn scalar(&self, key: &str) -> Option<String> {
        let value = match self.fields.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Split raw text into `(header, body)`.
///
/// The header is `None` unless the first line is a marker and a later line
/// closes it. A leading BOM and CRLF line endings are tolerated.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let first_end = text.find('\n').map(|i| i + 1).unwrap_or(text.len());
    if text[..first_end].trim_end() != MARKER {
        return (None, text);
    }

    let rest = &text[first_end..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == MARKER {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, text)
}

/// Split and decode a passage file.
///
/// Fails with [`PassageError::MissingFrontMatter`] when there is no header
/// and [`PassageError::InvalidYaml`] when the header does not decode.
pub fn parse_front_matter(text: &str) -> Result<FrontMatter, PassageError> {
    let (header, body) = split_front_matter(text);
    let header = header.ok_or(PassageError::MissingFrontMatter)?;

    Ok(FrontMatter {
        fields: decode_header(header)?,
        body: body.to_string(),
    })
}

fn decode_header(header: &str) -> Result<Mapping, PassageError> {
    if header.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(header)? {
        Value::Mapping(fields) => Ok(fields),
        Value::Null => Ok(Mapping::new()),
        _ => Err(PassageError::NotAMapping),
    }
}
