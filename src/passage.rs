//! Passage construction from one file's text.

use chrono::NaiveDateTime;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::dates::{normalize_date, DatePolicy, NormalizedDate};
use crate::error::PassageError;
use crate::frontmatter::parse_front_matter;
use crate::markdown::{describe, format_markdown};
use crate::models::Passage;

/// Manual sort-order prefix such as the `03.` in `03.topics`.
pub(crate) static ORDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// Build a [`Passage`] from a file's path and raw text.
///
/// Fails when the front-matter is missing or malformed, has no permalink,
/// or carries a date the policy rejects.
pub fn build_passage(
    path: &Path,
    text: &str,
    policy: DatePolicy,
    now: NaiveDateTime,
) -> Result<Passage, PassageError> {
    let front_matter = parse_front_matter(text)?;
    let permalink = front_matter
        .permalink()
        .ok_or(PassageError::MissingPermalink)?;
    let NormalizedDate { mtime, date } =
        normalize_date(front_matter.date().as_deref(), policy, now)?;

    let filename = derive_filename(path);
    let title = front_matter.title().unwrap_or_else(|| filename.clone());

    Ok(Passage {
        filepath: path.display().to_string(),
        filename,
        title,
        content: format_markdown(&front_matter.body),
        description: describe(&front_matter.body),
        mtime,
        date,
        permalink,
    })
}

/// Display slug for a path.
///
/// The base name without extension, except for `readme` files which take
/// their parent directory's name minus any order prefix.
pub fn derive_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !stem.eq_ignore_ascii_case("readme") {
        return stem;
    }

    path.parent()
        .and_then(|parent| parent.file_name())
        .map(|name| ORDER_PREFIX.replace(&name.to_string_lossy(), "").into_owned())
        .unwrap_or(stem)
}
