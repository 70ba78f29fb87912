//! Recursive passage discovery.
//!
//! Only entries that follow the naming convention are visited: a file
//! named `readme.md` (any case) or any entry whose name starts with a
//! numeric order prefix such as `01.`. Directories that do not match are
//! not descended. Files that fail to build are logged and skipped.
//!
//! Siblings are visited in file-name order. When two files share a
//! permalink, the one visited later wins and takes the earlier one's slot.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ContentConfig;
use crate::dates::DatePolicy;
use crate::error::PassageError;
use crate::models::Passage;
use crate::passage::{build_passage, ORDER_PREFIX};

/// Result of one walk: passages in traversal order, one per permalink,
/// plus counts of rejected files and of files shadowed by a later file
/// with the same permalink.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub passages: Vec<Passage>,
    pub skipped: usize,
    pub duplicates: usize,
}

pub fn walk_passages(
    content: &ContentConfig,
    now: NaiveDateTime,
) -> Result<WalkOutcome, PassageError> {
    if !content.root.is_dir() {
        return Err(PassageError::RootNotFound(content.root.clone()));
    }
    let root = content.root.canonicalize()?;

    let mut outcome = WalkOutcome::default();
    let mut slots: HashMap<String, usize> = HashMap::new();

    let walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(content.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || is_candidate_name(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(category = "load", error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !has_markdown_extension(path) {
            continue;
        }

        match read_passage(path, content.date_policy, now) {
            Ok(passage) => {
                debug!(category = "load", path = %path.display(), permalink = %passage.permalink, "parsed passage");
                match slots.get(&passage.permalink) {
                    Some(&slot) => {
                        warn!(
                            category = "load",
                            permalink = %passage.permalink,
                            shadowed = %outcome.passages[slot].filepath,
                            path = %path.display(),
                            "duplicate permalink, keeping the later file"
                        );
                        outcome.duplicates += 1;
                        outcome.passages[slot] = passage;
                    }
                    None => {
                        slots.insert(passage.permalink.clone(), outcome.passages.len());
                        outcome.passages.push(passage);
                    }
                }
            }
            Err(err) => {
                outcome.skipped += 1;
                warn!(category = "parse", path = %path.display(), error = %err, "skipping passage");
            }
        }
    }

    Ok(outcome)
}

fn read_passage(
    path: &Path,
    policy: DatePolicy,
    now: NaiveDateTime,
) -> Result<Passage, PassageError> {
    let text = std::fs::read_to_string(path)?;
    build_passage(path, &text, policy, now)
}

/// Naming convention filter applied to files and directories alike.
pub fn is_candidate_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("readme.md") || ORDER_PREFIX.is_match(name)
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn passage_file(permalink: &str) -> String {
        format!("---\npermalink: {permalink}\n---\nBody of {permalink}\n")
    }

    fn sorted_permalinks(outcome: &WalkOutcome) -> Vec<String> {
        let mut ids: Vec<String> = outcome.passages.iter().map(|p| p.permalink.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_candidate_names() {
        assert!(is_candidate_name("readme.md"));
        assert!(is_candidate_name("README.MD"));
        assert!(is_candidate_name("01.intro.md"));
        assert!(is_candidate_name("03.topics"));
        assert!(!is_candidate_name("notes.txt"));
        assert!(!is_candidate_name("intro.md"));
        assert!(!is_candidate_name(".01.hidden"));
        assert!(!is_candidate_name("01-dash.md"));
    }

    #[test]
    fn test_filters_by_naming_convention() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("readme.md"), passage_file("home")).unwrap();
        fs::write(root.join("01.a.md"), passage_file("a")).unwrap();
        fs::write(root.join("02.b.md"), passage_file("b")).unwrap();
        fs::write(root.join("notes.txt"), passage_file("notes")).unwrap();
        fs::write(root.join("draft.md"), passage_file("draft")).unwrap();

        let outcome = walk_passages(&ContentConfig::new(root), now()).unwrap();
        assert_eq!(sorted_permalinks(&outcome), vec!["a", "b", "home"]);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_recurses_only_into_numbered_dirs() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("01.guide/03.topics")).unwrap();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("01.guide/readme.md"), passage_file("guide")).unwrap();
        fs::write(root.join("01.guide/03.topics/readme.md"), passage_file("topics")).unwrap();
        fs::write(root.join("01.guide/03.topics/04.deep.md"), passage_file("deep")).unwrap();
        fs::write(root.join("assets/readme.md"), passage_file("hidden")).unwrap();

        let outcome = walk_passages(&ContentConfig::new(root), now()).unwrap();
        assert_eq!(sorted_permalinks(&outcome), vec!["deep", "guide", "topics"]);

        let topics = outcome
            .passages
            .iter()
            .find(|p| p.permalink == "topics")
            .unwrap();
        assert_eq!(topics.filename, "topics");
        assert!(Path::new(&topics.filepath).is_absolute());
    }

    #[test]
    fn test_bad_files_are_skipped_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("01.ok.md"), passage_file("ok")).unwrap();
        fs::write(root.join("02.nolink.md"), "---\ntitle: No link\n---\nBody").unwrap();
        fs::write(root.join("03.noheader.md"), "# Just markdown").unwrap();
        fs::write(root.join("04.badyaml.md"), "---\npermalink: [oops\n---\n").unwrap();
        fs::write(root.join("05.ok.md"), passage_file("ok2")).unwrap();

        let outcome = walk_passages(&ContentConfig::new(root), now()).unwrap();
        assert_eq!(sorted_permalinks(&outcome), vec!["ok", "ok2"]);
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = walk_passages(&ContentConfig::new(&missing), now()).unwrap_err();
        assert!(matches!(err, PassageError::RootNotFound(p) if p == missing));
    }

    #[test]
    fn test_duplicate_permalink_keeps_last_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("02.nested")).unwrap();
        fs::write(root.join("01.first.md"), "---\npermalink: same\ntitle: First\n---\n").unwrap();
        fs::write(root.join("02.nested/readme.md"), "---\npermalink: same\ntitle: Nested\n---\n").unwrap();
        fs::write(root.join("03.last.md"), "---\npermalink: same\ntitle: Last\n---\n").unwrap();
        fs::write(root.join("04.other.md"), passage_file("other")).unwrap();

        let outcome = walk_passages(&ContentConfig::new(root), now()).unwrap();
        assert_eq!(sorted_permalinks(&outcome), vec!["other", "same"]);
        assert_eq!(outcome.duplicates, 2);
        assert_eq!(outcome.skipped, 0);

        let same = outcome.passages.iter().find(|p| p.permalink == "same").unwrap();
        assert_eq!(same.title, "Last");
        assert!(same.filepath.ends_with("03.last.md"));
    }

    #[test]
    fn test_numbered_non_markdown_file_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("01.data.json"), "{}").unwrap();
        let outcome = walk_passages(&ContentConfig::new(tmp.path()), now()).unwrap();
        assert!(outcome.passages.is_empty());
        assert_eq!(outcome.skipped, 0);
    }
}
