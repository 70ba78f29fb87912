//! Date normalization for passage front-matter.
//!
//! Every passage carries an `mtime` of the fixed-width form
//! `YYYY-MM-DD HH:MM:SS` and a `date` holding its first ten characters.
//! A missing front-matter date falls back to the load time. What happens
//! to an unparseable date depends on the configured [`DatePolicy`].

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::warn;

use crate::error::PassageError;

/// Output format of [`NormalizedDate::mtime`].
pub const MTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// What to do with a front-matter date that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Reject the whole file.
    #[default]
    Strict,
    /// Substitute the load time and log a warning.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    pub mtime: String,
    pub date: String,
}

impl From<NaiveDateTime> for NormalizedDate {
    fn from(when: NaiveDateTime) -> Self {
        let mtime = when.format(MTIME_FORMAT).to_string();
        let date = mtime.chars().take(10).collect();
        Self { mtime, date }
    }
}

/// Normalize an optional raw front-matter date.
///
/// `now` is the load time; the caller captures it once so that every
/// passage without a date in one load shares the same timestamp.
pub fn normalize_date(
    raw: Option<&str>,
    policy: DatePolicy,
    now: NaiveDateTime,
) -> Result<NormalizedDate, PassageError> {
    let Some(raw) = raw else {
        return Ok(now.into());
    };

    match parse_date(raw) {
        Some(when) => Ok(when.into()),
        None => match policy {
            DatePolicy::Strict => Err(PassageError::InvalidDate(raw.to_string())),
            DatePolicy::Lenient => {
                warn!(
                    category = "parse",
                    raw,
                    "unparseable date, substituting load time"
                );
                Ok(now.into())
            }
        },
    }
}

/// Parse a date in one of the accepted formats.
///
/// Offset-carrying RFC 3339 timestamps are converted to local time; all
/// other formats are taken as local wall-clock time. A bare date means
/// midnight.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(8, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_absent_date_uses_now() {
        let d = normalize_date(None, DatePolicy::Strict, fixed_now()).unwrap();
        assert_eq!(d.mtime, "2025-06-15 08:30:05");
        assert_eq!(d.date, "2025-06-15");
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let d = normalize_date(Some("2024-03-01"), DatePolicy::Strict, fixed_now()).unwrap();
        assert_eq!(d.mtime, "2024-03-01 00:00:00");
        assert_eq!(d.date, "2024-03-01");
    }

    #[test]
    fn test_datetime_formats() {
        for raw in [
            "2024-03-01 10:11:12",
            "2024-03-01T10:11:12",
            "2024/03/01 10:11:12",
        ] {
            let d = normalize_date(Some(raw), DatePolicy::Strict, fixed_now()).unwrap();
            assert_eq!(d.mtime, "2024-03-01 10:11:12", "input {raw}");
        }
        let d = normalize_date(Some("2024-03-01 10:11"), DatePolicy::Strict, fixed_now()).unwrap();
        assert_eq!(d.mtime, "2024-03-01 10:11:00");
    }

    #[test]
    fn test_rfc3339_parses() {
        assert!(parse_date("2024-03-01T10:11:12+02:00").is_some());
        assert!(parse_date("2024-03-01T10:11:12Z").is_some());
    }

    #[test]
    fn test_strict_rejects_garbage() {
        let err = normalize_date(Some("last tuesday"), DatePolicy::Strict, fixed_now()).unwrap_err();
        assert!(matches!(err, PassageError::InvalidDate(ref raw) if raw == "last tuesday"));
    }

    #[test]
    fn test_strict_rejects_impossible_date() {
        assert!(normalize_date(Some("2024-13-45"), DatePolicy::Strict, fixed_now()).is_err());
    }

    #[test]
    fn test_lenient_substitutes_now() {
        let d = normalize_date(Some("not a date"), DatePolicy::Lenient, fixed_now()).unwrap();
        assert_eq!(d.mtime, "2025-06-15 08:30:05");
    }

    #[test]
    fn test_date_is_mtime_prefix() {
        let d = normalize_date(Some("1999-12-31 23:59:59"), DatePolicy::Strict, fixed_now()).unwrap();
        assert_eq!(d.mtime.len(), 19);
        assert_eq!(&d.mtime[..10], d.date);
    }
}
