#![forbid(unsafe_code)]

//! Absolute ranges: the `abs:<from>|<to>` encoding and date-time parsing.

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Prefix marking an encoded absolute range.
pub const ABSOLUTE_PREFIX: &str = "abs:";

/// Separator between the two encoded instants.
pub const ABSOLUTE_SEPARATOR: char = '|';

/// The two halves of a decoded absolute range, as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsoluteRange {
    pub from: String,
    pub to: String,
}

/// Encode an absolute range as `abs:<from>|<to>`.
///
/// The inputs are not validated.
#[must_use]
pub fn encode_absolute_dashboard_range(from: &str, to: &str) -> String {
    format!("{ABSOLUTE_PREFIX}{from}{ABSOLUTE_SEPARATOR}{to}")
}

/// Decode an `abs:<from>|<to>` value.
///
/// Returns `None` without the prefix, without a separator, or when either
/// trimmed half is empty. The payload is split at the first separator and the
/// halves are returned trimmed but otherwise verbatim.
#[must_use]
pub fn decode_absolute_dashboard_range(value: &str) -> Option<AbsoluteRange> {
    let payload = value.strip_prefix(ABSOLUTE_PREFIX)?;
    let (from, to) = payload.split_once(ABSOLUTE_SEPARATOR)?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some(AbsoluteRange {
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Date-time layouts carrying a zone designator: `Z`, `±HH`, `±HHMM` or `±HH:MM`.
const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Naive date-time layouts, read in the local time zone.
const LOCAL_DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn partial_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})(?:-(\d{2}))?$").expect("partial date regex"))
}

/// Parse a date-time string the way a browser's `Date.parse` reads the
/// ISO-like forms.
///
/// - RFC 3339, and the ISO variants with minutes-only precision or a zone
///   written as `Z`, `±HH`, `±HHMM` or `±HH:MM`.
/// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`: midnight UTC on the first day.
/// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` (or with a space): local time.
///
/// Local times that do not exist (DST gaps) do not parse.
#[must_use]
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in &OFFSET_DATE_TIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in &LOCAL_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    let date = match partial_date_pattern().captures(value) {
        Some(caps) => {
            let year = caps.get(1)?.as_str().parse().ok()?;
            let month = caps.get(2).map_or(Some(1), |m| m.as_str().parse().ok())?;
            NaiveDate::from_ymd_opt(year, month, 1)?
        }
        None => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?,
    };
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Render an instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[must_use]
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
