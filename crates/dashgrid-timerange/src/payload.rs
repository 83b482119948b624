#![forbid(unsafe_code)]

//! Time-range classification, payload construction and labels.
//!
//! A range string is classified by the first matching rule:
//!
//! 1. `abs:<from>|<to>` → absolute, halves as written.
//! 2. blank → the default relative range (`1h` → `now`).
//! 3. `<left> to <right>` → absolute when both halves are date-times and
//!    neither starts with `now`; otherwise each half is normalized as a
//!    relative token.
//! 4. `now-…` or shorthand like `5min` → relative, `from` normalized, `to = now`.
//! 5. anything else → relative, `from` normalized (falling back to the
//!    default), `to = now`.
//!
//! # Failure Modes
//!
//! None. Malformed input degrades to the configured defaults.

use std::sync::OnceLock;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::absolute::{decode_absolute_dashboard_range, parse_date_time, to_iso_string};
use crate::token::{NOW, RelativeToken, normalize_relative};

/// Default lookback when a `from` token cannot be read.
pub const DEFAULT_FROM: &str = "1h";
/// Default end of range when a `to` token cannot be read.
pub const DEFAULT_TO: &str = NOW;
/// Shorthands offered as quick picks and labelled `Last <token>`.
pub const QUICK_RANGES: [&str; 7] = ["5m", "15m", "1h", "6h", "24h", "7d", "30d"];
/// Default `strftime` layout for absolute range labels.
pub const DEFAULT_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether a payload holds relative tokens or absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    Relative,
    Absolute,
}

/// Canonical time range handed to the query layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DashboardTimeRangePayload {
    #[serde(rename = "type")]
    pub kind: RangeKind,
    pub from: String,
    pub to: String,
}

impl DashboardTimeRangePayload {
    /// A relative payload.
    pub fn relative(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: RangeKind::Relative,
            from: from.into(),
            to: to.into(),
        }
    }

    /// An absolute payload.
    pub fn absolute(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind: RangeKind::Absolute,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Resolve both ends to instants, with relative tokens measured from `now`.
    ///
    /// Returns `None` if either end cannot be interpreted.
    #[must_use]
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self.kind {
            RangeKind::Absolute => Some((parse_date_time(&self.from)?, parse_date_time(&self.to)?)),
            RangeKind::Relative => Some((
                RelativeToken::parse(&self.from)?.resolve(now)?,
                RelativeToken::parse(&self.to)?.resolve(now)?,
            )),
        }
    }
}

/// Tunables for [`TimeRangeNormalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRangeOptions {
    /// Fallback `from` token.
    pub default_from: String,
    /// Fallback `to` token.
    pub default_to: String,
    /// Shorthands labelled `Last <token>`.
    pub quick_ranges: Vec<String>,
    /// `strftime` layout for absolute labels, rendered in local time.
    pub label_format: String,
}

impl Default for TimeRangeOptions {
    fn default() -> Self {
        Self {
            default_from: DEFAULT_FROM.to_string(),
            default_to: DEFAULT_TO.to_string(),
            quick_ranges: QUICK_RANGES.iter().map(|s| (*s).to_string()).collect(),
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
        }
    }
}

impl TimeRangeOptions {
    /// Check that every field is usable, collecting all problems.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if RelativeToken::parse(&self.default_from).is_none() {
            errors.push(format!(
                "time_range.default_from must be a relative token, got {:?}",
                self.default_from
            ));
        }
        if RelativeToken::parse(&self.default_to).is_none() {
            errors.push(format!(
                "time_range.default_to must be a relative token, got {:?}",
                self.default_to
            ));
        }
        for token in &self.quick_ranges {
            if RelativeToken::parse(token).is_none() {
                errors.push(format!(
                    "time_range.quick_ranges entry {token:?} is not a relative token"
                ));
            }
        }
        if !is_valid_strftime(&self.label_format) {
            errors.push(format!(
                "time_range.label_format {:?} is not a valid strftime layout",
                self.label_format
            ));
        }
        errors
    }
}

fn is_valid_strftime(layout: &str) -> bool {
    !StrftimeItems::new(layout).any(|item| matches!(item, Item::Error))
}

fn to_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\s+to\s+").expect("range separator regex"))
}

fn shorthand_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i)(now-)?\s*\d+\s*[a-z]+$").expect("relative shorthand regex")
    })
}

fn starts_with_now(value: &str) -> bool {
    value
        .get(..NOW.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(NOW))
}

/// Parses and labels dashboard time ranges under a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct TimeRangeNormalizer {
    options: TimeRangeOptions,
}

impl TimeRangeNormalizer {
    /// Create a normalizer with explicit options.
    #[must_use]
    pub fn new(options: TimeRangeOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> &TimeRangeOptions {
        &self.options
    }

    /// Classify `value` and build the canonical payload.
    #[must_use]
    pub fn to_payload(&self, value: &str) -> DashboardTimeRangePayload {
        let defaults = &self.options;

        if let Some(range) = decode_absolute_dashboard_range(value) {
            tracing::trace!(target: "dashgrid.timerange", rule = "encoded", "time range classified");
            return DashboardTimeRangePayload::absolute(range.from, range.to);
        }

        let trimmed = value.trim();
        if trimmed.is_empty() {
            tracing::trace!(target: "dashgrid.timerange", rule = "blank", "time range classified");
            return DashboardTimeRangePayload::relative(
                defaults.default_from.as_str(),
                defaults.default_to.as_str(),
            );
        }

        if to_separator().is_match(trimmed) {
            let mut halves = to_separator().split(trimmed).map(str::trim);
            let left = halves.next().unwrap_or_default();
            let right = halves.next().unwrap_or_default();

            if !starts_with_now(left) && !starts_with_now(right) {
                if let (Some(from), Some(to)) = (parse_date_time(left), parse_date_time(right)) {
                    tracing::trace!(target: "dashgrid.timerange", rule = "dates", "time range classified");
                    return DashboardTimeRangePayload::absolute(
                        to_iso_string(&from),
                        to_iso_string(&to),
                    );
                }
            }
            tracing::trace!(target: "dashgrid.timerange", rule = "relative-pair", "time range classified");
            return DashboardTimeRangePayload::relative(
                normalize_relative(left, &defaults.default_from),
                normalize_relative(right, &defaults.default_to),
            );
        }

        let rule = if starts_with_now(trimmed) || shorthand_pattern().is_match(trimmed) {
            "shorthand"
        } else {
            "bare"
        };
        tracing::trace!(target: "dashgrid.timerange", rule, "time range classified");
        DashboardTimeRangePayload::relative(
            normalize_relative(trimmed, &defaults.default_from),
            NOW,
        )
    }

    /// Human-facing label for a range string.
    #[must_use]
    pub fn format_label(&self, value: &str) -> String {
        if let Some(range) = decode_absolute_dashboard_range(value) {
            return format!(
                "{} -> {}",
                self.format_instant(&range.from),
                self.format_instant(&range.to)
            );
        }

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return format!("Last {}", self.options.default_from);
        }
        if to_separator().is_match(value) {
            return value.to_string();
        }
        if self.options.quick_ranges.iter().any(|quick| quick == trimmed) {
            return format!("Last {trimmed}");
        }
        value.to_string()
    }

    /// Local-time rendering of an ISO instant; unparseable input is returned as-is.
    fn format_instant(&self, iso: &str) -> String {
        let Some(dt) = parse_date_time(iso) else {
            return iso.to_string();
        };
        let layout = if is_valid_strftime(&self.options.label_format) {
            self.options.label_format.as_str()
        } else {
            DEFAULT_LABEL_FORMAT
        };
        dt.with_timezone(&Local).format(layout).to_string()
    }
}

fn default_normalizer() -> &'static TimeRangeNormalizer {
    static DEFAULT: OnceLock<TimeRangeNormalizer> = OnceLock::new();
    DEFAULT.get_or_init(TimeRangeNormalizer::default)
}

/// [`TimeRangeNormalizer::to_payload`] with the default options.
#[must_use]
pub fn to_dashboard_time_range_payload(value: &str) -> DashboardTimeRangePayload {
    default_normalizer().to_payload(value)
}

/// [`TimeRangeNormalizer::format_label`] with the default options.
#[must_use]
pub fn format_dashboard_time_range_label(value: &str) -> String {
    default_normalizer().format_label(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absolute::encode_absolute_dashboard_range;
    use chrono::TimeZone;

    fn relative(from: &str, to: &str) -> DashboardTimeRangePayload {
        DashboardTimeRangePayload::relative(from, to)
    }

    #[test]
    fn shorthand_minutes() {
        assert_eq!(to_dashboard_time_range_payload("5min"), relative("5m", "now"));
    }

    #[test]
    fn anchored_pair() {
        assert_eq!(
            to_dashboard_time_range_payload("now-2h to now"),
            relative("now-2h", "now")
        );
    }

    #[test]
    fn date_pair_is_absolute() {
        let payload =
            to_dashboard_time_range_payload("2026-01-01T00:00:00Z to 2026-01-01T01:00:00Z");
        assert_eq!(
            payload,
            DashboardTimeRangePayload::absolute(
                "2026-01-01T00:00:00.000Z",
                "2026-01-01T01:00:00.000Z"
            )
        );
    }

    #[test]
    fn iso_shorthand_pairs_are_absolute() {
        assert_eq!(
            to_dashboard_time_range_payload("2026-01-01T00:00Z to 2026-01-01T01:00Z"),
            DashboardTimeRangePayload::absolute(
                "2026-01-01T00:00:00.000Z",
                "2026-01-01T01:00:00.000Z"
            )
        );
        assert_eq!(
            to_dashboard_time_range_payload(
                "2026-01-01T00:00:00.000+0100 to 2026-01-01T06:00:00.000+0100"
            ),
            DashboardTimeRangePayload::absolute(
                "2025-12-31T23:00:00.000Z",
                "2026-01-01T05:00:00.000Z"
            )
        );
        assert_eq!(
            to_dashboard_time_range_payload("2026-01 to 2026-02"),
            DashboardTimeRangePayload::absolute(
                "2026-01-01T00:00:00.000Z",
                "2026-02-01T00:00:00.000Z"
            )
        );
        assert_eq!(
            to_dashboard_time_range_payload("2025 to 2026"),
            DashboardTimeRangePayload::absolute(
                "2025-01-01T00:00:00.000Z",
                "2026-01-01T00:00:00.000Z"
            )
        );
    }

    #[test]
    fn separator_is_case_insensitive() {
        let payload = to_dashboard_time_range_payload("2026-01-01 TO 2026-01-02");
        assert_eq!(payload.kind, RangeKind::Absolute);
        assert_eq!(payload.to, "2026-01-02T00:00:00.000Z");
    }

    #[test]
    fn mixed_pair_is_relative_with_defaults() {
        assert_eq!(
            to_dashboard_time_range_payload("2026-01-01 to now"),
            relative("1h", "now")
        );
        assert_eq!(
            to_dashboard_time_range_payload("3 days to 1 day"),
            relative("3d", "1d")
        );
        assert_eq!(
            to_dashboard_time_range_payload("junk to junk"),
            relative("1h", "now")
        );
    }

    #[test]
    fn encoded_range_passes_through_unchanged() {
        let encoded = encode_absolute_dashboard_range("2026-01-01T00:00:00Z", "whenever");
        assert_eq!(
            to_dashboard_time_range_payload(&encoded),
            DashboardTimeRangePayload::absolute("2026-01-01T00:00:00Z", "whenever")
        );
    }

    #[test]
    fn blank_is_default() {
        assert_eq!(to_dashboard_time_range_payload(""), relative("1h", "now"));
        assert_eq!(to_dashboard_time_range_payload("   "), relative("1h", "now"));
    }

    #[test]
    fn anchored_single_token() {
        assert_eq!(
            to_dashboard_time_range_payload("now-15m"),
            relative("now-15m", "now")
        );
        assert_eq!(
            to_dashboard_time_range_payload("NOW-3 weeks"),
            relative("now-3w", "now")
        );
    }

    #[test]
    fn garbage_degrades_to_default() {
        assert_eq!(to_dashboard_time_range_payload("garbage!!"), relative("1h", "now"));
        assert_eq!(to_dashboard_time_range_payload("now-"), relative("1h", "now"));
    }

    #[test]
    fn bare_now_is_a_zero_width_range() {
        assert_eq!(to_dashboard_time_range_payload("now"), relative("now", "now"));
    }

    #[test]
    fn options_change_defaults() {
        let normalizer = TimeRangeNormalizer::new(TimeRangeOptions {
            default_from: "24h".into(),
            ..TimeRangeOptions::default()
        });
        assert_eq!(normalizer.to_payload(""), relative("24h", "now"));
        assert_eq!(normalizer.to_payload("???"), relative("24h", "now"));
        assert_eq!(normalizer.format_label(""), "Last 24h");
    }

    #[test]
    fn payload_serializes_with_type_key() {
        let json = serde_json::to_string(&relative("5m", "now")).unwrap();
        assert_eq!(json, r#"{"type":"relative","from":"5m","to":"now"}"#);
    }

    #[test]
    fn labels_for_quick_ranges() {
        assert_eq!(format_dashboard_time_range_label("1h"), "Last 1h");
        assert_eq!(format_dashboard_time_range_label("7d"), "Last 7d");
        assert_eq!(format_dashboard_time_range_label(" 30d "), "Last 30d");
    }

    #[test]
    fn labels_for_blank_and_verbatim() {
        assert_eq!(format_dashboard_time_range_label(""), "Last 1h");
        assert_eq!(format_dashboard_time_range_label("now-2h to now"), "now-2h to now");
        assert_eq!(format_dashboard_time_range_label("now-3h"), "now-3h");
        assert_eq!(format_dashboard_time_range_label("2h"), "2h");
    }

    #[test]
    fn label_for_absolute_uses_local_time() {
        let encoded = encode_absolute_dashboard_range("2026-01-01T00:00:00Z", "2026-01-01T01:00:00Z");
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().with_timezone(&Local);
        let to = Utc.with_ymd_and_hms(2026, 1, 1, 1, 0, 0).unwrap().with_timezone(&Local);
        assert_eq!(
            format_dashboard_time_range_label(&encoded),
            format!(
                "{} -> {}",
                from.format(DEFAULT_LABEL_FORMAT),
                to.format(DEFAULT_LABEL_FORMAT)
            )
        );
    }

    #[test]
    fn label_for_unparseable_absolute_keeps_text() {
        let encoded = encode_absolute_dashboard_range("yesterday", "today");
        assert_eq!(format_dashboard_time_range_label(&encoded), "yesterday -> today");
    }

    #[test]
    fn invalid_label_format_falls_back() {
        let normalizer = TimeRangeNormalizer::new(TimeRangeOptions {
            label_format: "%!".into(),
            ..TimeRangeOptions::default()
        });
        let encoded = encode_absolute_dashboard_range("2026-01-01T00:00:00Z", "2026-01-01T01:00:00Z");
        assert!(normalizer.format_label(&encoded).contains(" -> "));
    }

    #[test]
    fn validate_defaults_are_clean() {
        assert!(TimeRangeOptions::default().validate().is_empty());
    }

    #[test]
    fn validate_collects_every_problem() {
        let options = TimeRangeOptions {
            default_from: "forever".into(),
            default_to: "".into(),
            quick_ranges: vec!["5m".into(), "soon".into()],
            label_format: "%!".into(),
        };
        let errors = options.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("quick_ranges")));
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let (from, to) = relative("now-2h", "now").resolve(now).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap());
        assert_eq!(to, now);

        let abs = DashboardTimeRangePayload::absolute("2026-01-01T00:00:00Z", "2026-01-02T00:00:00Z");
        let (from, to) = abs.resolve(now).unwrap();
        assert_eq!(to - from, chrono::TimeDelta::days(1));

        assert_eq!(relative("bogus", "now").resolve(now), None);
    }
}
