#![forbid(unsafe_code)]

//! Relative time tokens: `now`, `15m`, `now-2h`, `5 minutes`.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Months, TimeDelta, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// The literal token for the current instant.
pub const NOW: &str = "now";

/// Canonical time unit of a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// All units, shortest first.
    pub const ALL: [TimeUnit; 7] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
    ];

    /// Map a human unit spelling to its canonical unit.
    ///
    /// Matching is case-insensitive except for the canonical month symbol
    /// `M`, which would otherwise read as minutes.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        if word == "M" {
            return Some(Self::Month);
        }
        let unit = match word.to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Second,
            "m" | "min" | "mins" | "minute" | "minutes" => Self::Minute,
            "h" | "hr" | "hrs" | "hour" | "hours" => Self::Hour,
            "d" | "day" | "days" => Self::Day,
            "w" | "week" | "weeks" => Self::Week,
            "mo" | "mon" | "month" | "months" | "mth" => Self::Month,
            "y" | "yr" | "yrs" | "year" | "years" => Self::Year,
            _ => return None,
        };
        Some(unit)
    }

    /// Canonical symbol used in normalized tokens.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "M",
            Self::Year => "y",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed relative time token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeToken {
    /// The current instant.
    Now,
    /// `amount` units before now. `anchored` records an explicit `now-` prefix.
    Offset {
        amount: u64,
        unit: TimeUnit,
        anchored: bool,
    },
}

fn relative_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?i)(now-)?\s*(\d+)\s*([a-z]+)$").expect("relative token regex")
    })
}

impl RelativeToken {
    /// Parse `now` or `[now-]<int><unit word>`. Surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(NOW) {
            return Some(Self::Now);
        }
        let caps = relative_pattern().captures(value)?;
        let amount = caps.get(2)?.as_str().parse::<u64>().ok()?;
        let unit = TimeUnit::from_word(caps.get(3)?.as_str())?;
        Some(Self::Offset {
            amount,
            unit,
            anchored: caps.get(1).is_some(),
        })
    }

    /// Concrete instant this token denotes relative to `now`.
    ///
    /// Months and years use calendar arithmetic. Returns `None` when the
    /// offset does not fit the supported date range.
    #[must_use]
    pub fn resolve(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let Self::Offset { amount, unit, .. } = *self else {
            return Some(now);
        };
        let amount_i64 = i64::try_from(amount).ok()?;
        let delta = match unit {
            TimeUnit::Second => TimeDelta::try_seconds(amount_i64),
            TimeUnit::Minute => TimeDelta::try_minutes(amount_i64),
            TimeUnit::Hour => TimeDelta::try_hours(amount_i64),
            TimeUnit::Day => TimeDelta::try_days(amount_i64),
            TimeUnit::Week => TimeDelta::try_weeks(amount_i64),
            TimeUnit::Month | TimeUnit::Year => {
                let months = if unit == TimeUnit::Year {
                    amount.checked_mul(12)?
                } else {
                    amount
                };
                let months = u32::try_from(months).ok()?;
                return now.checked_sub_months(Months::new(months));
            }
        };
        now.checked_sub_signed(delta?)
    }
}

impl fmt::Display for RelativeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Now => f.write_str(NOW),
            Self::Offset {
                amount,
                unit,
                anchored,
            } => {
                if *anchored {
                    f.write_str("now-")?;
                }
                write!(f, "{amount}{unit}")
            }
        }
    }
}

/// Normalize a relative token to its canonical spelling, or return `fallback`.
///
/// `now-5 minutes` becomes `now-5m`, `2 Hours` becomes `2h`. Anything that is
/// not `now` or an integer followed by a known unit word yields `fallback`.
#[must_use]
pub fn normalize_relative(value: &str, fallback: &str) -> String {
    match RelativeToken::parse(value) {
        Some(token) => token.to_string(),
        None => {
            tracing::trace!(target: "dashgrid.timerange", value, fallback, "relative token fell back");
            fallback.to_string()
        }
    }
}
