#![forbid(unsafe_code)]

//! Tracing subscriber setup for the `dashgrid` binary.
//!
//! The engine crates only emit `debug`/`trace` events under the
//! `dashgrid.layout` and `dashgrid.timerange` targets. Nothing is printed
//! unless a subscriber is installed here. `RUST_LOG`, when set, replaces the
//! configured filter.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Default filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. `warn` or `dashgrid.layout=debug`.
    pub level: String,
    pub format: LogFormat,
    /// Colorize pretty and compact output.
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            ansi: false,
        }
    }
}

impl LogSettings {
    /// Apply command-line verbosity on top of the configured level.
    ///
    /// - `quiet`: `error`
    /// - `-v`: `info`, `-vv`: `debug`, `-vvv` and up: `trace`
    /// - otherwise the configured level is kept
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            Some("error")
        } else {
            match verbose {
                0 => None,
                1 => Some("info"),
                2 => Some("debug"),
                _ => Some("trace"),
            }
        };
        if let Some(level) = level {
            self.level = level.to_string();
        }
        self
    }

    /// Problems with these settings; empty when usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        match EnvFilter::try_new(&self.level) {
            Ok(_) => Vec::new(),
            Err(err) => vec![format!(
                "logging.level {:?} is not a valid filter: {err}",
                self.level
            )],
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is left in place.
pub fn init_logging(settings: &LogSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match settings.format {
        LogFormat::Pretty => builder.with_ansi(settings.ansi).pretty().try_init(),
        LogFormat::Compact => builder.with_ansi(settings.ansi).compact().try_init(),
        LogFormat::Json => builder.with_ansi(false).json().try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_level() {
        let base = LogSettings::default();
        assert_eq!(base.clone().with_verbosity(0, false).level, "warn");
        assert_eq!(base.clone().with_verbosity(1, false).level, "info");
        assert_eq!(base.clone().with_verbosity(2, false).level, "debug");
        assert_eq!(base.clone().with_verbosity(9, false).level, "trace");
        assert_eq!(base.with_verbosity(3, true).level, "error");
    }

    #[test]
    fn validate_accepts_directives() {
        let settings = LogSettings {
            level: "warn,dashgrid.layout=trace".into(),
            ..LogSettings::default()
        };
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn validate_rejects_garbage() {
        let settings = LogSettings {
            level: "dashgrid=loud".into(),
            ..LogSettings::default()
        };
        let errors = settings.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("logging.level"));
    }

    #[test]
    fn second_init_is_a_no_op() {
        let settings = LogSettings::default();
        init_logging(&settings);
        assert!(!init_logging(&settings));
    }

    #[test]
    fn format_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LogFormat::Json).unwrap(), "\"json\"");
        let parsed: LogFormat = serde_json::from_str("\"pretty\"").unwrap();
        assert_eq!(parsed, LogFormat::Pretty);
    }
}
