#![forbid(unsafe_code)]

//! Configuration for the dashgrid front end.
//!
//! Every section has defaults equal to the built-in constants, so a file only
//! needs the keys it changes.
//!
//! ```toml
//! # dashgrid.toml
//! [grid]
//! row_h = 48
//!
//! [time_range]
//! default_from = "15m"
//! label_format = "%d %b %H:%M"
//!
//! [logging]
//! level = "dashgrid.layout=debug"
//! format = "json"
//! ```

use std::path::Path;

use dashgrid_layout::GridMetrics;
use dashgrid_timerange::{TimeRangeNormalizer, TimeRangeOptions};
use serde::{Deserialize, Serialize};

use crate::error::{DashgridError, Result};
use crate::logging::LogSettings;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashgridConfig {
    /// Grid geometry used for pixel conversions.
    pub grid: GridMetrics,
    /// Time-range defaults and label layout.
    pub time_range: TimeRangeOptions,
    pub logging: LogSettings,
}

impl DashgridConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a `.toml` or `.json` file, chosen by extension, and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path)?,
            Some("json") => Self::from_json_file(path)?,
            _ => {
                return Err(DashgridError::UnsupportedConfigFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        tracing::debug!(path = %path.display(), "loaded configuration");
        config.validated()
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.grid.cols == 0 {
            errors.push("grid.cols must be > 0".to_string());
        }
        if self.grid.row_h == 0 {
            errors.push("grid.row_h must be > 0".to_string());
        }
        errors.extend(self.time_range.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing, otherwise
    /// [`DashgridError::Validation`].
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(DashgridError::Validation(errors))
        }
    }

    /// Time-range normalizer built from the `time_range` section.
    #[must_use]
    pub fn normalizer(&self) -> TimeRangeNormalizer {
        TimeRangeNormalizer::new(self.time_range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use dashgrid_layout::{COLS, GAP, ROW_H};

    #[test]
    fn defaults_match_constants() {
        let config = DashgridConfig::default();
        assert_eq!(config.grid.cols, COLS);
        assert_eq!(config.grid.row_h, ROW_H);
        assert_eq!(config.grid.gap, GAP);
        assert_eq!(config.time_range, TimeRangeOptions::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = DashgridConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashgridConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = DashgridConfig::from_toml_str(
            r#"
            [grid]
            row_h = 48

            [time_range]
            default_from = "15m"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.row_h, 48);
        assert_eq!(config.grid.cols, COLS);
        assert_eq!(config.time_range.default_from, "15m");
        assert_eq!(config.time_range.default_to, "now");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn partial_json() {
        let config =
            DashgridConfig::from_json_str(r#"{"grid": {"gap": 8}, "time_range": {"quick_ranges": ["1h"]}}"#)
                .unwrap();
        assert_eq!(config.grid.gap, 8);
        assert_eq!(config.time_range.quick_ranges, vec!["1h".to_string()]);
    }

    #[test]
    fn validate_collects_every_error() {
        let mut config = DashgridConfig::default();
        config.grid.cols = 0;
        config.grid.row_h = 0;
        config.time_range.default_from = "sometime".into();
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].contains("grid.cols"));
        assert!(errors[1].contains("grid.row_h"));
        assert!(errors[2].contains("default_from"));
    }

    #[test]
    fn validated_maps_to_error() {
        let mut config = DashgridConfig::default();
        config.grid.cols = 0;
        let err = config.validated().unwrap_err();
        assert!(matches!(err, DashgridError::Validation(ref e) if e.len() == 1));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = DashgridConfig::from_toml_str("[grid\ncols = 3").unwrap_err();
        assert!(matches!(err, DashgridError::Toml(_)));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let err = DashgridConfig::from_json_str(r#"{"grid": {"cols": "twelve"}}"#).unwrap_err();
        assert!(matches!(err, DashgridError::Json(_)));
    }

    #[test]
    fn normalizer_uses_section() {
        let mut config = DashgridConfig::default();
        config.time_range.default_from = "6h".into();
        assert_eq!(config.normalizer().format_label(""), "Last 6h");
    }
}
