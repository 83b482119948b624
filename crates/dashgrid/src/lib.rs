#![forbid(unsafe_code)]

//! Dashboard grid layout and time-range handling.
//!
//! This crate re-exports the two engines and adds what a host process needs
//! around them: a configuration file, logging setup, and the `dashgrid`
//! command-line tool.
//!
//! - [`layout`]: panel compaction and grid geometry.
//! - [`timerange`]: time-range payloads, `abs:` encoding and labels.
//! - [`config`]: [`DashgridConfig`], loaded from TOML or JSON.
//! - [`logging`]: [`init_logging`] for the binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use dashgrid_layout as layout;
pub use dashgrid_timerange as timerange;

pub use cli::{Cli, Commands, execute, load_config, run, run_from_env};
pub use config::DashgridConfig;
pub use error::{DashgridError, Result};
pub use logging::{LogFormat, LogSettings, init_logging};
