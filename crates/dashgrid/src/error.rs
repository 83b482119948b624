use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashgridError>;

#[derive(Debug, Error)]
pub enum DashgridError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("unsupported config format (expected .toml or .json): {path}")]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("moved panel `{id}` is not in the layout")]
    UnknownMovedId { id: String },
}

impl DashgridError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::UnknownMovedId { .. } => 2,
            _ => 1,
        }
    }
}
