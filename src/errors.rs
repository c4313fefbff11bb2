//! Typed error definitions for phorg.
//! Covers the failures that stop a run before or during traversal; per-file
//! problems are reported as events and never surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhorgError {
    #[error("Missing required setting: {0} (pass it on the command line or in the config file)")]
    MissingSetting(&'static str),

    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source path is not a directory: {0}")]
    SourceNotDir(PathBuf),

    #[error("Target path exists but is not a directory: {0}")]
    TargetNotDir(PathBuf),

    #[error("Invalid date filter '{0}'; expected YYYY-MM-DD")]
    InvalidFilterDate(String),

    #[error("Invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl PhorgError {
    /// Stable numeric code, used as the process exit status.
    pub fn code(&self) -> i32 {
        match self {
            PhorgError::MissingSetting(_) => 2,
            PhorgError::SourceNotFound(_) => 3,
            PhorgError::SourceNotDir(_) => 4,
            PhorgError::TargetNotDir(_) => 5,
            PhorgError::InvalidFilterDate(_) => 6,
            PhorgError::Config { .. } => 7,
            PhorgError::Interrupted => 130,
        }
    }
}
