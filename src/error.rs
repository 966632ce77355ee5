//! Error taxonomy for font generation
//!
//! Only configuration errors and output-directory I/O abort a run. Every
//! other variant is raised by a single pipeline stage and recovered by the
//! orchestrator, which skips the affected size.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{tool} command not found. Install with: {hint}")]
    ToolMissing { tool: String, hint: String },

    #[error("{tool} failed: {stderr}")]
    Conversion {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Font subsetting failed: {0}")]
    Subset(String),

    #[error("BDF encoding fix failed for {}: {source}", path.display())]
    Repair {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for GenError {
    fn from(error: config::ConfigError) -> Self {
        GenError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
