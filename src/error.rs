use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during recipe conversion
///
/// Parsing itself never fails: unrecognized lines are ignored. Errors only come
/// from the file plumbing around a conversion and from configuration.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The named source file or directory does not exist
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize or deserialize a recipe document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
