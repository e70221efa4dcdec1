//! Error types for routelens.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RouteLensError>;

#[derive(Debug, thiserror::Error)]
pub enum RouteLensError {
    /// The syntax tree could not be built at all.
    #[error("Failed to parse {}: {message}", file.display())]
    ParseFailure { file: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

impl RouteLensError {
    pub fn parse_failure(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseFailure {
            file: file.into(),
            message: message.into(),
        }
    }
}
