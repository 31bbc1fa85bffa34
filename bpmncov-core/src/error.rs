//! Error types for coverage operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("BPMN document not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Duplicate BPMN node id '{id}': node ids must be unique within the document")]
    DuplicateNodeId { id: String },

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(String),

    #[error("Marker pattern error: {0}")]
    MarkerPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoverageError {
    /// Attach the document path to a parser message
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error is caused by the BPMN input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputMissing(_) | Self::Parse { .. } | Self::DuplicateNodeId { .. }
        )
    }
}
