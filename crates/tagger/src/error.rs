use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Label not found: {0}")]
    MissingLabel(String),

    #[error("Label store write failed for {id}: {message}")]
    UpstreamWrite { id: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot error: {path}: {message}")]
    Snapshot { path: String, message: String },
}

impl TaggerError {
    pub fn invalid_pattern(pattern: &str, message: impl Into<String>) -> Self {
        TaggerError::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }

    /// Errors a person editing a pattern should see inline instead of a crash.
    pub fn is_user_feedback(&self) -> bool {
        matches!(
            self,
            TaggerError::InvalidPattern { .. } | TaggerError::MissingLabel(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TaggerError>;
