// src/infra/errors.rs — Error types for rageval

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagEvalError {
    // Configuration errors (fail fast)
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Extraction
    #[error("No valid structured data found")]
    NoStructuredData,

    // Formatting
    #[error("Training and metadata {role} turns disagree: {detail}")]
    ParityMismatch { role: String, detail: String },

    // Conversation log
    #[error("Invalid conversation log: {0}")]
    InvalidLog(String),

    // Infra
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RagEvalError {
    /// Whether the error comes from caller-supplied configuration rather than data.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            RagEvalError::UnknownTemplate(_) | RagEvalError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RagEvalError>;
