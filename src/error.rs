use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Station file parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Source directory not found: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Ingestion failed: {stages}")]
    IngestionFailed { stages: String },

    #[error("{message}")]
    InvalidQuery {
        parameter: &'static str,
        message: String,
    },
}

impl PipelineError {
    pub fn invalid_query(parameter: &'static str, message: impl Into<String>) -> Self {
        PipelineError::InvalidQuery {
            parameter,
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidQuery { .. })
    }
}
