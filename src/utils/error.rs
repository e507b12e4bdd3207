use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Product source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    #[error("Oracle call failed: {reason}")]
    OracleError { reason: String },

    #[error("Cache operation failed: {reason}")]
    CacheError { reason: String },

    #[error("Invalid request: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ScoutError {
    /// Exit code for the CLI: 2 for caller mistakes (bad request or bad
    /// config), 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScoutError::ValidationError { .. }
            | ScoutError::ConfigError { .. }
            | ScoutError::InvalidConfigValue { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
