use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnetaError {
    #[error("Invalid environment '{name}': expected development, staging, production or testing")]
    InvalidEnvironment { name: String },

    #[error("Unknown field '{field}' in section '{section}'")]
    UnknownField { section: String, field: String },

    #[error("Invalid value for {section}.{field}: {reason}")]
    InvalidValue {
        section: String,
        field: String,
        reason: String,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl AnetaError {
    pub(crate) fn invalid_value(section: &str, field: &str, reason: impl Into<String>) -> Self {
        AnetaError::InvalidValue {
            section: section.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_field(section: &str, field: &str) -> Self {
        AnetaError::UnknownField {
            section: section.to_string(),
            field: field.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnetaError {
    fn from(e: serde_json::Error) -> Self {
        AnetaError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnetaError>;
