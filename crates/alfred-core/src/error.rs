//! Error types for the Alfred engine.

use thiserror::Error;

/// A shared error type for the Alfred workspace.
///
/// Provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Note that the dialogue
/// engine itself never surfaces these to the transport layer: every turn
/// degrades to a textual reply (see `alfred-engine`). These errors live at
/// the startup/storage boundary.
#[derive(Error, Debug)]
pub enum AlfredError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "TOML", "CSV"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Static data failed to load; fatal at startup
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Intent classification failed (degenerate model or vocabulary)
    #[error("Classification error: {0}")]
    Classification(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AlfredError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a DataLoad error
    pub fn data_load(message: impl Into<String>) -> Self {
        Self::DataLoad(message.into())
    }

    /// Creates a Classification error
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for AlfredError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AlfredError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AlfredError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AlfredError>`.
pub type Result<T> = std::result::Result<T, AlfredError>;
