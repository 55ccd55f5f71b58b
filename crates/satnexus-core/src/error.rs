//! Error types for SatNexus

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SatnexusError {
    // Request errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Access denied to {entity} {id}")]
    Forbidden { entity: &'static str, id: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SatnexusError {
    pub fn validation(message: impl Into<String>) -> Self {
        SatnexusError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        SatnexusError::NotFound { entity, id: id.to_string() }
    }

    pub fn forbidden(entity: &'static str, id: impl ToString) -> Self {
        SatnexusError::Forbidden { entity, id: id.to_string() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        SatnexusError::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        SatnexusError::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        SatnexusError::Storage(message.into())
    }

    /// Stable, machine-readable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SatnexusError::Validation(_) => ErrorKind::Validation,
            SatnexusError::NotFound { .. } => ErrorKind::NotFound,
            SatnexusError::Forbidden { .. } => ErrorKind::Forbidden,
            SatnexusError::Unauthorized(_) => ErrorKind::Unauthorized,
            SatnexusError::Conflict(_) => ErrorKind::Conflict,
            SatnexusError::Storage(_)
            | SatnexusError::ConfigInvalid { .. }
            | SatnexusError::Io(_)
            | SatnexusError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for SatnexusError {
    fn from(err: serde_json::Error) -> Self {
        SatnexusError::Serialization(err.to_string())
    }
}

/// Error kinds surfaced to callers at the operation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Unauthorized,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, SatnexusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SatnexusError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(SatnexusError::not_found("Image", "42").kind(), ErrorKind::NotFound);
        assert_eq!(SatnexusError::forbidden("Analysis", "7").kind(), ErrorKind::Forbidden);
        assert_eq!(SatnexusError::unauthorized("no token").kind(), ErrorKind::Unauthorized);
        assert_eq!(SatnexusError::conflict("taken").kind(), ErrorKind::Conflict);
        assert_eq!(SatnexusError::storage("down").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_messages() {
        let err = SatnexusError::not_found("Image", "abc");
        assert_eq!(err.to_string(), "Image not found: abc");

        let err = SatnexusError::forbidden("Analysis", "abc");
        assert_eq!(err.to_string(), "Access denied to Analysis abc");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
