//! Error types for index maintenance.
//!
//! Errors are classified by recovery boundary:
//! - MalformedDocument: contained at the document, the refresh pass continues
//! - Io / Serialize: surfaced to the caller of the failing operation
//!
//! Missing directories and corrupt cache files are not errors at all; those
//! paths degrade to empty state inside the cache store.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Malformed document {path}: {reason}")]
    MalformedDocument { path: String, reason: String },

    #[error("Serialize error: {0}")]
    Serialize(String),
}

impl IndexError {
    /// True when the error is contained at a single source document and
    /// must not abort the surrounding pass.
    pub fn is_document_local(&self) -> bool {
        matches!(self, IndexError::MalformedDocument { .. })
    }
}

impl From<std::io::Error> for IndexError {
    fn from(err: std::io::Error) -> Self {
        IndexError::Io(err.to_string())
    }
}

/// Serializable error shape returned across the bridge seam.
///
/// `code` is a short machine-readable reason; `message` is for humans.
#[derive(Debug, Clone, Serialize)]
pub struct BridgeError {
    pub code: String,
    pub message: String,
}

impl BridgeError {
    pub fn missing_field(name: &str) -> Self {
        Self {
            code: "missing_field".to_string(),
            message: format!("Missing required field: {}", name),
        }
    }

    pub fn invalid_field(name: &str, detail: &str) -> Self {
        Self {
            code: "invalid_field".to_string(),
            message: format!("Invalid value for {}: {}", name, detail),
        }
    }

    pub fn unknown_action(action: &str) -> Self {
        Self {
            code: "unknown_action".to_string(),
            message: format!("Unknown action: {}", action),
        }
    }
}

impl From<&IndexError> for BridgeError {
    fn from(err: &IndexError) -> Self {
        let code = match err {
            IndexError::Io(_) => "io_error",
            IndexError::MalformedDocument { .. } => "malformed_document",
            IndexError::Serialize(_) => "serialize_error",
        };
        Self {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for BridgeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_local_classification() {
        let err = IndexError::MalformedDocument {
            path: "notes.md".to_string(),
            reason: "bad bytes".to_string(),
        };
        assert!(err.is_document_local());
        assert!(!IndexError::Io("disk".to_string()).is_document_local());
    }

    #[test]
    fn test_bridge_error_codes() {
        assert_eq!(BridgeError::missing_field("text").code, "missing_field");
        assert_eq!(BridgeError::unknown_action("nope").code, "unknown_action");

        let idx = IndexError::Serialize("boom".to_string());
        assert_eq!(BridgeError::from(&idx).code, "serialize_error");
    }
}
