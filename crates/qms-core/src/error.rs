//! Error types for QMS Core
//!
//! Collects the per-crate errors behind one [`QmsError`]:
//! - Configuration loading
//! - Audit store failures
//! - Manager-approval and pattern-analysis errors
//! - Cross-reference lookups

use qms_audit::{LogId, StoreError};
use qms_enforcement::{ApprovalError, ParseKindError, PatternError};
use std::path::PathBuf;

/// Main QMS error type
#[derive(Debug, thiserror::Error)]
pub enum QmsError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Audit store error
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Manager approval rejected
    #[error("approval error: {0}")]
    Approval(#[from] ApprovalError),

    /// Pattern analysis failed
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Unknown identifier
    #[error(transparent)]
    Parse(#[from] ParseKindError),

    /// Cross-reference lookup failed
    #[error("cross-reference error: {0}")]
    CrossReference(#[from] CrossRefError),

    /// Log entry is not waiting for a manager decision
    #[error("log entry {0} does not require manager approval")]
    ApprovalNotRequested(LogId),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::QmsConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Cross-reference errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrossRefError {
    /// Record not found in the directory
    #[error("record not found: {0}")]
    NotFound(String),

    /// Directory backend failure
    #[error("record directory error: {0}")]
    Directory(String),
}

/// Result type for QMS operations
pub type Result<T> = std::result::Result<T, QmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_conversions() {
        let err: QmsError = ApprovalError::MissingManager.into();
        assert!(matches!(err, QmsError::Approval(_)));

        let err: QmsError = PatternError::EmptyHistory.into();
        assert!(err.to_string().starts_with("pattern error"));

        let err: QmsError = ParseKindError::new("form type", "xyz").into();
        assert_eq!(err.to_string(), "unknown form type: 'xyz'");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "justification_min",
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for justification_min: must be at least 1"
        );
    }
}
