//! Error types for the enforcement policy
//!
//! The validators and the adapter are infallible. Errors only arise from:
//! - Parsing identifiers from strings
//! - Analysing an empty attempt history
//! - Manager-approval justifications that do not meet policy

/// Unknown identifier while parsing a form type or category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseKindError {
    /// What was being parsed
    pub kind: &'static str,
    /// Rejected input
    pub value: String,
}

impl ParseKindError {
    /// Create parse error
    #[inline]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Pattern analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// No attempts to analyse
    #[error("cannot analyze pattern from an empty attempt history")]
    EmptyHistory,
}

/// Manager-approval errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    /// Justification shorter than the policy minimum
    #[error("justification must be at least {required} characters (got {actual})")]
    JustificationTooShort {
        /// Policy minimum
        required: usize,
        /// Characters supplied after trimming
        actual: usize,
    },

    /// Manager identity missing
    #[error("manager id is required")]
    MissingManager,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_error_display() {
        let err = ApprovalError::JustificationTooShort {
            required: 50,
            actual: 12,
        };
        assert!(err.to_string().contains("at least 50"));
        assert!(err.to_string().contains("got 12"));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseKindError::new("form type", "recall");
        assert_eq!(err.to_string(), "unknown form type: 'recall'");
    }
}
