//! QMS Enforcement - progressive quality enforcement policy
//!
//! Pure, synchronous policy for quality submissions:
//! - **Validators**: inspect one text field and emit typed issues
//! - **Levels**: map an attempt number to soft, moderate, strict or
//!   manager-approval enforcement
//! - **Adapter**: render an issue list as hints, requirements or blocking errors
//! - **Patterns**: reduce a user's attempt history for reporting
//!
//! Nothing in this crate performs I/O; persistence lives in `qms-audit`.
//!
//! # Example
//!
//! ```rust
//! use qms_enforcement::{adapt_to_enforcement_level, validate_description_completeness, EnforcementLevel, NcCategory};
//!
//! let report = validate_description_completeness("Bad product.", NcCategory::FinishedGoods);
//! assert!(!report.is_valid());
//!
//! let first = adapt_to_enforcement_level(&report.issues, 1);
//! assert_eq!(first.level, EnforcementLevel::Soft);
//! assert!(first.errors.is_empty());
//!
//! let third = adapt_to_enforcement_level(&report.issues, 3);
//! assert!(third.errors.iter().any(|e| e.message.contains("must be addressed")));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod adapter;
pub mod error;
pub mod issue;
pub mod level;
pub mod pattern;
pub mod policy;
pub mod validators;

// Re-exports
pub use adapter::{adapt_to_enforcement_level, EnforcementOutcome};
pub use error::{ApprovalError, ParseKindError, PatternError};
pub use issue::{FieldReport, FormType, NcCategory, Severity, ValidationIssue};
pub use level::{enforcement_level, escalation_message, EnforcementLevel};
pub use pattern::{
    analyze_user_pattern, detect_persistent_issue, ContentPattern, EnforcementAttempt, UserPattern,
};
pub use policy::{validate_justification, ValidationPolicy, MIN_JUSTIFICATION_LEN};
pub use validators::{
    detect_vague_language, require_specific_details, validate_corrective_action_specificity,
    validate_description_completeness, validate_maintenance_description,
    validate_root_cause_depth,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for enforcement policy
    pub use crate::{
        adapt_to_enforcement_level, enforcement_level, EnforcementLevel, EnforcementOutcome,
        FieldReport, FormType, NcCategory, Severity, ValidationIssue, ValidationPolicy,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
