//! QMS Core - submission gate for quality forms
//!
//! Ties the enforcement policy to the audit log:
//! - Validates NCA and MJC submissions with the configured policy
//! - Escalates enforcement by attempt number and records every decision
//! - Parks fourth and later attempts until a manager approves
//! - Computes follow-up due dates and cross-procedure references
//!
//! # Example
//!
//! ```rust
//! use qms_audit::InMemoryEnforcementStore;
//! use qms_core::{NcaSubmission, QmsConfig, SubmissionGate};
//! use qms_enforcement::NcCategory;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let gate = SubmissionGate::new(Arc::new(InMemoryEnforcementStore::new()), QmsConfig::new());
//! let nca = NcaSubmission::new("user-1", NcCategory::FinishedGoods, "Bad product.").with_form_id("nca-1");
//!
//! let decision = gate.validate_submission(&nca.into()).await;
//! assert!(decision.ready_for_submission, "first attempt is advisory only");
//! assert!(!decision.outcome.requirements.is_empty());
//! # });
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod crossref;
pub mod due_date;
pub mod error;
pub mod forms;
pub mod gate;

// Re-exports for convenience
pub use config::{DueDateConfig, QmsConfig, MAX_DUE_DAYS};
pub use crossref::{
    CrossReference, CrossReferenceResolver, RecordDirectory, RecordKind, RecordRef, RecordSummary,
};
pub use due_date::{add_working_days, is_overdue, nca_closure_due, temporary_repair_due};
pub use error::{ConfigError, CrossRefError, QmsError, Result};
pub use forms::{MjcSubmission, NcaSubmission, Submission, HYGIENE_CHECKLIST};
pub use gate::{SubmissionDecision, SubmissionGate};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with QMS Core
    pub use crate::{
        MjcSubmission, NcaSubmission, QmsConfig, QmsError, Submission, SubmissionDecision,
        SubmissionGate,
    };
    pub use qms_enforcement::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
