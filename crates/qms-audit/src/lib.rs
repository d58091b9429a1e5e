//! QMS Audit - enforcement log and manager approvals
//!
//! Persistence boundary for the enforcement engine:
//! - [`EnforcementStore`]: async trait owning attempt numbering and the audit trail
//! - [`InMemoryEnforcementStore`]: append-only, SHA-256 hash-chained reference store
//! - [`EnforcementLogger`]: best-effort wrapper; audit failures never block a submission
//!
//! # Example
//!
//! ```rust
//! use qms_audit::{EnforcementLogger, InMemoryEnforcementStore};
//! use qms_enforcement::FormType;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let logger = EnforcementLogger::new(Arc::new(InMemoryEnforcementStore::new()));
//! let attempt = logger.reserve_attempt(FormType::Nca, Some("nca-1"), "user-1").await;
//! assert_eq!(attempt, 1);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod logger;
pub mod memory;
pub mod record;
pub mod store;

// Re-exports
pub use logger::EnforcementLogger;
pub use memory::InMemoryEnforcementStore;
pub use record::{AttemptKey, EnforcementAction, EnforcementLogRecord, LogId, ManagerApproval};
pub use store::{EnforcementStore, LogEntry, StoreError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for the audit log
    pub use crate::{
        AttemptKey, EnforcementAction, EnforcementLogRecord, EnforcementLogger, EnforcementStore,
        InMemoryEnforcementStore, LogId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
