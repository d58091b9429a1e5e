//! Enforcement store boundary
//!
//! The store owns attempt numbering and the audit trail. Implementations
//! must make [`EnforcementStore::reserve_attempt`] atomic: two concurrent
//! submissions for the same key never receive the same number.

use crate::record::{AttemptKey, EnforcementLogRecord, LogId, ManagerApproval};
use async_trait::async_trait;
use qms_enforcement::FormType;
use serde::{Deserialize, Serialize};

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Attempt number already recorded for the key
    #[error("attempt {attempt} already recorded for {key}")]
    AttemptConflict {
        /// Offending key
        key: AttemptKey,
        /// Duplicate attempt number
        attempt: u32,
    },

    /// No entry with this id
    #[error("log entry not found: {0}")]
    NotFound(LogId),

    /// A manager already decided on this entry
    #[error("manager decision already recorded for {0}")]
    AlreadyDecided(LogId),

    /// Entry was not parked for manager approval
    #[error("manager approval was not requested for {0}")]
    ApprovalNotRequested(LogId),

    /// Hash chain broken at the given position
    #[error("audit log integrity violation at entry {index}")]
    IntegrityViolation {
        /// Position of the first bad entry
        index: usize,
    },

    /// Backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Stored audit entry with its chain hashes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry id
    pub id: LogId,
    /// Recorded decision
    pub record: EnforcementLogRecord,
    /// Hash of the previous entry; zero for the first
    pub prev_hash: [u8; 32],
    /// SHA-256 over this entry and `prev_hash`
    pub hash: [u8; 32],
}

impl LogEntry {
    /// Entry hash as lowercase hex
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Persistence for enforcement decisions
#[async_trait]
pub trait EnforcementStore: Send + Sync {
    /// Allocate the next attempt number for `key`
    ///
    /// Starts at 1 and never hands out the same number twice for a key.
    async fn reserve_attempt(&self, key: &AttemptKey) -> Result<u32, StoreError>;

    /// Highest attempt number recorded for `key`
    async fn latest_attempt_number(&self, key: &AttemptKey) -> Result<Option<u32>, StoreError>;

    /// Append a decision
    ///
    /// # Errors
    /// - `StoreError::AttemptConflict` if the attempt number is already recorded for the key
    async fn append(&self, record: EnforcementLogRecord) -> Result<LogId, StoreError>;

    /// Fetch one entry
    async fn entry(&self, id: LogId) -> Result<Option<LogEntry>, StoreError>;

    /// Record a manager decision against an entry
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the entry does not exist
    /// - `StoreError::ApprovalNotRequested` if the entry was not parked for approval
    /// - `StoreError::AlreadyDecided` if a decision is already recorded
    async fn record_manager_approval(&self, approval: ManagerApproval) -> Result<(), StoreError>;

    /// Latest manager decision on any entry for `key`
    async fn latest_approval(&self, key: &AttemptKey) -> Result<Option<ManagerApproval>, StoreError>;

    /// A user's records for one form kind, oldest first
    async fn attempts_for_user(
        &self,
        user_id: &str,
        form_type: FormType,
    ) -> Result<Vec<EnforcementLogRecord>, StoreError>;
}
