//! In-memory enforcement store
//!
//! Append-only and hash-chained. Every operation runs under one
//! `parking_lot::Mutex`, so reservation and conditional insert are each a
//! single critical section.

use crate::record::{AttemptKey, EnforcementLogRecord, LogId, ManagerApproval};
use crate::store::{EnforcementStore, LogEntry, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use qms_enforcement::FormType;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<LogEntry>,
    reserved: HashMap<AttemptKey, u32>,
    approvals: HashMap<LogId, ManagerApproval>,
}

impl Inner {
    fn latest_recorded(&self, key: &AttemptKey) -> Option<u32> {
        self.entries
            .iter()
            .filter(|e| e.record.key().as_ref() == Some(key))
            .map(|e| e.record.attempt_number)
            .max()
    }
}

/// Reference [`EnforcementStore`] backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryEnforcementStore {
    inner: Mutex<Inner>,
}

impl InMemoryEnforcementStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Snapshot of every entry, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().entries.clone()
    }

    /// Hash of the newest entry as hex
    #[must_use]
    pub fn head_hash(&self) -> Option<String> {
        self.inner.lock().entries.last().map(LogEntry::hash_hex)
    }

    /// Walk the chain and recompute every hash
    ///
    /// # Errors
    /// - `StoreError::IntegrityViolation` at the first entry whose link or hash does not match
    pub fn verify_integrity(&self) -> Result<(), StoreError> {
        let guard = self.inner.lock();
        let mut prev = [0u8; 32];
        for (index, entry) in guard.entries.iter().enumerate() {
            if entry.prev_hash != prev || entry.hash != compute_hash(entry) {
                return Err(StoreError::IntegrityViolation { index });
            }
            prev = entry.hash;
        }
        Ok(())
    }
}

#[async_trait]
impl EnforcementStore for InMemoryEnforcementStore {
    async fn reserve_attempt(&self, key: &AttemptKey) -> Result<u32, StoreError> {
        let mut guard = self.inner.lock();
        let floor = guard.latest_recorded(key).unwrap_or(0);
        let next = guard
            .reserved
            .get(key)
            .copied()
            .unwrap_or(0)
            .max(floor)
            .saturating_add(1);
        guard.reserved.insert(key.clone(), next);
        tracing::debug!("Reserved attempt {} for {}", next, key);
        Ok(next)
    }

    async fn latest_attempt_number(&self, key: &AttemptKey) -> Result<Option<u32>, StoreError> {
        Ok(self.inner.lock().latest_recorded(key))
    }

    async fn append(&self, record: EnforcementLogRecord) -> Result<LogId, StoreError> {
        let mut guard = self.inner.lock();

        if let Some(key) = record.key() {
            let duplicate = guard.entries.iter().any(|e| {
                e.record.attempt_number == record.attempt_number
                    && e.record.key().as_ref() == Some(&key)
            });
            if duplicate {
                return Err(StoreError::AttemptConflict {
                    key,
                    attempt: record.attempt_number,
                });
            }
        }

        let prev_hash = guard.entries.last().map_or([0u8; 32], |e| e.hash);
        let mut entry = LogEntry {
            id: LogId::new(),
            record,
            prev_hash,
            hash: [0u8; 32],
        };
        entry.hash = compute_hash(&entry);
        let id = entry.id;
        guard.entries.push(entry);
        Ok(id)
    }

    async fn entry(&self, id: LogId) -> Result<Option<LogEntry>, StoreError> {
        Ok(self.inner.lock().entries.iter().find(|e| e.id == id).cloned())
    }

    async fn record_manager_approval(&self, approval: ManagerApproval) -> Result<(), StoreError> {
        let mut guard = self.inner.lock();
        let Some(entry) = guard.entries.iter().find(|e| e.id == approval.log_id) else {
            return Err(StoreError::NotFound(approval.log_id));
        };
        if !entry.record.manager_approval_requested {
            return Err(StoreError::ApprovalNotRequested(approval.log_id));
        }
        if guard.approvals.contains_key(&approval.log_id) {
            return Err(StoreError::AlreadyDecided(approval.log_id));
        }
        guard.approvals.insert(approval.log_id, approval);
        Ok(())
    }

    async fn latest_approval(&self, key: &AttemptKey) -> Result<Option<ManagerApproval>, StoreError> {
        let guard = self.inner.lock();
        let latest = guard
            .entries
            .iter()
            .rev()
            .filter(|e| e.record.key().as_ref() == Some(key))
            .find_map(|e| guard.approvals.get(&e.id))
            .cloned();
        Ok(latest)
    }

    async fn attempts_for_user(
        &self,
        user_id: &str,
        form_type: FormType,
    ) -> Result<Vec<EnforcementLogRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .entries
            .iter()
            .filter(|e| e.record.user_id == user_id && e.record.form_type == form_type)
            .map(|e| e.record.clone())
            .collect())
    }
}

/// Hash of the entry id, the full serialized record and the previous hash
fn compute_hash(entry: &LogEntry) -> [u8; 32] {
    let record = serde_json::to_vec(&entry.record).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(entry.id.0.to_bytes());
    hasher.update(&record);
    hasher.update(entry.prev_hash);
    hasher.finalize().into()
}
