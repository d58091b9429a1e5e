//! Best-effort enforcement logger
//!
//! Wraps an [`EnforcementStore`] so that audit failures never block a
//! submission: store errors are reported through `tracing` and collapse to
//! `None`, `false` or attempt 1.

use crate::record::{AttemptKey, EnforcementLogRecord, LogId, ManagerApproval};
use crate::store::EnforcementStore;
use chrono::Utc;
use qms_enforcement::{EnforcementAttempt, FormType, ValidationPolicy};
use std::sync::Arc;

/// Audit logger over a shared store
#[derive(Debug)]
pub struct EnforcementLogger<S> {
    store: Arc<S>,
    policy: ValidationPolicy,
}

impl<S> Clone for EnforcementLogger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy.clone(),
        }
    }
}

impl<S: EnforcementStore> EnforcementLogger<S> {
    /// Create logger with the default policy
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            policy: ValidationPolicy::default(),
        }
    }

    /// With policy (justification minimum)
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Persist one enforcement decision
    pub async fn log_enforcement_action(&self, record: EnforcementLogRecord) -> Option<LogId> {
        let attempt = record.attempt_number;
        let action = record.action;
        match self.store.append(record).await {
            Ok(id) => {
                tracing::debug!("Logged {} for attempt {} as {}", action, attempt, id);
                Some(id)
            }
            Err(e) => {
                tracing::error!("Failed to log enforcement action: {}", e);
                None
            }
        }
    }

    /// Attempt number the next submission would get, without reserving it
    ///
    /// Unsaved forms (no id) are always on attempt 1.
    pub async fn attempt_number(&self, form_type: FormType, form_id: Option<&str>, user_id: &str) -> u32 {
        let Some(form_id) = form_id else {
            return 1;
        };
        let key = AttemptKey::new(form_type, form_id, user_id);
        match self.store.latest_attempt_number(&key).await {
            Ok(latest) => latest.unwrap_or(0).saturating_add(1),
            Err(e) => {
                tracing::error!("Failed to read attempt number for {}: {}", key, e);
                1
            }
        }
    }

    /// Allocate the attempt number for a submission
    pub async fn reserve_attempt(&self, form_type: FormType, form_id: Option<&str>, user_id: &str) -> u32 {
        let Some(form_id) = form_id else {
            return 1;
        };
        let key = AttemptKey::new(form_type, form_id, user_id);
        match self.store.reserve_attempt(&key).await {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("Failed to reserve attempt for {}: {}", key, e);
                1
            }
        }
    }

    /// Record a manager decision
    ///
    /// The justification is checked against the policy minimum before the
    /// store is touched. The store refuses entries that were not parked for
    /// approval. Returns whether the decision was stored.
    pub async fn record_manager_approval(
        &self,
        log_id: LogId,
        manager_id: &str,
        approved: bool,
        justification: &str,
    ) -> bool {
        if manager_id.trim().is_empty() {
            tracing::warn!("Rejected manager decision on {}: missing manager id", log_id);
            return false;
        }
        if let Err(e) = self.policy.check_justification(justification) {
            tracing::warn!("Rejected manager decision on {}: {}", log_id, e);
            return false;
        }

        let approval = ManagerApproval::new(log_id, manager_id, approved, justification.trim(), Utc::now());
        match self.store.record_manager_approval(approval).await {
            Ok(()) => {
                tracing::info!("Manager {} recorded decision on {} (approved: {})", manager_id, log_id, approved);
                true
            }
            Err(e) => {
                tracing::error!("Failed to record manager decision: {}", e);
                false
            }
        }
    }

    /// Whether the latest manager decision for `key` is an approval
    pub async fn is_approved(&self, key: &AttemptKey) -> bool {
        match self.store.latest_approval(key).await {
            Ok(approval) => approval.is_some_and(|a| a.approved),
            Err(e) => {
                tracing::error!("Failed to read manager decision for {}: {}", key, e);
                false
            }
        }
    }

    /// A user's attempt history for pattern analysis
    pub async fn user_history(&self, user_id: &str, form_type: FormType) -> Vec<EnforcementAttempt> {
        match self.store.attempts_for_user(user_id, form_type).await {
            Ok(records) => records.iter().map(EnforcementLogRecord::to_attempt).collect(),
            Err(e) => {
                tracing::error!("Failed to read history for {}: {}", user_id, e);
                Vec::new()
            }
        }
    }
}
