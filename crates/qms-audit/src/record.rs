//! Audit record types
//!
//! One [`EnforcementLogRecord`] is written per submission attempt. Manager
//! decisions are kept beside the log as [`ManagerApproval`] entries keyed by
//! the record they approve.

use chrono::{DateTime, Utc};
use qms_enforcement::{
    EnforcementAttempt, EnforcementLevel, EnforcementOutcome, FormType, ValidationIssue,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Unique audit log entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogId(pub Ulid);

impl LogId {
    /// Generate new log ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for LogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attempts are numbered per (form type, form id, user)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptKey {
    /// Form kind
    pub form_type: FormType,
    /// Saved form id
    pub form_id: String,
    /// Submitting user
    pub user_id: String,
}

impl AttemptKey {
    /// Create attempt key
    #[inline]
    #[must_use]
    pub fn new(form_type: FormType, form_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            form_type,
            form_id: form_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for AttemptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.form_type, self.form_id, self.user_id)
    }
}

/// What the gate did with an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementAction {
    /// Advisory hints only
    HintShown,
    /// Issues shown as non-blocking requirements
    RequirementPromoted,
    /// Issues escalated to blocking errors
    ErrorEscalated,
    /// Submission parked until a manager approves
    ManagerApprovalRequired,
    /// Submission rejected
    SubmissionBlocked,
    /// Submission accepted
    SubmissionAllowed,
}

impl EnforcementAction {
    /// Stable snake_case name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HintShown => "hint_shown",
            Self::RequirementPromoted => "requirement_promoted",
            Self::ErrorEscalated => "error_escalated",
            Self::ManagerApprovalRequired => "manager_approval_required",
            Self::SubmissionBlocked => "submission_blocked",
            Self::SubmissionAllowed => "submission_allowed",
        }
    }
}

impl fmt::Display for EnforcementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One enforcement decision as persisted in the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementLogRecord {
    /// Form kind
    pub form_type: FormType,
    /// Form id; unsaved drafts have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    /// Submitting user
    pub user_id: String,
    /// 1-based attempt number
    pub attempt_number: u32,
    /// Level applied
    pub level: EnforcementLevel,
    /// Issues found before adaptation
    pub issues_found: Vec<ValidationIssue>,
    /// Requirement messages left after adaptation
    pub requirements_missing: Vec<String>,
    /// Blocking error messages after adaptation
    pub errors_blocking: Vec<String>,
    /// Action taken
    pub action: EnforcementAction,
    /// Manager approval was requested
    pub manager_approval_requested: bool,
    /// Free-text justification supplied with the attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    /// When the decision was made
    pub recorded_at: DateTime<Utc>,
    /// Snapshot of the adapted outcome
    pub validation_result: serde_json::Value,
}

impl EnforcementLogRecord {
    /// Build a record from an adapted outcome
    #[must_use]
    pub fn from_outcome(
        form_type: FormType,
        user_id: impl Into<String>,
        attempt_number: u32,
        issues: &[ValidationIssue],
        outcome: &EnforcementOutcome,
        action: EnforcementAction,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            form_type,
            form_id: None,
            user_id: user_id.into(),
            attempt_number,
            level: outcome.level,
            issues_found: issues.to_vec(),
            requirements_missing: outcome.requirements.iter().map(|r| r.message.clone()).collect(),
            errors_blocking: outcome.errors.iter().map(|e| e.message.clone()).collect(),
            action,
            manager_approval_requested: outcome.requires_manager_approval,
            justification: None,
            recorded_at,
            validation_result: serde_json::to_value(outcome).unwrap_or_default(),
        }
    }

    /// With form id
    #[inline]
    #[must_use]
    pub fn with_form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    /// With justification
    #[inline]
    #[must_use]
    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }

    /// Attempt key, if the form has been saved
    #[must_use]
    pub fn key(&self) -> Option<AttemptKey> {
        self.form_id
            .as_ref()
            .map(|id| AttemptKey::new(self.form_type, id.clone(), self.user_id.clone()))
    }

    /// View as a pattern-analysis attempt
    #[must_use]
    pub fn to_attempt(&self) -> EnforcementAttempt {
        let attempt = EnforcementAttempt::new(
            self.user_id.clone(),
            self.form_type,
            self.attempt_number,
            self.recorded_at,
            self.issues_found.clone(),
        );
        match &self.form_id {
            Some(id) => attempt.with_form_id(id.clone()),
            None => attempt,
        }
    }
}

/// Manager decision on a logged attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerApproval {
    /// Log entry the decision applies to
    pub log_id: LogId,
    /// Deciding manager
    pub manager_id: String,
    /// Approved or rejected
    pub approved: bool,
    /// Why
    pub justification: String,
    /// When the decision was made
    pub decided_at: DateTime<Utc>,
}

impl ManagerApproval {
    /// Create manager decision
    #[must_use]
    pub fn new(
        log_id: LogId,
        manager_id: impl Into<String>,
        approved: bool,
        justification: impl Into<String>,
        decided_at: DateTime<Utc>,
    ) -> Self {
        Self {
            log_id,
            manager_id: manager_id.into(),
            approved,
            justification: justification.into(),
            decided_at,
        }
    }
}
