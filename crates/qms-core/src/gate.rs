//! Submission gate
//!
//! Drives one submission attempt end to end:
//!
//! ```text
//! confidential? ──yes──▶ allowed, nothing logged
//!      │no
//!      ▼
//! reserve attempt ─▶ validate ─▶ adapt to level ─▶ decide ─▶ audit log
//! ```
//!
//! Soft outcomes never block. Moderate and strict block while errors remain.
//! Manager-approval blocks until an approval is recorded for the form.

use crate::config::QmsConfig;
use crate::due_date::{nca_closure_due, temporary_repair_due};
use crate::error::{QmsError, Result};
use crate::forms::Submission;
use chrono::{DateTime, NaiveDate, Utc};
use qms_audit::{
    AttemptKey, EnforcementAction, EnforcementLogRecord, EnforcementLogger, EnforcementStore, LogId,
    ManagerApproval,
};
use qms_enforcement::{
    adapt_to_enforcement_level, analyze_user_pattern, detect_persistent_issue, escalation_message,
    ContentPattern, EnforcementLevel, EnforcementOutcome, FieldReport, FormType, UserPattern,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDecision {
    /// Attempt number used
    pub attempt_number: u32,
    /// Raw validation result
    pub report: FieldReport,
    /// Level-specific rendering
    pub outcome: EnforcementOutcome,
    /// The submission may proceed
    pub ready_for_submission: bool,
    /// Action recorded
    pub action: EnforcementAction,
    /// Audit entry, when logging succeeded
    pub log_id: Option<LogId>,
    /// Guidance for this attempt
    pub escalation_message: String,
    /// Validation skipped for a confidential report
    pub bypassed: bool,
    /// Follow-up deadline for an accepted submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Progressive enforcement over an audit store
#[derive(Debug)]
pub struct SubmissionGate<S> {
    logger: EnforcementLogger<S>,
    config: QmsConfig,
}

impl<S: EnforcementStore> SubmissionGate<S> {
    /// Create gate
    #[must_use]
    pub fn new(store: Arc<S>, config: QmsConfig) -> Self {
        let logger = EnforcementLogger::new(store).with_policy(config.policy.clone());
        Self { logger, config }
    }

    /// Audit logger
    #[inline]
    #[must_use]
    pub fn logger(&self) -> &EnforcementLogger<S> {
        &self.logger
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &QmsConfig {
        &self.config
    }

    /// Validate a submission and apply the enforcement level for its attempt
    pub async fn validate_submission(&self, submission: &Submission) -> SubmissionDecision {
        let form_type = submission.form_type();
        let form_id = submission.form_id();
        let user_id = submission.user_id();
        let now = Utc::now();

        if self.config.confidential_bypass && submission.is_confidential() {
            tracing::info!("Confidential {} from {} bypasses enforcement", form_type, user_id);
            return SubmissionDecision {
                attempt_number: 1,
                report: FieldReport::default(),
                outcome: adapt_to_enforcement_level(&[], 1),
                ready_for_submission: true,
                action: EnforcementAction::SubmissionAllowed,
                log_id: None,
                escalation_message: escalation_message(1).to_string(),
                bypassed: true,
                due_date: self.due_date(submission, now),
            };
        }

        let attempt_number = self.logger.reserve_attempt(form_type, form_id, user_id).await;
        let report = submission.validate(&self.config.policy);
        let outcome = adapt_to_enforcement_level(&report.issues, attempt_number);
        tracing::debug!(
            "Attempt {} on {} by {}: {} issues at {} level",
            attempt_number,
            form_type,
            user_id,
            report.issues.len(),
            outcome.level
        );

        let approved = match (outcome.requires_manager_approval, form_id) {
            (true, Some(id)) => {
                self.logger
                    .is_approved(&AttemptKey::new(form_type, id, user_id))
                    .await
            }
            _ => false,
        };
        let (ready_for_submission, action) = decide(&outcome, approved);

        let mut record = EnforcementLogRecord::from_outcome(
            form_type,
            user_id,
            attempt_number,
            &report.issues,
            &outcome,
            action,
            now,
        );
        if let Some(id) = form_id {
            record = record.with_form_id(id);
        }
        let log_id = self.logger.log_enforcement_action(record).await;

        match action {
            EnforcementAction::ManagerApprovalRequired => {
                tracing::warn!("{} by {} requires manager approval (attempt {})", form_type, user_id, attempt_number);
            }
            EnforcementAction::SubmissionBlocked | EnforcementAction::ErrorEscalated => {
                tracing::info!("{} by {} blocked with {} errors", form_type, user_id, outcome.errors.len());
            }
            _ => {}
        }

        SubmissionDecision {
            attempt_number,
            report,
            ready_for_submission,
            action,
            log_id,
            escalation_message: escalation_message(attempt_number).to_string(),
            bypassed: false,
            due_date: ready_for_submission
                .then(|| self.due_date(submission, now))
                .flatten(),
            outcome,
        }
    }

    /// Record a manager decision on a logged attempt
    ///
    /// # Errors
    /// - `QmsError::Store(StoreError::NotFound)` if the entry does not exist
    /// - `QmsError::ApprovalNotRequested` if the attempt did not need approval
    /// - `QmsError::Approval` if the manager id is empty or the justification too short
    /// - `QmsError::Store(StoreError::AlreadyDecided)` on a second decision
    pub async fn approve(
        &self,
        log_id: LogId,
        manager_id: &str,
        approved: bool,
        justification: &str,
    ) -> Result<()> {
        let store = self.logger.store();
        let entry = store
            .entry(log_id)
            .await?
            .ok_or(qms_audit::StoreError::NotFound(log_id))?;
        if !entry.record.manager_approval_requested {
            return Err(QmsError::ApprovalNotRequested(log_id));
        }
        if manager_id.trim().is_empty() {
            return Err(qms_enforcement::ApprovalError::MissingManager.into());
        }
        self.config.policy.check_justification(justification)?;

        store
            .record_manager_approval(ManagerApproval::new(
                log_id,
                manager_id,
                approved,
                justification.trim(),
                Utc::now(),
            ))
            .await?;
        tracing::info!("Manager {} {} entry {}", manager_id, if approved { "approved" } else { "rejected" }, log_id);
        Ok(())
    }

    /// Pattern over a user's recorded attempts
    ///
    /// # Errors
    /// - `QmsError::Pattern` if the user has no recorded attempts
    pub async fn user_pattern(&self, user_id: &str, form_type: FormType) -> Result<UserPattern> {
        let history = self.logger.user_history(user_id, form_type).await;
        Ok(analyze_user_pattern(&history)?)
    }

    /// Issue the user keeps hitting, if any
    pub async fn persistent_issue(&self, user_id: &str, form_type: FormType) -> Option<ContentPattern> {
        let history = self.logger.user_history(user_id, form_type).await;
        detect_persistent_issue(&history)
    }

    fn due_date(&self, submission: &Submission, now: DateTime<Utc>) -> Option<NaiveDate> {
        let today = now.date_naive();
        match submission {
            Submission::Nca(_) => Some(nca_closure_due(&self.config.due_dates, today)),
            Submission::Mjc(mjc) if mjc.temporary_repair => {
                Some(temporary_repair_due(&self.config.due_dates, today))
            }
            Submission::Mjc(_) => None,
        }
    }
}

/// Whether the attempt may proceed, and the action to record
fn decide(outcome: &EnforcementOutcome, approved: bool) -> (bool, EnforcementAction) {
    if outcome.requires_manager_approval {
        return if approved {
            (true, EnforcementAction::SubmissionAllowed)
        } else {
            (false, EnforcementAction::ManagerApprovalRequired)
        };
    }
    if !outcome.errors.is_empty() {
        let action = match outcome.level {
            EnforcementLevel::Moderate => EnforcementAction::ErrorEscalated,
            _ => EnforcementAction::SubmissionBlocked,
        };
        return (false, action);
    }
    match (outcome.requirements.is_empty(), outcome.level) {
        (true, _) => (true, EnforcementAction::SubmissionAllowed),
        (false, EnforcementLevel::Soft) => (true, EnforcementAction::HintShown),
        (false, _) => (true, EnforcementAction::RequirementPromoted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qms_enforcement::ValidationIssue;

    fn issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::error("nc_description", "Too short."),
            ValidationIssue::warning("corrective_action", "Add a timeline."),
        ]
    }

    #[test]
    fn soft_never_blocks() {
        let outcome = adapt_to_enforcement_level(&issues(), 1);
        assert_eq!(decide(&outcome, false), (true, EnforcementAction::HintShown));
    }

    #[test]
    fn moderate_blocks_on_errors() {
        let outcome = adapt_to_enforcement_level(&issues(), 2);
        assert_eq!(decide(&outcome, false), (false, EnforcementAction::ErrorEscalated));

        let warnings = vec![ValidationIssue::warning("corrective_action", "Add a timeline.")];
        let outcome = adapt_to_enforcement_level(&warnings, 2);
        assert_eq!(decide(&outcome, false), (true, EnforcementAction::RequirementPromoted));
    }

    #[test]
    fn strict_blocks_on_any_issue() {
        let warnings = vec![ValidationIssue::warning("corrective_action", "Add a timeline.")];
        let outcome = adapt_to_enforcement_level(&warnings, 3);
        assert_eq!(decide(&outcome, false), (false, EnforcementAction::SubmissionBlocked));
    }

    #[test]
    fn manager_approval_gates_clean_submissions_too() {
        let outcome = adapt_to_enforcement_level(&[], 4);
        assert_eq!(decide(&outcome, false), (false, EnforcementAction::ManagerApprovalRequired));
        assert_eq!(decide(&outcome, true), (true, EnforcementAction::SubmissionAllowed));
    }

    #[test]
    fn clean_submission_is_allowed() {
        let outcome = adapt_to_enforcement_level(&[], 3);
        assert_eq!(decide(&outcome, false), (true, EnforcementAction::SubmissionAllowed));
    }
}
