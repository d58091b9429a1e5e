//! Enforcement adapter
//!
//! Re-renders one issue list according to the level implied by the attempt
//! number. Output depends only on the inputs: no clock, no randomness.

use crate::issue::ValidationIssue;
use crate::level::{escalation_message, EnforcementLevel};
use serde::{Deserialize, Serialize};

/// Suffix on errors promoted at the moderate level
pub const MODERATE_ERROR_SUFFIX: &str = "This is required for compliance.";
/// Suffix on requirements at the moderate level
pub const MODERATE_REQUIREMENT_SUFFIX: &str = "Please address this before submitting.";
/// Suffix on errors at the strict level
pub const STRICT_ERROR_SUFFIX: &str = "This must be addressed before submission.";
/// Suffix on errors at the manager-approval level
pub const MANAGER_ERROR_SUFFIX: &str =
    "This must be addressed before submission. Manager approval is required to proceed.";

/// Level-specific rendering of a validation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementOutcome {
    /// Level applied
    pub level: EnforcementLevel,
    /// Guidance lines shown alongside the form
    pub hints: Vec<String>,
    /// Non-blocking requirements
    pub requirements: Vec<ValidationIssue>,
    /// Blocking errors
    pub errors: Vec<ValidationIssue>,
    /// Submission needs a recorded manager approval
    pub requires_manager_approval: bool,
    /// Why the level is above soft
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_reason: Option<String>,
}

impl EnforcementOutcome {
    /// Whether the submission is blocked
    #[inline]
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.requires_manager_approval || !self.errors.is_empty()
    }

    /// Whether nothing remains to address
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.errors.is_empty() && self.requirements.is_empty()
    }
}

/// Adapt validation issues to the enforcement level for `attempt_number`
///
/// - Soft: every issue is a requirement, no errors
/// - Moderate: error-severity issues block, the rest are requirements
/// - Strict: every issue blocks
/// - ManagerApproval: as strict, and a manager must approve
///
/// Attempt 0 is treated as attempt 1.
#[must_use]
pub fn adapt_to_enforcement_level(
    issues: &[ValidationIssue],
    attempt_number: u32,
) -> EnforcementOutcome {
    let attempt_number = attempt_number.max(1);
    let level = EnforcementLevel::for_attempt(attempt_number);

    let mut hints = vec![escalation_message(attempt_number).to_string()];
    let mut requirements = Vec::new();
    let mut errors = Vec::new();

    for issue in issues {
        match level {
            EnforcementLevel::Soft => {
                if let Some(example) = &issue.example_fix {
                    if !hints.contains(example) {
                        hints.push(example.clone());
                    }
                }
                requirements.push(issue.clone());
            }
            EnforcementLevel::Moderate => {
                if issue.is_error() {
                    errors.push(issue.with_suffix(MODERATE_ERROR_SUFFIX));
                } else {
                    requirements.push(issue.with_suffix(MODERATE_REQUIREMENT_SUFFIX));
                }
            }
            EnforcementLevel::Strict => errors.push(issue.with_suffix(STRICT_ERROR_SUFFIX)),
            EnforcementLevel::ManagerApproval => {
                errors.push(issue.with_suffix(MANAGER_ERROR_SUFFIX));
            }
        }
    }

    let escalation_reason = (attempt_number > 1).then(|| {
        format!(
            "This is attempt {attempt_number}. Previous attempts had similar issues that need to be addressed."
        )
    });

    EnforcementOutcome {
        level,
        hints,
        requirements,
        errors,
        requires_manager_approval: level == EnforcementLevel::ManagerApproval,
        escalation_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::error("nc_description", "Description too short.")
                .with_reference("BRCGS 5.7.2")
                .with_example("Example: batch B-2045 at 14:30"),
            ValidationIssue::warning("corrective_action", "Include a timeline."),
        ]
    }

    #[test]
    fn soft_never_blocks() {
        let outcome = adapt_to_enforcement_level(&issues(), 1);

        assert_eq!(outcome.level, EnforcementLevel::Soft);
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.requirements, issues());
        assert!(!outcome.is_blocked());
        assert!(outcome.escalation_reason.is_none());
        assert_eq!(outcome.hints.len(), 2, "guidance plus one example fix");
    }

    #[test]
    fn moderate_promotes_errors_only() {
        let outcome = adapt_to_enforcement_level(&issues(), 2);

        assert_eq!(outcome.level, EnforcementLevel::Moderate);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(
            outcome.errors[0].message,
            "Description too short. This is required for compliance."
        );
        assert_eq!(outcome.errors[0].compliance_reference.as_deref(), Some("BRCGS 5.7.2"));
        assert_eq!(outcome.requirements.len(), 1);
        assert!(outcome.requirements[0]
            .message
            .ends_with("Please address this before submitting."));
        assert!(outcome.is_blocked());
    }

    #[test]
    fn strict_blocks_everything() {
        let outcome = adapt_to_enforcement_level(&issues(), 3);

        assert_eq!(outcome.level, EnforcementLevel::Strict);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.requirements.is_empty());
        assert!(outcome
            .errors
            .iter()
            .all(|e| e.message.contains("must be addressed")));
        assert!(!outcome.requires_manager_approval);
    }

    #[test]
    fn manager_approval_from_attempt_four() {
        let outcome = adapt_to_enforcement_level(&issues(), 4);

        assert_eq!(outcome.level, EnforcementLevel::ManagerApproval);
        assert!(outcome.requires_manager_approval);
        assert!(outcome.requirements.is_empty());
        assert!(outcome.errors.iter().all(|e| e.message.contains("must be addressed")));
        assert_eq!(
            outcome.escalation_reason.as_deref(),
            Some("This is attempt 4. Previous attempts had similar issues that need to be addressed.")
        );
    }

    #[test]
    fn manager_approval_blocks_without_issues() {
        let outcome = adapt_to_enforcement_level(&[], 5);
        assert!(outcome.is_blocked());
        assert!(outcome.is_resolved());
    }

    #[test]
    fn attempt_zero_behaves_like_first() {
        assert_eq!(
            adapt_to_enforcement_level(&issues(), 0),
            adapt_to_enforcement_level(&issues(), 1)
        );
    }

    #[test]
    fn progression_over_four_attempts() {
        let levels: Vec<_> = (1..=4)
            .map(|n| adapt_to_enforcement_level(&issues(), n))
            .map(|o| (o.level, o.requires_manager_approval))
            .collect();

        assert_eq!(
            levels,
            vec![
                (EnforcementLevel::Soft, false),
                (EnforcementLevel::Moderate, false),
                (EnforcementLevel::Strict, false),
                (EnforcementLevel::ManagerApproval, true),
            ]
        );
    }

    fn arb_issue() -> impl Strategy<Value = ValidationIssue> {
        (
            "[a-z_]{1,12}",
            "[A-Za-z .]{0,40}",
            prop_oneof![
                Just(Severity::Error),
                Just(Severity::Warning),
                Just(Severity::Requirement)
            ],
        )
            .prop_map(|(field, message, severity)| ValidationIssue::new(field, message, severity))
    }

    proptest! {
        #[test]
        fn first_attempt_has_no_errors(issues in prop::collection::vec(arb_issue(), 0..8)) {
            let outcome = adapt_to_enforcement_level(&issues, 1);
            prop_assert!(outcome.errors.is_empty());
            prop_assert_eq!(outcome.requirements.len(), issues.len());
        }

        #[test]
        fn adapter_is_idempotent(issues in prop::collection::vec(arb_issue(), 0..8), n in 0u32..10) {
            prop_assert_eq!(
                adapt_to_enforcement_level(&issues, n),
                adapt_to_enforcement_level(&issues, n)
            );
        }

        #[test]
        fn error_issues_block_from_attempt_two(
            mut issues in prop::collection::vec(arb_issue(), 0..8),
            n in 2u32..4,
        ) {
            issues.push(ValidationIssue::error("nc_description", "Too short."));
            let outcome = adapt_to_enforcement_level(&issues, n);
            let needle = if n == 2 { "required for compliance" } else { "must be addressed" };
            prop_assert!(!outcome.errors.is_empty());
            prop_assert!(outcome.errors.iter().any(|e| e.message.contains(needle)));
        }
    }
}
