//! Submission pattern analysis
//!
//! Reducers over a user's attempt history, used for management reporting
//! and for spotting requirements users repeatedly miss.

use crate::error::PatternError;
use crate::issue::{FormType, ValidationIssue};
use crate::policy::{ESCALATION_ATTEMPT_THRESHOLD, FREQUENT_ISSUE_THRESHOLD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Most frequent fields reported in [`UserPattern::top_issues`]
const TOP_ISSUE_COUNT: usize = 3;

/// Minimum history length before persistent issues are reported
const PERSISTENT_MIN_ATTEMPTS: usize = 3;

/// Share of attempts an issue must appear in to count as persistent
const PERSISTENT_SHARE: f64 = 0.8;

/// One submission try
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnforcementAttempt {
    /// Submitting user
    pub user_id: String,
    /// Form kind
    pub form_type: FormType,
    /// Form id, once the form has been saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    /// 1-based attempt number
    pub attempt_number: u32,
    /// When the attempt was made
    pub timestamp: DateTime<Utc>,
    /// Issues found on this attempt
    pub issues: Vec<ValidationIssue>,
}

impl EnforcementAttempt {
    /// Create new attempt record
    #[inline]
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        form_type: FormType,
        attempt_number: u32,
        timestamp: DateTime<Utc>,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            form_type,
            form_id: None,
            attempt_number,
            timestamp,
            issues,
        }
    }

    /// With form id
    #[inline]
    #[must_use]
    pub fn with_form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    /// Distinct field names cited on this attempt
    fn fields(&self) -> BTreeSet<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

/// Read-only view over a user's attempt history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPattern {
    /// User the history belongs to
    pub user_id: String,
    /// Attempts analysed
    pub total_attempts: usize,
    /// Attempts per distinct saved form
    pub average_attempts_per_form: f64,
    /// Fields cited in at least two attempts
    pub frequent_issues: BTreeSet<String>,
    /// Up to three fields with the most issue occurrences
    pub top_issues: Vec<String>,
    /// Timestamp of the last attempt in the history
    pub last_attempt_at: DateTime<Utc>,
    /// The history reached the escalation threshold
    pub escalation_triggered: bool,
}

/// Suggestion raised when one issue keeps coming back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPattern {
    /// Short pattern label
    pub pattern: String,
    /// Suggested rule or placeholder change
    pub suggestion: String,
}

/// Analyse a user's attempt history
///
/// # Errors
/// - `PatternError::EmptyHistory` if `attempts` is empty
pub fn analyze_user_pattern(attempts: &[EnforcementAttempt]) -> Result<UserPattern, PatternError> {
    let (first, last) = match (attempts.first(), attempts.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PatternError::EmptyHistory),
    };

    let mut attempts_per_field: BTreeMap<&str, usize> = BTreeMap::new();
    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for attempt in attempts {
        for field in attempt.fields() {
            *attempts_per_field.entry(field).or_default() += 1;
        }
        for issue in &attempt.issues {
            *occurrences.entry(issue.field.as_str()).or_default() += 1;
        }
    }

    let frequent_issues = attempts_per_field
        .iter()
        .filter(|&(_, &count)| count >= FREQUENT_ISSUE_THRESHOLD)
        .map(|(field, _)| (*field).to_string())
        .collect();

    let mut ranked: Vec<(&str, usize)> = occurrences.into_iter().collect();
    // BTreeMap order breaks ties alphabetically; the sort is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top_issues = ranked
        .into_iter()
        .take(TOP_ISSUE_COUNT)
        .map(|(field, _)| field.to_string())
        .collect();

    let unique_forms: HashSet<&str> = attempts
        .iter()
        .filter_map(|a| a.form_id.as_deref())
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let average_attempts_per_form = if unique_forms.is_empty() {
        attempts.len() as f64
    } else {
        attempts.len() as f64 / unique_forms.len() as f64
    };

    let threshold = ESCALATION_ATTEMPT_THRESHOLD as usize;
    let escalation_triggered = attempts.len() >= threshold
        || attempts
            .iter()
            .any(|a| a.attempt_number >= ESCALATION_ATTEMPT_THRESHOLD);

    Ok(UserPattern {
        user_id: first.user_id.clone(),
        total_attempts: attempts.len(),
        average_attempts_per_form,
        frequent_issues,
        top_issues,
        last_attempt_at: last.timestamp,
        escalation_triggered,
    })
}

/// Detect an issue that persists across most attempts
///
/// Needs at least three attempts. Returns the first (field, message) pair,
/// in field order, present in 80% or more of the attempts.
#[must_use]
pub fn detect_persistent_issue(attempts: &[EnforcementAttempt]) -> Option<ContentPattern> {
    if attempts.len() < PERSISTENT_MIN_ATTEMPTS {
        return None;
    }

    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for attempt in attempts {
        let distinct: BTreeSet<(&str, &str)> = attempt
            .issues
            .iter()
            .map(|i| (i.field.as_str(), i.message.as_str()))
            .collect();
        for key in distinct {
            *counts.entry(key).or_default() += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let threshold = attempts.len() as f64 * PERSISTENT_SHARE;
    counts
        .into_iter()
        .find(|&(_, count)| {
            #[allow(clippy::cast_precision_loss)]
            let count = count as f64;
            count >= threshold
        })
        .map(|((field, _), _)| ContentPattern {
            pattern: format!("Persistent issue: {field}"),
            suggestion: format!(
                "Consider making the requirement for \"{field}\" more prominent in placeholders or adjusting validation rules if this is a common pattern."
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, minute, 0).unwrap()
    }

    fn attempt(n: u32, fields: &[&str]) -> EnforcementAttempt {
        let issues = fields
            .iter()
            .map(|f| ValidationIssue::error(*f, "Missing time"))
            .collect();
        EnforcementAttempt::new("user-1", FormType::Nca, n, at(n * 5), issues)
    }

    #[test]
    fn empty_history_is_error() {
        assert_eq!(analyze_user_pattern(&[]), Err(PatternError::EmptyHistory));
    }

    #[test]
    fn repeated_description_issue_escalates() {
        let history = vec![
            attempt(1, &["nc_description"]),
            attempt(2, &["nc_description"]),
            attempt(3, &["nc_description"]),
        ];

        let pattern = analyze_user_pattern(&history).unwrap();

        assert_eq!(pattern.user_id, "user-1");
        assert_eq!(pattern.total_attempts, 3);
        assert!(pattern.escalation_triggered);
        assert!(pattern.frequent_issues.contains("nc_description"));
        assert_eq!(pattern.last_attempt_at, at(15));
    }

    #[test]
    fn single_occurrence_is_not_frequent() {
        let history = vec![
            attempt(1, &["nc_description", "corrective_action"]),
            attempt(2, &["nc_description"]),
        ];

        let pattern = analyze_user_pattern(&history).unwrap();

        assert!(!pattern.escalation_triggered);
        assert_eq!(
            pattern.frequent_issues.into_iter().collect::<Vec<_>>(),
            vec!["nc_description".to_string()]
        );
    }

    #[test]
    fn several_issues_on_one_attempt_count_once_for_frequency() {
        let history = vec![attempt(1, &["root_cause_analysis", "root_cause_analysis"])];

        let pattern = analyze_user_pattern(&history).unwrap();

        assert!(pattern.frequent_issues.is_empty());
        assert_eq!(pattern.top_issues, vec!["root_cause_analysis".to_string()]);
    }

    #[test]
    fn top_issues_ranked_by_occurrence() {
        let history = vec![
            attempt(1, &["a", "b", "c", "d"]),
            attempt(2, &["b", "c"]),
            attempt(3, &["c"]),
        ];

        let pattern = analyze_user_pattern(&history).unwrap();
        assert_eq!(pattern.top_issues, vec!["c", "b", "a"]);
    }

    #[test]
    fn average_attempts_per_form() {
        let history = vec![
            attempt(1, &[]).with_form_id("nca-1"),
            attempt(2, &[]).with_form_id("nca-1"),
            attempt(1, &[]).with_form_id("nca-2"),
            attempt(2, &[]).with_form_id("nca-2"),
        ];
        let pattern = analyze_user_pattern(&history).unwrap();
        assert!((pattern.average_attempts_per_form - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn input_is_not_mutated() {
        let history = vec![attempt(1, &["x"]), attempt(2, &["x"])];
        let before = history.clone();
        let _ = analyze_user_pattern(&history);
        assert_eq!(history, before);
    }

    #[test]
    fn persistent_issue_needs_three_attempts() {
        let history = vec![attempt(1, &["nc_description"]), attempt(2, &["nc_description"])];
        assert!(detect_persistent_issue(&history).is_none());
    }

    #[test]
    fn persistent_issue_detected() {
        let history = vec![
            attempt(1, &["nc_description"]),
            attempt(2, &["nc_description"]),
            attempt(3, &["nc_description", "corrective_action"]),
        ];

        let found = detect_persistent_issue(&history).unwrap();
        assert_eq!(found.pattern, "Persistent issue: nc_description");
        assert!(found.suggestion.contains("\"nc_description\""));
    }

    #[test]
    fn intermittent_issue_is_not_persistent() {
        let history = vec![
            attempt(1, &["a"]),
            attempt(2, &["b"]),
            attempt(3, &["a"]),
            attempt(4, &["b"]),
        ];
        assert!(detect_persistent_issue(&history).is_none());
    }
}
