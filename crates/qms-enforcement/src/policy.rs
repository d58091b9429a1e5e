//! Validation thresholds
//!
//! Length minimums are configurable per deployment. The pattern-analysis
//! thresholds are fixed constants.

use crate::error::ApprovalError;
use crate::issue::NcCategory;
use serde::{Deserialize, Serialize};

/// Distinct attempts a field must appear in to count as a frequent issue
pub const FREQUENT_ISSUE_THRESHOLD: usize = 2;

/// Attempt count at which a user's pattern is flagged as escalated
pub const ESCALATION_ATTEMPT_THRESHOLD: u32 = 3;

/// Minimum manager-approval justification length, in characters
pub const MIN_JUSTIFICATION_LEN: usize = 50;

/// Descriptions shorter than this are checked for vague stock phrases
pub const VAGUE_CHECK_MAX_LEN: usize = 100;

/// Tunable validation thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Raw-material description minimum
    pub raw_material_min: usize,
    /// Finished-goods description minimum
    pub finished_goods_min: usize,
    /// Work-in-progress description minimum
    pub wip_min: usize,
    /// Incident description minimum
    pub incident_min: usize,
    /// Fallback description minimum
    pub other_min: usize,
    /// Maintenance job card description minimum
    pub maintenance_description_min: usize,
    /// Minimum number of "why" markers for a deep root-cause analysis
    pub root_cause_min_why: usize,
    /// Minimum number of distinct corrective actions
    pub corrective_action_min_actions: usize,
    /// Minimum manager-approval justification length
    pub justification_min: usize,
}

impl ValidationPolicy {
    /// Create default policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Description minimum for a category
    #[inline]
    #[must_use]
    pub fn min_description_length(&self, category: NcCategory) -> usize {
        match category {
            NcCategory::RawMaterial => self.raw_material_min,
            NcCategory::FinishedGoods => self.finished_goods_min,
            NcCategory::Wip => self.wip_min,
            NcCategory::Incident => self.incident_min,
            NcCategory::Other => self.other_min,
        }
    }

    /// With maintenance description minimum
    #[inline]
    #[must_use]
    pub fn with_maintenance_description_min(mut self, min: usize) -> Self {
        self.maintenance_description_min = min;
        self
    }

    /// With justification minimum
    #[inline]
    #[must_use]
    pub fn with_justification_min(mut self, min: usize) -> Self {
        self.justification_min = min;
        self
    }

    /// Check a manager-approval justification against this policy
    ///
    /// # Errors
    /// - `ApprovalError::JustificationTooShort` if the trimmed text is shorter
    ///   than `justification_min` characters
    pub fn check_justification(&self, justification: &str) -> Result<(), ApprovalError> {
        let actual = justification.trim().chars().count();
        if actual < self.justification_min {
            return Err(ApprovalError::JustificationTooShort {
                required: self.justification_min,
                actual,
            });
        }
        Ok(())
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            raw_material_min: 120,
            finished_goods_min: 150,
            wip_min: 130,
            incident_min: 200,
            other_min: 100,
            maintenance_description_min: 100,
            root_cause_min_why: 3,
            corrective_action_min_actions: 2,
            justification_min: MIN_JUSTIFICATION_LEN,
        }
    }
}

/// Check a justification against the default minimum
///
/// # Errors
/// - `ApprovalError::JustificationTooShort` below [`MIN_JUSTIFICATION_LEN`]
#[inline]
pub fn validate_justification(justification: &str) -> Result<(), ApprovalError> {
    ValidationPolicy::default().check_justification(justification)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_minimums_by_category() {
        let policy = ValidationPolicy::default();
        assert_eq!(policy.min_description_length(NcCategory::RawMaterial), 120);
        assert_eq!(policy.min_description_length(NcCategory::FinishedGoods), 150);
        assert_eq!(policy.min_description_length(NcCategory::Wip), 130);
        assert_eq!(policy.min_description_length(NcCategory::Incident), 200);
        assert_eq!(policy.min_description_length(NcCategory::Other), 100);
    }

    #[test]
    fn justification_boundary() {
        assert!(validate_justification(&"A".repeat(49)).is_err());
        assert!(validate_justification(&"A".repeat(50)).is_ok());
    }

    #[test]
    fn justification_whitespace_does_not_count() {
        let padded = format!("   {}   ", "A".repeat(48));
        let err = validate_justification(&padded).unwrap_err();
        assert_eq!(
            err,
            ApprovalError::JustificationTooShort {
                required: 50,
                actual: 48
            }
        );
    }

    #[test]
    fn custom_justification_minimum() {
        let policy = ValidationPolicy::new().with_justification_min(10);
        assert!(policy.check_justification("short but ok").is_ok());
    }
}
