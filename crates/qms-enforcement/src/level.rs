//! Enforcement levels
//!
//! The level is a pure function of the attempt number:
//!
//! ```text
//! 1 → Soft → 2 → Moderate → 3 → Strict → 4+ → ManagerApproval (absorbing)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Graduated enforcement level, ordered from least to most strict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnforcementLevel {
    /// First attempt: everything is advisory
    Soft,
    /// Second attempt: error-severity issues block
    Moderate,
    /// Third attempt: every issue blocks
    Strict,
    /// Fourth and later attempts: a manager must approve
    ManagerApproval,
}

impl EnforcementLevel {
    /// Level for an attempt number; 0 is treated as the first attempt
    #[inline]
    #[must_use]
    pub fn for_attempt(attempt_number: u32) -> Self {
        match attempt_number {
            0 | 1 => Self::Soft,
            2 => Self::Moderate,
            3 => Self::Strict,
            _ => Self::ManagerApproval,
        }
    }

    /// Next level up; `ManagerApproval` is absorbing
    #[inline]
    #[must_use]
    pub fn escalate(self) -> Self {
        match self {
            Self::Soft => Self::Moderate,
            Self::Moderate => Self::Strict,
            Self::Strict | Self::ManagerApproval => Self::ManagerApproval,
        }
    }

    /// Whether issues can block submission at this level
    #[inline]
    #[must_use]
    pub fn can_block(&self) -> bool {
        *self >= Self::Moderate
    }

    /// Stable kebab-case name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
            Self::ManagerApproval => "manager-approval",
        }
    }
}

impl fmt::Display for EnforcementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level for an attempt number
#[inline]
#[must_use]
pub fn enforcement_level(attempt_number: u32) -> EnforcementLevel {
    EnforcementLevel::for_attempt(attempt_number)
}

/// User-facing guidance for an attempt
#[must_use]
pub fn escalation_message(attempt_number: u32) -> &'static str {
    match attempt_number {
        0 | 1 => "Please review the requirements below and update your submission.",
        2 => "Some requirements from your previous attempt still need attention. Please address these before submitting.",
        3 => "This submission still does not meet requirements. A manager's approval will be needed to proceed.",
        _ => "Manager approval is required for this submission.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_mapping() {
        assert_eq!(enforcement_level(1), EnforcementLevel::Soft);
        assert_eq!(enforcement_level(2), EnforcementLevel::Moderate);
        assert_eq!(enforcement_level(3), EnforcementLevel::Strict);
        assert_eq!(enforcement_level(4), EnforcementLevel::ManagerApproval);
    }

    #[test]
    fn zero_clamps_to_soft() {
        assert_eq!(enforcement_level(0), EnforcementLevel::Soft);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(EnforcementLevel::Soft < EnforcementLevel::Moderate);
        assert!(EnforcementLevel::Moderate < EnforcementLevel::Strict);
        assert!(EnforcementLevel::Strict < EnforcementLevel::ManagerApproval);
        assert!(!EnforcementLevel::Soft.can_block());
        assert!(EnforcementLevel::Strict.can_block());
    }

    #[test]
    fn escalation_is_absorbing() {
        let mut level = EnforcementLevel::Soft;
        for _ in 0..10 {
            level = level.escalate();
        }
        assert_eq!(level, EnforcementLevel::ManagerApproval);
    }

    #[test]
    fn display_names() {
        assert_eq!(EnforcementLevel::ManagerApproval.to_string(), "manager-approval");
        assert_eq!(EnforcementLevel::Soft.to_string(), "soft");
    }

    #[test]
    fn messages_mention_manager_from_attempt_three() {
        assert!(!escalation_message(2).contains("manager"));
        assert!(escalation_message(3).contains("manager"));
        assert!(escalation_message(9).contains("Manager approval"));
    }

    proptest! {
        #[test]
        fn four_and_above_require_manager(n in 4u32..) {
            prop_assert_eq!(enforcement_level(n), EnforcementLevel::ManagerApproval);
        }

        #[test]
        fn level_is_monotonic(a in 0u32..100, b in 0u32..100) {
            if a <= b {
                prop_assert!(enforcement_level(a) <= enforcement_level(b));
            }
        }
    }
}
