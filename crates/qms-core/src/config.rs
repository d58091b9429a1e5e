//! Deployment configuration
//!
//! Loaded from TOML; every section is optional and falls back to defaults.
//!
//! ```toml
//! confidential_bypass = true
//!
//! [policy]
//! finished_goods_min = 150
//! justification_min = 50
//!
//! [due_dates]
//! temporary_repair_days = 14
//! nca_closure_working_days = 20
//! ```

use crate::error::ConfigError;
use qms_enforcement::ValidationPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest due-date period accepted from configuration, in days
pub const MAX_DUE_DAYS: u32 = 365;

/// QMS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QmsConfig {
    /// Validation thresholds
    pub policy: ValidationPolicy,
    /// Confidential reports skip validation and enforcement
    pub confidential_bypass: bool,
    /// Due-date rules
    pub due_dates: DueDateConfig,
}

impl QmsConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With validation policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// With confidential bypass
    #[inline]
    #[must_use]
    pub fn with_confidential_bypass(mut self, bypass: bool) -> Self {
        self.confidential_bypass = bypass;
        self
    }

    /// With due-date rules
    #[inline]
    #[must_use]
    pub fn with_due_dates(mut self, due_dates: DueDateConfig) -> Self {
        self.due_dates = due_dates;
        self
    }

    /// Parse from a TOML string
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed TOML or wrong types
    /// - `ConfigError::InvalidValue` for zero minimums or oversized due-date periods
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - Any error from [`QmsConfig::from_toml_str`]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values that would disable a check or run a due date off the calendar
    ///
    /// # Errors
    /// - `ConfigError::InvalidValue` naming the first offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("policy.justification_min", self.policy.justification_min),
            ("policy.root_cause_min_why", self.policy.root_cause_min_why),
            (
                "policy.corrective_action_min_actions",
                self.policy.corrective_action_min_actions,
            ),
            ("due_dates.temporary_repair_days", self.due_dates.temporary_repair_days as usize),
            (
                "due_dates.nca_closure_working_days",
                self.due_dates.nca_closure_working_days as usize,
            ),
        ];
        if let Some((field, _)) = checks.into_iter().find(|&(_, value)| value == 0) {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must be at least 1".to_string(),
            });
        }

        let periods = [
            ("due_dates.temporary_repair_days", self.due_dates.temporary_repair_days),
            (
                "due_dates.nca_closure_working_days",
                self.due_dates.nca_closure_working_days,
            ),
        ];
        match periods.into_iter().find(|&(_, days)| days > MAX_DUE_DAYS) {
            Some((field, _)) => Err(ConfigError::InvalidValue {
                field,
                reason: format!("must be at most {MAX_DUE_DAYS}"),
            }),
            None => Ok(()),
        }
    }
}

impl Default for QmsConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::default(),
            confidential_bypass: true,
            due_dates: DueDateConfig::default(),
        }
    }
}

/// Due-date rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DueDateConfig {
    /// Calendar days until a temporary repair must be made permanent
    pub temporary_repair_days: u32,
    /// Working days until an NCA must be closed
    pub nca_closure_working_days: u32,
}

impl Default for DueDateConfig {
    fn default() -> Self {
        Self {
            temporary_repair_days: 14,
            nca_closure_working_days: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(QmsConfig::from_toml_str("").unwrap(), QmsConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = QmsConfig::from_toml_str(
            r"
            confidential_bypass = false

            [policy]
            finished_goods_min = 200
            ",
        )
        .unwrap();

        assert!(!config.confidential_bypass);
        assert_eq!(config.policy.finished_goods_min, 200);
        assert_eq!(config.policy.raw_material_min, 120);
        assert_eq!(config.due_dates.temporary_repair_days, 14);
    }

    #[test]
    fn zero_minimum_is_rejected() {
        let err = QmsConfig::from_toml_str("[policy]\njustification_min = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "policy.justification_min", .. }
        ));
    }

    #[test]
    fn oversized_due_period_is_rejected() {
        let err = QmsConfig::from_toml_str("[due_dates]\nnca_closure_working_days = 50000000\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "due_dates.nca_closure_working_days", .. }
        ));

        let config = QmsConfig::new().with_due_dates(DueDateConfig {
            temporary_repair_days: MAX_DUE_DAYS,
            nca_closure_working_days: MAX_DUE_DAYS,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = QmsConfig::from_toml_str("confidential_bypass = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[due_dates]\nnca_closure_working_days = 10").unwrap();

        let config = QmsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.due_dates.nca_closure_working_days, 10);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = QmsConfig::from_file("/nonexistent/qms.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
