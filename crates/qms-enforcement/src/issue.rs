//! Validation issue types shared by every validator and the enforcement adapter
//!
//! Defines:
//! - Issue severity and the issue value itself
//! - Per-field validation reports
//! - Form and non-conformance category identifiers

use crate::error::ParseKindError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a single validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Compliance failure; escalates to a blocking error from attempt 2
    Error,
    /// Quality gap; stays advisory until the strict level
    Warning,
    /// Missing element the user is asked to supply
    Requirement,
}

impl Severity {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Requirement => "requirement",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found in one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Form field name (e.g. `nc_description`)
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Severity before enforcement is applied
    pub severity: Severity,
    /// Compliance clause this issue relates to (e.g. "BRCGS 5.7.2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_reference: Option<String>,
    /// Example of an acceptable entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_fix: Option<String>,
}

impl ValidationIssue {
    /// Create new issue
    #[inline]
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
            compliance_reference: None,
            example_fix: None,
        }
    }

    /// Error-severity issue
    #[inline]
    #[must_use]
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Error)
    }

    /// Warning-severity issue
    #[inline]
    #[must_use]
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Warning)
    }

    /// With compliance reference
    #[inline]
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.compliance_reference = Some(reference.into());
        self
    }

    /// With example fix
    #[inline]
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example_fix = Some(example.into());
        self
    }

    /// Same issue with `suffix` appended to the message
    #[must_use]
    pub(crate) fn with_suffix(&self, suffix: &str) -> Self {
        let mut issue = self.clone();
        issue.message = format!("{} {}", self.message, suffix);
        issue
    }

    /// Whether this issue is error-severity
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Result of validating one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    /// Issues found
    pub issues: Vec<ValidationIssue>,
    /// Short names of missing elements (e.g. "quantity affected")
    pub missing_requirements: Vec<String>,
    /// Vague-language categories detected
    pub vague_phrases: Vec<String>,
}

impl FieldReport {
    /// True when no error-severity issue was found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ValidationIssue::is_error)
    }

    /// Append another report's findings
    pub fn merge(&mut self, other: FieldReport) {
        self.issues.extend(other.issues);
        self.missing_requirements.extend(other.missing_requirements);
        self.vague_phrases.extend(other.vague_phrases);
    }
}

/// Form kinds subject to enforcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    /// Non-conformance advice
    Nca,
    /// Maintenance job card
    Mjc,
}

impl FormType {
    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nca => "nca",
            Self::Mjc => "mjc",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nca" => Ok(Self::Nca),
            "mjc" => Ok(Self::Mjc),
            other => Err(ParseKindError::new("form type", other)),
        }
    }
}

/// Non-conformance category; drives the description length minimum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NcCategory {
    /// Incoming raw material
    RawMaterial,
    /// Finished goods
    FinishedGoods,
    /// Work in progress
    Wip,
    /// Incident (time of occurrence mandatory)
    Incident,
    /// Anything else
    #[default]
    Other,
}

impl NcCategory {
    /// Every category, in declaration order
    pub const ALL: [NcCategory; 5] = [
        Self::RawMaterial,
        Self::FinishedGoods,
        Self::Wip,
        Self::Incident,
        Self::Other,
    ];

    /// Stable kebab-case name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawMaterial => "raw-material",
            Self::FinishedGoods => "finished-goods",
            Self::Wip => "wip",
            Self::Incident => "incident",
            Self::Other => "other",
        }
    }

    /// Name used in user-facing messages
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RawMaterial => "raw material",
            Self::FinishedGoods => "finished goods",
            Self::Wip => "wip",
            Self::Incident => "incident",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for NcCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NcCategory {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseKindError::new("nc category", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_builder() {
        let issue = ValidationIssue::error("nc_description", "too short")
            .with_reference("BRCGS 5.7.2")
            .with_example("Example text");

        assert!(issue.is_error());
        assert_eq!(issue.compliance_reference.as_deref(), Some("BRCGS 5.7.2"));
        assert_eq!(issue.example_fix.as_deref(), Some("Example text"));
    }

    #[test]
    fn suffix_keeps_original_fields() {
        let issue = ValidationIssue::warning("corrective_action", "Add a timeline.")
            .with_reference("BRCGS 5.7 Section 5");
        let suffixed = issue.with_suffix("Please address this before submitting.");

        assert_eq!(
            suffixed.message,
            "Add a timeline. Please address this before submitting."
        );
        assert_eq!(suffixed.compliance_reference, issue.compliance_reference);
        assert_eq!(suffixed.severity, Severity::Warning);
    }

    #[test]
    fn report_validity_ignores_warnings() {
        let mut report = FieldReport::default();
        report.issues.push(ValidationIssue::warning("f", "w"));
        assert!(report.is_valid());

        report.issues.push(ValidationIssue::error("f", "e"));
        assert!(!report.is_valid());
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in NcCategory::ALL {
            assert_eq!(category.as_str().parse::<NcCategory>().unwrap(), category);
        }
        assert!("cardboard".parse::<NcCategory>().is_err());
    }

    #[test]
    fn form_type_parse() {
        assert_eq!("mjc".parse::<FormType>().unwrap(), FormType::Mjc);
        let err = "waste".parse::<FormType>().unwrap_err();
        assert!(err.to_string().contains("waste"));
    }
}
