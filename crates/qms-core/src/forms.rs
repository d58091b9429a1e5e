//! Submitted forms
//!
//! The free-text fields the enforcement engine inspects, plus the few
//! structured fields whose rules are hard requirements regardless of level.

use qms_enforcement::validators::{
    validate_corrective_action_with, validate_description_with, validate_root_cause_with,
};
use qms_enforcement::{
    validate_maintenance_description, FieldReport, FormType, NcCategory, ValidationIssue,
    ValidationPolicy,
};
use serde::{Deserialize, Serialize};

/// Field name for the production clearance flag
pub const FIELD_PRODUCTION_CLEARED: &str = "production_cleared";
/// Field name for the clearing QA supervisor
pub const FIELD_CLEARANCE_SUPERVISOR: &str = "clearance_qa_supervisor";

/// Post-maintenance hygiene checklist items
pub const HYGIENE_CHECKLIST: [&str; 10] = [
    "No loose objects, nuts, bolts, washers or tools left in machinery",
    "All guards, safety devices and protective covers properly secured",
    "Work area cleaned and free from debris/contamination",
    "All lubricants and maintenance fluids are food-grade approved",
    "Machine surfaces cleaned and sanitized as per BRCGS standards",
    "No foreign material risk identified in product contact areas",
    "Temporary repairs documented with permanent solution planned",
    "All electrical connections secure and properly insulated",
    "Machine test run completed successfully without issues",
    "Quality check performed on first production output",
];

/// Non-conformance advice
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NcaSubmission {
    /// Form id, once saved
    #[serde(default)]
    pub form_id: Option<String>,
    /// Submitting user
    pub user_id: String,
    /// Category
    pub category: NcCategory,
    /// What happened
    pub nc_description: String,
    /// Root-cause analysis, when provided
    #[serde(default)]
    pub root_cause_analysis: Option<String>,
    /// Corrective action, when provided
    #[serde(default)]
    pub corrective_action: Option<String>,
    /// Confidential (whistleblower) report
    #[serde(default)]
    pub confidential: bool,
}

impl NcaSubmission {
    /// Create NCA with a description
    #[must_use]
    pub fn new(user_id: impl Into<String>, category: NcCategory, nc_description: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            category,
            nc_description: nc_description.into(),
            ..Self::default()
        }
    }

    /// With form id
    #[inline]
    #[must_use]
    pub fn with_form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    /// With root-cause analysis
    #[inline]
    #[must_use]
    pub fn with_root_cause(mut self, analysis: impl Into<String>) -> Self {
        self.root_cause_analysis = Some(analysis.into());
        self
    }

    /// With corrective action
    #[inline]
    #[must_use]
    pub fn with_corrective_action(mut self, action: impl Into<String>) -> Self {
        self.corrective_action = Some(action.into());
        self
    }

    /// Mark as confidential
    #[inline]
    #[must_use]
    pub fn confidential(mut self) -> Self {
        self.confidential = true;
        self
    }

    /// Run every applicable validator
    ///
    /// Root cause and corrective action are only checked when present.
    #[must_use]
    pub fn validate(&self, policy: &ValidationPolicy) -> FieldReport {
        let mut report = validate_description_with(policy, &self.nc_description, self.category);
        if let Some(analysis) = present(self.root_cause_analysis.as_deref()) {
            report.merge(validate_root_cause_with(policy, analysis));
        }
        if let Some(action) = present(self.corrective_action.as_deref()) {
            report.merge(validate_corrective_action_with(policy, action));
        }
        report
    }
}

/// Maintenance job card
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MjcSubmission {
    /// Form id, once saved
    #[serde(default)]
    pub form_id: Option<String>,
    /// Submitting user
    pub user_id: String,
    /// Maintenance required
    pub maintenance_description: String,
    /// Repair is temporary and needs a permanent follow-up
    #[serde(default)]
    pub temporary_repair: bool,
    /// Hygiene checklist, in [`HYGIENE_CHECKLIST`] order
    #[serde(default)]
    pub hygiene_checks: [bool; 10],
    /// Production clearance requested
    #[serde(default)]
    pub production_cleared: bool,
    /// QA supervisor granting clearance
    #[serde(default)]
    pub clearance_qa_supervisor: Option<String>,
}

impl MjcSubmission {
    /// Create MJC with a description
    #[must_use]
    pub fn new(user_id: impl Into<String>, maintenance_description: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            maintenance_description: maintenance_description.into(),
            ..Self::default()
        }
    }

    /// With form id
    #[inline]
    #[must_use]
    pub fn with_form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    /// Mark every hygiene item verified
    #[inline]
    #[must_use]
    pub fn with_all_hygiene_checks(mut self) -> Self {
        self.hygiene_checks = [true; 10];
        self
    }

    /// Request production clearance from a QA supervisor
    #[inline]
    #[must_use]
    pub fn with_clearance(mut self, supervisor: impl Into<String>) -> Self {
        self.production_cleared = true;
        self.clearance_qa_supervisor = Some(supervisor.into());
        self
    }

    /// Checklist items not yet verified
    #[must_use]
    pub fn unverified_hygiene_items(&self) -> Vec<&'static str> {
        HYGIENE_CHECKLIST
            .iter()
            .zip(self.hygiene_checks)
            .filter(|&(_, checked)| !checked)
            .map(|(item, _)| *item)
            .collect()
    }

    /// Run every applicable validator
    ///
    /// Clearance without a full checklist or a named supervisor is an error.
    #[must_use]
    pub fn validate(&self, policy: &ValidationPolicy) -> FieldReport {
        let mut report = validate_maintenance_description(policy, &self.maintenance_description);
        if !self.production_cleared {
            return report;
        }

        let unverified = self.unverified_hygiene_items();
        if !unverified.is_empty() {
            report.issues.push(
                ValidationIssue::error(
                    FIELD_PRODUCTION_CLEARED,
                    "All 10 hygiene items must be verified before granting clearance.",
                )
                .with_reference("BRCGS 4.7"),
            );
            report
                .missing_requirements
                .extend(unverified.into_iter().map(str::to_string));
        }
        if present(self.clearance_qa_supervisor.as_deref()).is_none() {
            report.issues.push(ValidationIssue::error(
                FIELD_CLEARANCE_SUPERVISOR,
                "QA supervisor is required when granting production clearance.",
            ));
        }
        report
    }
}

/// Any form the gate accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form_type", rename_all = "lowercase")]
pub enum Submission {
    /// Non-conformance advice
    Nca(NcaSubmission),
    /// Maintenance job card
    Mjc(MjcSubmission),
}

impl Submission {
    /// Form kind
    #[must_use]
    pub fn form_type(&self) -> FormType {
        match self {
            Self::Nca(_) => FormType::Nca,
            Self::Mjc(_) => FormType::Mjc,
        }
    }

    /// Form id, once saved
    #[must_use]
    pub fn form_id(&self) -> Option<&str> {
        match self {
            Self::Nca(nca) => nca.form_id.as_deref(),
            Self::Mjc(mjc) => mjc.form_id.as_deref(),
        }
    }

    /// Submitting user
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::Nca(nca) => &nca.user_id,
            Self::Mjc(mjc) => &mjc.user_id,
        }
    }

    /// Confidential reports are NCAs flagged as such
    #[must_use]
    pub fn is_confidential(&self) -> bool {
        matches!(self, Self::Nca(nca) if nca.confidential)
    }

    /// Validate with `policy`
    #[must_use]
    pub fn validate(&self, policy: &ValidationPolicy) -> FieldReport {
        match self {
            Self::Nca(nca) => nca.validate(policy),
            Self::Mjc(mjc) => mjc.validate(policy),
        }
    }
}

impl From<NcaSubmission> for Submission {
    fn from(nca: NcaSubmission) -> Self {
        Self::Nca(nca)
    }
}

impl From<MjcSubmission> for Submission {
    fn from(mjc: MjcSubmission) -> Self {
        Self::Mjc(mjc)
    }
}

fn present(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
