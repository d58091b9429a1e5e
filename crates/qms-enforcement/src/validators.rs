//! Field-level validators
//!
//! Pure functions over a single text field. Each returns a [`FieldReport`];
//! none of them fail, and empty input fails every check it is subject to.
//!
//! Patterns are compiled once on first use.

use crate::issue::{FieldReport, NcCategory, ValidationIssue};
use crate::policy::{ValidationPolicy, VAGUE_CHECK_MAX_LEN};
use once_cell::sync::Lazy;
use regex::Regex;

/// Field name of the non-conformance description
pub const FIELD_NC_DESCRIPTION: &str = "nc_description";
/// Field name of the root-cause analysis
pub const FIELD_ROOT_CAUSE: &str = "root_cause_analysis";
/// Field name of the corrective action
pub const FIELD_CORRECTIVE_ACTION: &str = "corrective_action";
/// Field name of the maintenance job card description
pub const FIELD_MAINTENANCE_DESCRIPTION: &str = "maintenance_description";

fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("static validation pattern must compile")
}

// Description elements
static WHAT_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(what|found|discovered|observed|detected|identified)\b"));
static WHEN_RE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)\b(\d{1,2}:\d{2}|\d{1,2}/\d{1,2}/\d{4}|today|yesterday|at \d+|on \w+day)\b")
});
static WHERE_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(area|line|machine|station|location|section|zone)\b"));
static QUANTITY_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(\d+|approximately|about|around|several|many|few)\b"));
static BATCH_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(batch|carton|reel|box|lot|B-|C-|R-)"));
static CLOCK_TIME_RE: Lazy<Regex> = Lazy::new(|| pattern(r"\d{1,2}:\d{2}"));

// Vague language
static VAGUE_DESCRIPTOR_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(bad|broken|wrong|issue|problem|defective)\b"));
static VAGUE_QUANTITY_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(some|few|many|several|a lot|a bit)\b"));
static VAGUE_TERM_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(thing|stuff|something|anything|whatever)\b"));
static UNCERTAIN_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(kind of|sort of|maybe|perhaps|probably)\b"));

// Short NC descriptions use the narrower stock-phrase lists
static SHORT_DESCRIPTOR_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(bad|broken|wrong|issue|problem)\b"));
static SHORT_QUANTITY_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(some|few|many|several)\b"));
static SHORT_TERM_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(thing|stuff|something|anything)\b"));

// Root cause
static WHY_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(why|because|due to|caused by|result of|reason)\b"));
static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| pattern(r"[.!?]+"));
static GENERIC_CAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"(?i)\b(operator error|human error|mistake|fault|blame|machine (issue|problem|broken|failure)|bad|wrong|incorrect|defective)\b",
    )
});

// Corrective action
static ACTION_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"(?i)\b(will|must|shall|implement|add|update|verify|check|train|calibrate|replace|install|modify|create|establish|conduct|perform|review)\b",
    )
});
static STEP_MARKER_RE: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)(?:^|\s)\(?\d{1,2}[.)]\s"));
static PROCEDURE_RE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\b(SOP|BRCGS|procedure|section|[235]\.\d+)\b"));
static VERIFICATION_RE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)\b(verify|check|confirm|validate|monitor|review|audit|inspect|test)\b")
});
static TIMELINE_RE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"(?i)\b(within|by|due|deadline|target|schedule|next|weekly|monthly|daily|immediately|\d{1,2}-[a-z]{3}|\d{4}-\d{2}-\d{2})\b",
    )
});

const DESCRIPTION_EXAMPLE: &str = "Example: \"Laminate delamination found on batch B-2045 during inspection at 14:30 in Finishing Area 2. Approximately 150 units affected. No product release yet.\"";
const ROOT_CAUSE_EXAMPLE: &str = "Example: \"Why did delamination occur? Adhesive temperature too low. Why? Heater malfunction. Why? Sensor drift. Why? Calibration overdue by 3 weeks.\"";

/// Validate description completeness with the default policy
#[must_use]
pub fn validate_description_completeness(description: &str, category: NcCategory) -> FieldReport {
    validate_description_with(&ValidationPolicy::default(), description, category)
}

/// Validate description completeness
///
/// Checks, in order:
/// 1. Category-specific minimum length (error)
/// 2. What / when / where / quantity / batch elements (one warning)
/// 3. Vague stock phrases in short descriptions (one warning)
/// 4. Time of occurrence for incidents (error)
#[must_use]
pub fn validate_description_with(
    policy: &ValidationPolicy,
    description: &str,
    category: NcCategory,
) -> FieldReport {
    let mut report = FieldReport::default();
    let length = description.chars().count();

    let required_min = policy.min_description_length(category);
    if length < required_min {
        report.issues.push(
            ValidationIssue::error(
                FIELD_NC_DESCRIPTION,
                format!(
                    "Description must be at least {required_min} characters for {} non-conformances.",
                    category.label()
                ),
            )
            .with_reference("BRCGS 5.7.2")
            .with_example(DESCRIPTION_EXAMPLE),
        );
    }

    let has_time = WHEN_RE.is_match(description);
    let elements: [(&Regex, bool, &str); 5] = [
        (&*WHAT_RE, false, "what happened"),
        (&*WHEN_RE, has_time, "when it occurred (time/date)"),
        (&*WHERE_RE, false, "where it occurred (location/area)"),
        (&*QUANTITY_RE, false, "quantity affected"),
        (&*BATCH_RE, false, "batch/carton numbers"),
    ];
    for (re, known, label) in elements {
        if !(known || re.is_match(description)) {
            report.missing_requirements.push(label.to_string());
        }
    }

    if length < VAGUE_CHECK_MAX_LEN {
        let short_form_checks: [(&Regex, &str); 3] = [
            (&*SHORT_DESCRIPTOR_RE, "vague descriptors"),
            (&*SHORT_QUANTITY_RE, "unspecific quantities"),
            (&*SHORT_TERM_RE, "non-specific terms"),
        ];
        report.vague_phrases = short_form_checks
            .into_iter()
            .filter(|(re, _)| re.is_match(description))
            .map(|(_, phrase)| phrase.to_string())
            .collect();
    }

    if !report.missing_requirements.is_empty() {
        report.issues.push(
            ValidationIssue::warning(
                FIELD_NC_DESCRIPTION,
                format!(
                    "Description incomplete. Please add: {}.",
                    report.missing_requirements.join(", ")
                ),
            )
            .with_reference("BRCGS 5.7.2"),
        );
    }

    if !report.vague_phrases.is_empty() {
        report.issues.push(
            ValidationIssue::warning(
                FIELD_NC_DESCRIPTION,
                format!(
                    "Description contains vague language ({}). Please be more specific with details, measurements, and quantities.",
                    report.vague_phrases.join(", ")
                ),
            )
            .with_example("Instead of \"bad product\", describe what was wrong: \"Seal integrity failure - side seal temperature 5°C below specification\""),
        );
    }

    if category == NcCategory::Incident && !has_time {
        report.issues.push(
            ValidationIssue::error(
                FIELD_NC_DESCRIPTION,
                "Incident descriptions must include the time of occurrence (e.g. \"at 14:30\" or \"on 10-Oct at 15:00\").",
            )
            .with_reference("BRCGS 5.7 Section 2.1"),
        );
    }

    report
}

/// Validate root-cause analysis depth (5-Why method) with the default policy
#[must_use]
pub fn validate_root_cause_depth(analysis: &str) -> FieldReport {
    validate_root_cause_with(&ValidationPolicy::default(), analysis)
}

/// Validate root-cause analysis depth
///
/// Counts "why" reasoning markers. A single sentence with fewer than two
/// markers is shallow; blame-style phrasing without enough markers is
/// generic; anything else short of `root_cause_min_why` markers needs depth.
/// Analyses under 50 characters with at least one marker are let through.
#[must_use]
pub fn validate_root_cause_with(policy: &ValidationPolicy, analysis: &str) -> FieldReport {
    let mut report = FieldReport::default();
    let trimmed = analysis.trim();

    let why_count = WHY_RE.find_iter(trimmed).count();
    let sentence_count = SENTENCE_SPLIT_RE
        .split(trimmed)
        .filter(|s| !s.trim().is_empty())
        .count();

    let is_shallow = sentence_count <= 1 && why_count < 2;
    let is_generic = GENERIC_CAUSE_RE.is_match(trimmed) && why_count < policy.root_cause_min_why;

    if is_shallow {
        report.issues.push(
            ValidationIssue::error(
                FIELD_ROOT_CAUSE,
                "Root cause analysis is too shallow. Use the 5-Why method: Why did this happen? [cause]. Why? [deeper cause]. Why? [root cause].",
            )
            .with_reference("BRCGS 5.7 Section 4")
            .with_example(ROOT_CAUSE_EXAMPLE),
        );
        report
            .missing_requirements
            .push("multiple layers of \"why\" analysis".to_string());
    } else if is_generic {
        report.issues.push(
            ValidationIssue::error(
                FIELD_ROOT_CAUSE,
                "Root cause analysis is too generic. Instead of \"operator error\", explain why the error happened: was training adequate, was the procedure clear?",
            )
            .with_example("Instead of \"operator error\", use: \"Operator did not follow first-off checklist. Checklist not posted at machine. Housekeeping procedure does not cover checklist positioning.\""),
        );
        report
            .missing_requirements
            .push("specific root cause identification".to_string());
    } else if why_count < policy.root_cause_min_why
        && (why_count == 0 || trimmed.chars().count() > 50)
    {
        report.issues.push(ValidationIssue::warning(
            FIELD_ROOT_CAUSE,
            "Root cause analysis needs more depth. Please add at least one more \"why\" layer to identify the underlying cause.",
        ));
        report
            .missing_requirements
            .push("additional \"why\" layers".to_string());
    }

    report
}

/// Validate corrective-action specificity with the default policy
#[must_use]
pub fn validate_corrective_action_specificity(action: &str) -> FieldReport {
    validate_corrective_action_with(&ValidationPolicy::default(), action)
}

/// Validate corrective-action specificity
///
/// Each missing element (enough distinct actions, a procedure reference, a
/// verification method, a timeline) adds one warning.
#[must_use]
pub fn validate_corrective_action_with(policy: &ValidationPolicy, action: &str) -> FieldReport {
    let mut report = FieldReport::default();
    let trimmed = action.trim();

    let step_count = STEP_MARKER_RE.find_iter(trimmed).count();
    let verb_count = ACTION_VERB_RE.find_iter(trimmed).count();
    if step_count.max(verb_count) < policy.corrective_action_min_actions {
        report.issues.push(
            ValidationIssue::warning(
                FIELD_CORRECTIVE_ACTION,
                format!(
                    "Include at least {} specific actions (e.g. \"1) Calibrate all sensors immediately. 2) Update maintenance schedule.\").",
                    policy.corrective_action_min_actions
                ),
            )
            .with_example("Example: \"1) Calibrate all adhesive temperature sensors immediately. 2) Implement weekly sensor checks per BRCGS 5.6.\""),
        );
        report
            .missing_requirements
            .push("multiple specific actions".to_string());
    }

    if !PROCEDURE_RE.is_match(trimmed) {
        report.issues.push(
            ValidationIssue::warning(
                FIELD_CORRECTIVE_ACTION,
                "Reference relevant procedures (e.g. \"as per SOP 5.7\" or \"BRCGS Section 5.3\").",
            )
            .with_reference("BRCGS 5.7 Section 5")
            .with_example("Example: \"Update maintenance schedule per BRCGS 5.6 Calibration Procedure\""),
        );
        report
            .missing_requirements
            .push("procedure reference".to_string());
    }

    if !VERIFICATION_RE.is_match(trimmed) {
        report.issues.push(
            ValidationIssue::warning(
                FIELD_CORRECTIVE_ACTION,
                "Include a verification method (e.g. \"QA will verify on next batch\" or \"Maintenance will check weekly\").",
            )
            .with_example("Example: \"QA will verify effectiveness on next batch (due 10-Oct)\""),
        );
        report
            .missing_requirements
            .push("verification method".to_string());
    }

    if !TIMELINE_RE.is_match(trimmed) {
        report.issues.push(
            ValidationIssue::warning(
                FIELD_CORRECTIVE_ACTION,
                "Include a timeline for verification (e.g. \"due 10-Oct\" or \"within 5 days\").",
            )
            .with_example("Example: \"QA will verify on next batch (due 10-Oct)\""),
        );
        report
            .missing_requirements
            .push("verification timeline".to_string());
    }

    report
}

/// Validate a maintenance job card description
///
/// Minimum length is an error; vague language is a warning.
#[must_use]
pub fn validate_maintenance_description(policy: &ValidationPolicy, description: &str) -> FieldReport {
    let mut report = FieldReport::default();
    let min = policy.maintenance_description_min;

    if description.trim().chars().count() < min {
        report.issues.push(
            ValidationIssue::error(
                FIELD_MAINTENANCE_DESCRIPTION,
                format!("Description must be at least {min} characters for BRCGS compliance."),
            )
            .with_reference("BRCGS 4.7")
            .with_example("Example: \"Sealing jaw on Line 3 bagger not reaching 180°C set point. Heater cartridge suspected. Machine stopped at 09:15, product on hold.\""),
        );
        report
            .missing_requirements
            .push("detailed description of maintenance required".to_string());
    }

    report.vague_phrases = detect_vague_language(description);
    if !report.vague_phrases.is_empty() {
        report.issues.push(ValidationIssue::warning(
            FIELD_MAINTENANCE_DESCRIPTION,
            format!(
                "Description contains vague language ({}). Please describe the fault, the component, and the symptoms.",
                report.vague_phrases.join(", ")
            ),
        ));
    }

    report
}

/// Vague-language categories present in `text`
#[must_use]
pub fn detect_vague_language(text: &str) -> Vec<String> {
    let checks: [(&Regex, &str); 4] = [
        (&*VAGUE_DESCRIPTOR_RE, "vague descriptors"),
        (&*VAGUE_QUANTITY_RE, "unspecific quantities"),
        (&*VAGUE_TERM_RE, "non-specific terms"),
        (&*UNCERTAIN_RE, "uncertain language"),
    ];
    checks
        .into_iter()
        .filter(|(re, _)| re.is_match(text))
        .map(|(_, phrase)| phrase.to_string())
        .collect()
}

/// Details still missing from `text` for a given field
///
/// Unknown field names yield an empty list.
#[must_use]
pub fn require_specific_details(field: &str, text: &str, category: NcCategory) -> Vec<&'static str> {
    let mut missing = Vec::new();

    match field {
        FIELD_NC_DESCRIPTION => {
            if category == NcCategory::Incident && !CLOCK_TIME_RE.is_match(text) {
                missing.push("time of occurrence");
            }
            if matches!(category, NcCategory::FinishedGoods | NcCategory::RawMaterial)
                && !BATCH_RE.is_match(text)
            {
                missing.push("batch/carton numbers");
            }
            if !QUANTITY_RE.is_match(text) {
                missing.push("quantity affected");
            }
        }
        FIELD_ROOT_CAUSE => {
            if !text.is_empty() && !WHY_RE.is_match(text) {
                missing.push("5-Why analysis depth");
            }
        }
        FIELD_CORRECTIVE_ACTION => {
            if !text.is_empty() {
                if !PROCEDURE_RE.is_match(text) {
                    missing.push("procedure reference");
                }
                if !VERIFICATION_RE.is_match(text) {
                    missing.push("verification method");
                }
                if !TIMELINE_RE.is_match(text) {
                    missing.push("verification timeline");
                }
            }
        }
        _ => {}
    }

    missing
}
