//! Testing utilities for QMS workspace
//!
//! Shared fixtures: form texts that pass or fail validation, gate setup,
//! and an in-memory record directory.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::RwLock;
use qms_audit::InMemoryEnforcementStore;
use qms_core::{
    CrossRefError, MjcSubmission, NcaSubmission, QmsConfig, RecordDirectory, RecordRef,
    RecordSummary, SubmissionGate,
};
use qms_enforcement::NcCategory;
use std::collections::HashMap;
use std::sync::Arc;

pub const COMPLETE_FINISHED_GOODS_DESCRIPTION: &str = "Laminate delamination found on batch B-2045 during final inspection at 14:30 in Finishing Area 2. Approximately 150 units affected. Product placed on hold, no release yet.";

pub const COMPLETE_INCIDENT_DESCRIPTION: &str = "Forklift collision with racking found in Warehouse Zone C at 14:30 on 10/03/2025. Approximately 40 cartons from batch B-2051 knocked to the floor; outer film torn on 12 cartons. Area cordoned off and all affected stock quarantined.";

pub const DEEP_ROOT_CAUSE: &str = "Why did delamination occur? Adhesive temperature too low. Why? Heater output dropped. Why? Sensor drift because calibration was overdue by 3 weeks.";

pub const SPECIFIC_CORRECTIVE_ACTION: &str = "1) Calibrate all adhesive temperature sensors immediately. 2) Implement weekly sensor checks per BRCGS 5.6. QA will verify on next batch within 5 days.";

pub const MAINTENANCE_DESCRIPTION: &str = "Sealing jaw on Line 3 bagger not reaching 180C set point. Heater cartridge suspected. Machine stopped at 09:15 and product placed on hold pending repair.";

pub const VAGUE_DESCRIPTION: &str = "Bad product.";

pub const VALID_JUSTIFICATION: &str = "Customer delivery deadline; QA manually verified batch B-2045 seals on line 3 before release.";

/// NCA that passes every check
pub fn complete_nca(user_id: &str, form_id: &str) -> NcaSubmission {
    NcaSubmission::new(user_id, NcCategory::FinishedGoods, COMPLETE_FINISHED_GOODS_DESCRIPTION)
        .with_form_id(form_id)
        .with_root_cause(DEEP_ROOT_CAUSE)
        .with_corrective_action(SPECIFIC_CORRECTIVE_ACTION)
}

/// "Bad product." finished-goods NCA
pub fn vague_nca(user_id: &str, form_id: &str) -> NcaSubmission {
    NcaSubmission::new(user_id, NcCategory::FinishedGoods, VAGUE_DESCRIPTION).with_form_id(form_id)
}

/// MJC with a complete description and no clearance request
pub fn complete_mjc(user_id: &str, form_id: &str) -> MjcSubmission {
    MjcSubmission::new(user_id, MAINTENANCE_DESCRIPTION).with_form_id(form_id)
}

pub fn setup_test_gate() -> (SubmissionGate<InMemoryEnforcementStore>, Arc<InMemoryEnforcementStore>) {
    setup_test_gate_with(QmsConfig::new())
}

pub fn setup_test_gate_with(
    config: QmsConfig,
) -> (SubmissionGate<InMemoryEnforcementStore>, Arc<InMemoryEnforcementStore>) {
    let store = Arc::new(InMemoryEnforcementStore::new());
    (SubmissionGate::new(Arc::clone(&store), config), store)
}

/// Record directory backed by maps
#[derive(Debug, Default)]
pub struct InMemoryRecordDirectory {
    summaries: RwLock<HashMap<RecordRef, RecordSummary>>,
    links: RwLock<HashMap<RecordRef, Vec<RecordRef>>>,
}

impl InMemoryRecordDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: RecordRef, number: &str, status: &str) {
        let summary = RecordSummary {
            number: number.to_string(),
            status: status.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
        };
        self.summaries.write().insert(record, summary);
    }

    pub fn link(&self, from: &RecordRef, to: RecordRef) {
        self.links.write().entry(from.clone()).or_default().push(to);
    }
}

#[async_trait]
impl RecordDirectory for InMemoryRecordDirectory {
    async fn links(&self, record: &RecordRef) -> Result<Vec<RecordRef>, CrossRefError> {
        Ok(self.links.read().get(record).cloned().unwrap_or_default())
    }

    async fn summary(&self, record: &RecordRef) -> Result<Option<RecordSummary>, CrossRefError> {
        Ok(self.summaries.read().get(record).cloned())
    }
}
