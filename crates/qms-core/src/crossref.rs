//! Cross-procedure references
//!
//! Every record kind belongs to one documented procedure and form. The
//! resolver asks a [`RecordDirectory`] which records a given record links to
//! and renders each as a [`CrossReference`] for navigation.

use crate::error::CrossRefError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qms_enforcement::ParseKindError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of QMS record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// Non-conformance advice
    Nca,
    /// Maintenance job card
    Mjc,
    /// Waste manifest
    WasteManifest,
    /// Customer complaint
    Complaint,
    /// Product recall
    Recall,
    /// Production work order
    WorkOrder,
}

impl RecordKind {
    /// Every kind
    pub const ALL: [RecordKind; 6] = [
        Self::Nca,
        Self::Mjc,
        Self::WasteManifest,
        Self::Complaint,
        Self::Recall,
        Self::WorkOrder,
    ];

    /// Stable kebab-case name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nca => "nca",
            Self::Mjc => "mjc",
            Self::WasteManifest => "waste-manifest",
            Self::Complaint => "complaint",
            Self::Recall => "recall",
            Self::WorkOrder => "work-order",
        }
    }

    /// Governing procedure number
    #[must_use]
    pub fn procedure_reference(&self) -> &'static str {
        match self {
            Self::Nca => "5.7",
            Self::Mjc => "4.7",
            Self::WasteManifest => "4.10",
            Self::Complaint => "3.10",
            Self::Recall => "3.11",
            Self::WorkOrder => "5.3",
        }
    }

    /// Controlled form number
    #[must_use]
    pub fn form_number(&self) -> &'static str {
        match self {
            Self::Nca => "5.7F1",
            Self::Mjc => "4.7F1",
            Self::WasteManifest => "4.10F1",
            Self::Complaint => "3.10F2",
            Self::Recall => "3.11F1",
            Self::WorkOrder => "5.3F1",
        }
    }

    /// Human title prefix
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Nca => "Non-Conformance Advice",
            Self::Mjc => "Maintenance Job Card",
            Self::WasteManifest => "Waste Manifest",
            Self::Complaint => "Customer Complaint",
            Self::Recall => "Product Recall",
            Self::WorkOrder => "Work Order",
        }
    }

    fn route(&self) -> &'static str {
        match self {
            Self::Nca => "/nca",
            Self::Mjc => "/mjc",
            Self::WasteManifest => "/waste",
            Self::Complaint => "/complaints",
            Self::Recall => "/recalls",
            Self::WorkOrder => "/work-orders",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ParseKindError::new("record kind", s))
    }
}

/// Reference to one record by internal id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum RecordRef {
    /// NCA id
    Nca(String),
    /// MJC id
    Mjc(String),
    /// Waste manifest id
    WasteManifest(String),
    /// Complaint id
    Complaint(String),
    /// Recall id
    Recall(String),
    /// Work order id
    WorkOrder(String),
}

impl RecordRef {
    /// Build from kind and id
    #[must_use]
    pub fn new(kind: RecordKind, id: impl Into<String>) -> Self {
        let id = id.into();
        match kind {
            RecordKind::Nca => Self::Nca(id),
            RecordKind::Mjc => Self::Mjc(id),
            RecordKind::WasteManifest => Self::WasteManifest(id),
            RecordKind::Complaint => Self::Complaint(id),
            RecordKind::Recall => Self::Recall(id),
            RecordKind::WorkOrder => Self::WorkOrder(id),
        }
    }

    /// Record kind
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Nca(_) => RecordKind::Nca,
            Self::Mjc(_) => RecordKind::Mjc,
            Self::WasteManifest(_) => RecordKind::WasteManifest,
            Self::Complaint(_) => RecordKind::Complaint,
            Self::Recall(_) => RecordKind::Recall,
            Self::WorkOrder(_) => RecordKind::WorkOrder,
        }
    }

    /// Internal id
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Nca(id)
            | Self::Mjc(id)
            | Self::WasteManifest(id)
            | Self::Complaint(id)
            | Self::Recall(id)
            | Self::WorkOrder(id) => id,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// Directory data for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Human-facing number, e.g. `NCA-2025-00012`
    pub number: String,
    /// Workflow status
    pub status: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Navigable link to a related record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    /// Linked record
    pub record: RecordRef,
    /// Human-facing number
    pub record_number: String,
    /// Display title
    pub title: String,
    /// Workflow status
    pub status: String,
    /// Governing procedure
    pub procedure_reference: String,
    /// Controlled form number
    pub form_number: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Application route
    pub link: String,
}

impl CrossReference {
    /// Render a linked record
    #[must_use]
    pub fn new(record: RecordRef, summary: RecordSummary) -> Self {
        let kind = record.kind();
        Self {
            title: format!("{}: {}", kind.title(), summary.number),
            link: format!("{}/{}", kind.route(), record.id()),
            procedure_reference: kind.procedure_reference().to_string(),
            form_number: kind.form_number().to_string(),
            record_number: summary.number,
            status: summary.status,
            created_at: summary.created_at,
            record,
        }
    }
}

/// Lookup of records and their links
#[async_trait]
pub trait RecordDirectory: Send + Sync {
    /// Records directly linked from `record`
    async fn links(&self, record: &RecordRef) -> Result<Vec<RecordRef>, CrossRefError>;

    /// Summary for one record, if it exists
    async fn summary(&self, record: &RecordRef) -> Result<Option<RecordSummary>, CrossRefError>;
}

/// Resolves related records through a [`RecordDirectory`]
#[derive(Debug, Clone)]
pub struct CrossReferenceResolver<D> {
    directory: D,
}

impl<D: RecordDirectory> CrossReferenceResolver<D> {
    /// Create resolver
    #[must_use]
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// Related records for `record`
    ///
    /// Links whose target no longer exists are skipped.
    ///
    /// # Errors
    /// - `CrossRefError::NotFound` if `record` itself does not exist
    /// - Any directory error
    pub async fn related_records(&self, record: &RecordRef) -> Result<Vec<CrossReference>, CrossRefError> {
        if self.directory.summary(record).await?.is_none() {
            return Err(CrossRefError::NotFound(record.to_string()));
        }

        let mut references = Vec::new();
        for linked in self.directory.links(record).await? {
            match self.directory.summary(&linked).await? {
                Some(summary) => references.push(CrossReference::new(linked, summary)),
                None => tracing::debug!("Skipping dangling link {} -> {}", record, linked),
            }
        }
        Ok(references)
    }
}
