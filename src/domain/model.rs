use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One input row or object, reduced to `field -> value` in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based position of the record in the source (data rows only).
    pub position: usize,
    pub fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            fields: Vec::new(),
        }
    }

    /// Inserts or replaces a field. A replaced field keeps its original slot.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The normalized shape that is allowed to reach the customer store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub website_id: u32,
    pub group_id: u32,
}

/// Entity defaults supplied by the selected profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDefaults {
    pub website_id: u32,
    pub group_id: u32,
}

impl Default for CustomerDefaults {
    fn default() -> Self {
        Self {
            website_id: 1,
            group_id: 1,
        }
    }
}

/// Source field names the mapper reads from each `RawRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            email: "emailaddress".to_string(),
            first_name: "fname".to_string(),
            last_name: "lname".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportProfile {
    pub name: String,
    pub defaults: CustomerDefaults,
    pub fields: FieldNames,
}

/// A customer as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    #[serde(flatten)]
    pub data: CanonicalCustomer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Mapping,
    Lookup,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Created { id: u64 },
    SkippedExisting { existing_id: u64 },
    Failed { stage: FailureStage, reason: String },
}

impl RecordOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, RecordOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReport {
    pub position: usize,
    pub email: Option<String>,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub profile: String,
    pub source: String,
    pub format: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub records: Vec<RecordReport>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub(crate) fn push(&mut self, report: RecordReport) {
        match report.outcome {
            RecordOutcome::Created { .. } => self.created += 1,
            RecordOutcome::SkippedExisting { .. } => self.skipped += 1,
            RecordOutcome::Failed { .. } => self.failed += 1,
        }
        self.records.push(report);
    }
}
