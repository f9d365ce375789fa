//! Persistence store: one draft slot and an ordered list of score records
//! on top of a [`KeyValueMedium`].

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::{FormDraft, ScoreRecord};
use crate::traits::KeyValueMedium;

/// Key of the single draft slot.
pub const DRAFT_KEY: &str = "interviewFormData";

/// Key of the saved-record list.
pub const RECORDS_KEY: &str = "interviewScores";

const PROBE_KEY: &str = "__storage_test__";

/// What to do when the record list grows past its soft maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// Keep every record and report the overflow.
    #[default]
    Keep,
    /// Drop the oldest records to stay within the limit.
    EvictOldest,
}

impl std::fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetentionPolicy::Keep => write!(f, "keep"),
            RetentionPolicy::EvictOldest => write!(f, "evict-oldest"),
        }
    }
}

/// Result of appending a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Records in the list after the save.
    pub record_count: usize,
    /// Ids evicted to honour the retention limit.
    pub evicted: Vec<String>,
    /// The list is above its soft maximum.
    pub over_limit: bool,
}

/// Sizes of the stored values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub draft_bytes: usize,
    pub records_bytes: usize,
    pub total_bytes: usize,
    pub record_count: usize,
}

/// Draft and record persistence over a medium.
#[derive(Debug)]
pub struct Store<M> {
    medium: M,
    max_records: usize,
    retention: RetentionPolicy,
}

impl<M: KeyValueMedium> Store<M> {
    pub fn new(medium: M) -> Self {
        Self {
            medium,
            max_records: 100,
            retention: RetentionPolicy::Keep,
        }
    }

    pub fn with_retention(mut self, max_records: usize, retention: RetentionPolicy) -> Self {
        self.max_records = max_records;
        self.retention = retention;
        self
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Round-trip a throwaway key. Any failure means unavailable.
    pub fn is_available(&mut self) -> bool {
        match self.probe() {
            Ok(Some(v)) if v == "test" => true,
            Ok(_) => false,
            Err(e) => {
                tracing::debug!(error = %e, "storage probe failed");
                false
            }
        }
    }

    fn probe(&mut self) -> Result<Option<String>, StorageError> {
        self.medium.set(PROBE_KEY, "test")?;
        let value = self.medium.get(PROBE_KEY)?;
        self.medium.remove(PROBE_KEY)?;
        Ok(value)
    }

    // -- draft slot ---------------------------------------------------------

    pub fn save_draft(&mut self, draft: &FormDraft) -> Result<(), StorageError> {
        let json = serde_json::to_string(draft).map_err(|source| StorageError::Corrupt {
            key: DRAFT_KEY.to_string(),
            source,
        })?;
        self.medium.set(DRAFT_KEY, &json)
    }

    /// Load the draft. A corrupt slot is logged and treated as absent.
    pub fn load_draft(&self) -> Result<Option<FormDraft>, StorageError> {
        let Some(json) = self.medium.get(DRAFT_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(draft) => Ok(Some(draft)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring corrupt draft");
                Ok(None)
            }
        }
    }

    pub fn clear_draft(&mut self) -> Result<(), StorageError> {
        self.medium.remove(DRAFT_KEY)
    }

    // -- record list --------------------------------------------------------

    pub fn list_records(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        let Some(json) = self.medium.get(RECORDS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
            key: RECORDS_KEY.to_string(),
            source,
        })
    }

    pub fn get_record(&self, id: &str) -> Result<Option<ScoreRecord>, StorageError> {
        Ok(self.list_records()?.into_iter().find(|r| r.id == id))
    }

    /// Append a record. The list is written in one call, so a rejected
    /// write leaves the stored list as it was.
    pub fn save_record(&mut self, record: ScoreRecord) -> Result<SaveOutcome, StorageError> {
        let mut records = self.list_records()?;
        records.push(record);

        let mut evicted = Vec::new();
        if records.len() > self.max_records && self.retention == RetentionPolicy::EvictOldest {
            let excess = records.len() - self.max_records;
            evicted = records.drain(..excess).map(|r| r.id).collect();
        }

        self.write_records(&records)?;

        let over_limit = records.len() > self.max_records;
        if over_limit {
            tracing::warn!(
                count = records.len(),
                max = self.max_records,
                "saved records exceed the retention limit"
            );
        }
        if !evicted.is_empty() {
            tracing::info!(evicted = evicted.len(), "evicted oldest records");
        }

        Ok(SaveOutcome {
            record_count: records.len(),
            evicted,
            over_limit,
        })
    }

    /// Remove a record by id. Returns whether it existed.
    pub fn delete_record(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut records = self.list_records()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records)?;
        Ok(true)
    }

    pub fn clear_records(&mut self) -> Result<(), StorageError> {
        self.medium.remove(RECORDS_KEY)
    }

    pub fn storage_info(&self) -> Result<StorageInfo, StorageError> {
        let draft_bytes = self.medium.get(DRAFT_KEY)?.map_or(0, |s| s.len());
        let records_bytes = self.medium.get(RECORDS_KEY)?.map_or(0, |s| s.len());
        let record_count = self.list_records()?.len();
        Ok(StorageInfo {
            draft_bytes,
            records_bytes,
            total_bytes: draft_bytes + records_bytes,
            record_count,
        })
    }

    fn write_records(&mut self, records: &[ScoreRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string(records).map_err(|source| StorageError::Corrupt {
            key: RECORDS_KEY.to_string(),
            source,
        })?;
        self.medium.set(RECORDS_KEY, &json)
    }
}
