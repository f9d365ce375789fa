//! Core data model: checked items, form drafts, score records and the
//! export envelope.
//!
//! Field names follow the persisted JSON shape (camelCase) so documents
//! written by earlier versions of the form still load.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rubric::{CategoryKey, ItemId};

/// Application identity stamped into export documents.
pub const APP_NAME: &str = "Interview Score Card";

/// Document format version stamped into export documents.
pub const APP_VERSION: &str = "1.0.0";

/// Per-category integer scores.
pub type CategoryScores = BTreeMap<CategoryKey, u32>;

/// Evidence that one checklist item was ticked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedItem {
    /// Stable item identifier. Absent in documents from older versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    /// Category key as stored; unknown keys are tolerated and ignored by scoring.
    pub category: String,
    pub weight: u32,
    /// Label text at the time the item was checked.
    #[serde(default)]
    pub text: String,
}

/// Identifier of an editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    CandidateName,
    InterviewDate,
    Position,
    Interviewer,
    Notes,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::CandidateName,
        FieldId::InterviewDate,
        FieldId::Position,
        FieldId::Interviewer,
        FieldId::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::CandidateName => "candidateName",
            FieldId::InterviewDate => "interviewDate",
            FieldId::Position => "position",
            FieldId::Interviewer => "interviewer",
            FieldId::Notes => "notes",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// Candidate and session metadata shared by drafts and records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateInfo {
    pub candidate_name: String,
    /// ISO date (`YYYY-MM-DD`).
    pub interview_date: String,
    pub position: String,
    pub interviewer: String,
    pub notes: String,
}

impl CandidateInfo {
    pub fn field(&self, field: FieldId) -> &str {
        match field {
            FieldId::CandidateName => &self.candidate_name,
            FieldId::InterviewDate => &self.interview_date,
            FieldId::Position => &self.position,
            FieldId::Interviewer => &self.interviewer,
            FieldId::Notes => &self.notes,
        }
    }

    pub fn set_field(&mut self, field: FieldId, value: String) {
        let slot = match field {
            FieldId::CandidateName => &mut self.candidate_name,
            FieldId::InterviewDate => &mut self.interview_date,
            FieldId::Position => &mut self.position,
            FieldId::Interviewer => &mut self.interviewer,
            FieldId::Notes => &mut self.notes,
        };
        *slot = value;
    }
}

/// In-progress, unsaved form state. One live instance per profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormDraft {
    #[serde(flatten)]
    pub info: CandidateInfo,
    pub checked_items: Vec<CheckedItem>,
}

/// A finalized, immutable scoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: String,
    #[serde(flatten)]
    pub info: CandidateInfo,
    pub scores: CategoryScores,
    pub max_scores: CategoryScores,
    pub total_score: u32,
    pub max_total_score: u32,
    #[serde(default)]
    pub checked_items: Vec<CheckedItem>,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    /// Rounded percentage of the maximum total.
    pub fn percentage(&self) -> u32 {
        crate::engine::percentage(self.total_score, self.max_total_score)
    }
}

/// Portable export document: a record plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    #[serde(flatten)]
    pub record: ScoreRecord,
    #[serde(default)]
    pub percentage: Option<u32>,
    pub export_date: DateTime<Utc>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub app_name: String,
}

impl ExportEnvelope {
    /// Wrap a record, stamping this application's identity.
    pub fn new(record: ScoreRecord, export_date: DateTime<Utc>) -> Self {
        let percentage = Some(record.percentage());
        Self {
            record,
            percentage,
            export_date,
            version: APP_VERSION.to_string(),
            app_name: APP_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_ids_parse() {
        assert_eq!(
            "candidateName".parse::<FieldId>().unwrap(),
            FieldId::CandidateName
        );
        assert!("email".parse::<FieldId>().is_err());
    }

    #[test]
    fn draft_uses_persisted_shape() {
        let mut draft = FormDraft::default();
        draft.info.candidate_name = "Ana".into();
        draft.checked_items.push(CheckedItem {
            id: None,
            category: "technical".into(),
            weight: 3,
            text: "Boas práticas específicas da linguagem".into(),
        });
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["candidateName"], "Ana");
        assert_eq!(json["interviewDate"], "");
        assert_eq!(json["checkedItems"][0]["category"], "technical");
        assert!(json["checkedItems"][0].get("id").is_none());
    }

    #[test]
    fn draft_defaults_missing_fields() {
        let draft: FormDraft = serde_json::from_str(r#"{"candidateName":"Bo"}"#).unwrap();
        assert_eq!(draft.info.candidate_name, "Bo");
        assert!(draft.info.notes.is_empty());
        assert!(draft.checked_items.is_empty());
    }

    #[test]
    fn set_field_targets_one_slot() {
        let mut info = CandidateInfo::default();
        info.set_field(FieldId::Interviewer, "Carla".into());
        assert_eq!(info.field(FieldId::Interviewer), "Carla");
        assert_eq!(info.field(FieldId::Position), "");
    }
}
