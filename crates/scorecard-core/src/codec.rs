//! Import/export of score records as portable JSON documents.
//!
//! Importing is two steps: [`import_record`] (or [`import_path`]) only
//! checks the file and parses JSON; the caller must then run
//! [`validate_imported_shape`](crate::validation::validate_imported_shape)
//! before [`decode_document`] turns the value into typed data.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ImportError, ScorecardError};
use crate::model::{CandidateInfo, CategoryScores, CheckedItem, ExportEnvelope, ScoreRecord};
use crate::rubric::CategoryKey;

/// Largest accepted import file.
pub const MAX_IMPORT_BYTES: u64 = 1024 * 1024;

/// Default filename prefix for exports.
pub const DEFAULT_EXPORT_PREFIX: &str = "pontuacao-entrevista";

pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["application/json", "text/json"];
pub const ACCEPTED_EXTENSIONS: [&str; 1] = [".json"];

/// A serialized export ready to be written somewhere.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// Suggested file name.
    pub filename: String,
    /// Indented JSON text.
    pub contents: String,
    pub envelope: ExportEnvelope,
}

/// Wrap a record in an export envelope and serialize it.
pub fn export_record(
    record: ScoreRecord,
    export_date: DateTime<Utc>,
    prefix: &str,
) -> Result<ExportDocument, ScorecardError> {
    let filename = export_filename(prefix, &record.info.candidate_name, export_date);
    let envelope = ExportEnvelope::new(record, export_date);
    let contents = serde_json::to_string_pretty(&envelope).map_err(ScorecardError::Export)?;
    Ok(ExportDocument {
        filename,
        contents,
        envelope,
    })
}

/// `<prefix>-<slug>-<YYYY-MM-DD>.json`
pub fn export_filename(prefix: &str, candidate_name: &str, date: DateTime<Utc>) -> String {
    format!(
        "{prefix}-{}-{}.json",
        slugify(candidate_name),
        date.format("%Y-%m-%d")
    )
}

/// Strip everything but ASCII letters, digits and whitespace, turn each
/// whitespace run into one hyphen, lowercase.
pub fn slugify(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c.to_ascii_lowercase());
            in_space = false;
        }
    }
    slug
}

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    /// Declared MIME type, if the source provided one.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn is_accepted_type(name: &str, mime_type: Option<&str>) -> bool {
    if mime_type.is_some_and(|m| ACCEPTED_MIME_TYPES.contains(&m)) {
        return true;
    }
    let lower = name.to_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn check_size(size: u64) -> Result<(), ImportError> {
    if size > MAX_IMPORT_BYTES {
        return Err(ImportError::FileTooLarge {
            size,
            max: MAX_IMPORT_BYTES,
        });
    }
    Ok(())
}

fn parse_json(bytes: &[u8]) -> Result<Value, ImportError> {
    serde_json::from_slice(bytes).map_err(|e| ImportError::ParseError(e.to_string()))
}

/// Check and parse an uploaded file. Does not validate the document shape.
pub fn import_record(file: Option<&ImportFile>) -> Result<Value, ImportError> {
    let file = file.ok_or(ImportError::NoFileSelected)?;
    if !is_accepted_type(&file.name, file.mime_type.as_deref()) {
        return Err(ImportError::InvalidFileType(file.name.clone()));
    }
    check_size(file.size())?;
    parse_json(&file.bytes)
}

/// Check and parse a file on disk. Oversized files are rejected from their
/// metadata without being read.
pub async fn import_path(path: Option<&Path>) -> Result<Value, ImportError> {
    let path = path.ok_or(ImportError::NoFileSelected)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_accepted_type(&name, None) {
        return Err(ImportError::InvalidFileType(name));
    }
    let metadata = tokio::fs::metadata(path).await?;
    check_size(metadata.len())?;
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read import file");
    parse_json(&bytes)
}

/// A validated import, with every optional field defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub info: CandidateInfo,
    #[serde(deserialize_with = "known_categories")]
    pub scores: CategoryScores,
    #[serde(deserialize_with = "known_categories")]
    pub max_scores: CategoryScores,
    pub total_score: u32,
    #[serde(default)]
    pub max_total_score: Option<u32>,
    #[serde(default)]
    pub checked_items: Vec<CheckedItem>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Keep only the rubric's categories from a score map.
fn known_categories<'de, D>(deserializer: D) -> Result<CategoryScores, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(k, v)| Some((k.parse::<CategoryKey>().ok()?, v)))
        .collect())
}

/// Convert a shape-validated document into typed data.
pub fn decode_document(doc: Value) -> Result<ImportedDocument, ImportError> {
    serde_json::from_value(doc).map_err(|e| ImportError::BadScoreStructure(e.to_string()))
}

/// Human-readable size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
