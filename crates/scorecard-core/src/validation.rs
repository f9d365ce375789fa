//! Input validation for candidate metadata and imported documents.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::error::{ImportError, ValidationError};
use crate::model::{CandidateInfo, APP_NAME};
use crate::rubric::Rubric;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Fields an imported document must carry.
pub const REQUIRED_IMPORT_FIELDS: [&str; 4] =
    ["candidateName", "scores", "maxScores", "totalScore"];

/// Non-blocking issue reported alongside a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationWarning {
    MissingPosition,
    MissingInterviewer,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::MissingPosition => write!(f, "position not specified"),
            ValidationWarning::MissingInterviewer => write!(f, "interviewer not specified"),
        }
    }
}

/// Outcome of validating a form before saving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Parse an interview date. Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}

/// Validate the interview date against `today` at day granularity.
pub fn validate_date(s: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::MissingDate);
    }
    let date = parse_date(s).ok_or_else(|| ValidationError::InvalidDate(s.to_string()))?;
    if date > today {
        return Err(ValidationError::FutureDate(date));
    }
    Ok(date)
}

pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    let len = notes.chars().count();
    if len > MAX_NOTES_LENGTH {
        return Err(ValidationError::NotesTooLong {
            len,
            max: MAX_NOTES_LENGTH,
        });
    }
    Ok(())
}

/// Hard errors for name/date/notes, soft warnings for position/interviewer.
pub fn validate_form_for_save(info: &CandidateInfo, today: NaiveDate) -> FormValidation {
    let mut result = FormValidation::default();

    if let Err(e) = validate_name(&info.candidate_name) {
        result.errors.push(e);
    }
    if let Err(e) = validate_date(&info.interview_date, today) {
        result.errors.push(e);
    }
    if let Err(e) = validate_notes(&info.notes) {
        result.errors.push(e);
    }

    if info.position.trim().is_empty() {
        result.warnings.push(ValidationWarning::MissingPosition);
    }
    if info.interviewer.trim().is_empty() {
        result.warnings.push(ValidationWarning::MissingInterviewer);
    }

    result
}

/// Check that a parsed document has the shape of an exported record.
///
/// Does not mutate anything; callers must run this before trusting `doc`.
pub fn validate_imported_shape(doc: &Value, rubric: &Rubric) -> Result<(), ImportError> {
    let obj = doc.as_object().ok_or(ImportError::NotAnObject)?;

    let missing: Vec<&'static str> = REQUIRED_IMPORT_FIELDS
        .into_iter()
        .filter(|f| !obj.contains_key(*f))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingFields(missing));
    }

    validate_scores_structure(&obj["scores"], &obj["maxScores"], rubric)?;

    if let Some(app) = obj.get("appName").and_then(Value::as_str) {
        if !app.is_empty() && app != APP_NAME {
            return Err(ImportError::WrongApp {
                found: app.to_string(),
                expected: APP_NAME.to_string(),
            });
        }
    }

    Ok(())
}

fn validate_scores_structure(
    scores: &Value,
    max_scores: &Value,
    rubric: &Rubric,
) -> Result<(), ImportError> {
    let bad = |msg: String| Err(ImportError::BadScoreStructure(msg));

    for category in rubric.categories() {
        let key = category.key.as_str();
        let (Some(score), Some(max)) = (scores.get(key), max_scores.get(key)) else {
            return bad(format!("category '{key}' is missing"));
        };
        let (Some(score), Some(max)) = (score.as_f64(), max.as_f64()) else {
            return bad(format!("category '{key}' has a non-numeric value"));
        };
        if score.fract() != 0.0 || max.fract() != 0.0 {
            return bad(format!("category '{key}' has a fractional value"));
        }
        if max != f64::from(category.max_score) {
            return bad(format!(
                "category '{key}' declares maximum {max}, expected {}",
                category.max_score
            ));
        }
        if score < 0.0 || score > max {
            return bad(format!("category '{key}' score {score} is outside 0-{max}"));
        }
    }
    Ok(())
}
