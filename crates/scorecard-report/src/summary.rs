//! Display-ready view of a stored record, shared by the renderers.

use scorecard_core::engine::{statistics, ScoreSnapshot, ScoreStatistics};
use scorecard_core::model::ScoreRecord;
use scorecard_core::rubric::Rubric;

/// A checked item as it should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedLine {
    /// Category display name, or the raw key when it is not in the rubric.
    pub category: String,
    pub weight: u32,
    pub label: String,
}

/// Statistics and checked items of one record.
#[derive(Debug, Clone)]
pub struct RecordSummary<'a> {
    pub record: &'a ScoreRecord,
    pub stats: ScoreStatistics,
    pub checked: Vec<CheckedLine>,
}

impl<'a> RecordSummary<'a> {
    /// Uses the record's stored scores; checked items are only listed.
    pub fn new(record: &'a ScoreRecord) -> Self {
        let rubric = Rubric::reference();
        let snapshot = ScoreSnapshot {
            scores: record.scores.clone(),
            max_scores: record.max_scores.clone(),
        };
        let checked = record
            .checked_items
            .iter()
            .map(|item| {
                let resolved = rubric.resolve(item).and_then(|id| {
                    let label = rubric.item(id)?.label;
                    Some((rubric.category(id.category).name, label))
                });
                match resolved {
                    Some((category, label)) => CheckedLine {
                        category: category.to_string(),
                        weight: item.weight,
                        label: label.to_string(),
                    },
                    None => CheckedLine {
                        category: item.category.clone(),
                        weight: item.weight,
                        label: item.text.clone(),
                    },
                }
            })
            .collect();

        Self {
            record,
            stats: statistics(rubric, &snapshot),
            checked,
        }
    }
}

/// Show an empty optional field as a dash.
pub(crate) fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_stored_scores() {
        let record = fixtures::record();
        let summary = RecordSummary::new(&record);
        assert_eq!(summary.stats.total_score, 9);
        assert_eq!(summary.stats.percentage, 14);
        assert_eq!(summary.stats.breakdown[0].score, 5);
    }

    #[test]
    fn unknown_items_keep_their_stored_text() {
        let record = fixtures::record();
        let summary = RecordSummary::new(&record);
        assert_eq!(summary.checked.len(), 4);
        assert_eq!(summary.checked[0].category, "Qualidade do Código");
        assert_eq!(summary.checked[3].category, "design");
        assert_eq!(summary.checked[3].label, "Retired <item>");
    }
}
