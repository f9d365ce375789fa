//! Terminal implementation of the form view.

use std::collections::BTreeSet;

use comfy_table::{Cell, Color, Table};

use scorecard_core::engine::{ColorBand, ScoreStatistics};
use scorecard_core::model::{CandidateInfo, CheckedItem, FieldId, ScoreRecord};
use scorecard_core::rubric::{ItemId, Rubric};
use scorecard_core::traits::{FormView, Severity};

/// Form state held in memory; messages and tables go to the terminal.
#[derive(Debug, Default)]
pub struct TerminalView {
    info: CandidateInfo,
    checked: BTreeSet<ItemId>,
    stats: Option<ScoreStatistics>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> &CandidateInfo {
        &self.info
    }

    pub fn checked(&self) -> &BTreeSet<ItemId> {
        &self.checked
    }

    /// Scores from the last refresh.
    pub fn stats(&self) -> Option<&ScoreStatistics> {
        self.stats.as_ref()
    }

    /// Print the form, its checked items and the scores.
    pub fn print_form(&self) {
        let mut table = Table::new();
        table.set_header(vec!["Field", "Value"]);
        for field in FieldId::ALL {
            table.add_row(vec![Cell::new(field), Cell::new(self.info.field(field))]);
        }
        println!("{table}");

        let rubric = Rubric::reference();
        if self.checked.is_empty() {
            println!("No items checked.");
        } else {
            println!("Checked items:");
            for id in &self.checked {
                if let Some(item) = rubric.item(*id) {
                    println!("  [x] {id:<18} +{} {}", item.weight, item.label);
                }
            }
        }

        if let Some(stats) = &self.stats {
            print_scores(stats);
        }
    }
}

impl FormView for TerminalView {
    fn field(&self, field: FieldId) -> String {
        self.info.field(field).to_string()
    }

    fn set_field(&mut self, field: FieldId, value: &str) {
        self.info.set_field(field, value.to_string());
    }

    fn checked_items(&self) -> Vec<CheckedItem> {
        let rubric = Rubric::reference();
        self.checked
            .iter()
            .filter_map(|id| rubric.checked_item(*id))
            .collect()
    }

    fn set_checked(&mut self, id: ItemId, checked: bool) {
        if checked {
            self.checked.insert(id);
        } else {
            self.checked.remove(&id);
        }
    }

    fn clear_checked(&mut self) {
        self.checked.clear();
    }

    fn render_records(&mut self, records: &[ScoreRecord]) {
        if records.is_empty() {
            println!("No saved scores.");
            return;
        }
        println!("{}", records_table(records));
    }

    fn render_scores(&mut self, stats: &ScoreStatistics) {
        self.stats = Some(stats.clone());
    }

    fn show_message(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Success | Severity::Info => println!("{message}"),
            Severity::Warning => eprintln!("Warning: {message}"),
            Severity::Error => eprintln!("Error: {message}"),
        }
    }
}

fn band_color(band: ColorBand) -> Color {
    match band {
        ColorBand::Green => Color::Green,
        ColorBand::Amber => Color::Yellow,
        ColorBand::Red => Color::Red,
    }
}

/// Per-category table followed by the total line.
pub fn print_scores(stats: &ScoreStatistics) {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Score", "Max", "%"]);
    for row in &stats.breakdown {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.score),
            Cell::new(row.max_score),
            Cell::new(format!("{}%", row.percentage)),
        ]);
    }
    println!("{table}");
    println!("{}", total_line(stats));
}

pub fn total_line(stats: &ScoreStatistics) -> String {
    format!(
        "Total: {}/{} ({}%) grade {}",
        stats.total_score, stats.max_total_score, stats.percentage, stats.grade
    )
}

pub fn records_table(records: &[ScoreRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Candidate", "Date", "Position", "Score", "%"]);
    for r in records {
        let pct = r.percentage();
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.info.candidate_name),
            Cell::new(&r.info.interview_date),
            Cell::new(&r.info.position),
            Cell::new(format!("{}/{}", r.total_score, r.max_total_score)),
            Cell::new(format!("{pct}%")).fg(band_color(ColorBand::from_percentage(pct))),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_items_come_from_the_rubric() {
        let mut view = TerminalView::new();
        view.set_checked("architecture:1".parse().unwrap(), true);
        view.set_checked("code-quality:1".parse().unwrap(), true);
        view.set_checked("code-quality:1".parse().unwrap(), true);

        let items = view.checked_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "code-quality");
        assert_eq!(items[0].weight, 3);

        view.set_checked("code-quality:1".parse().unwrap(), false);
        assert_eq!(view.checked_items().len(), 1);
    }

    #[test]
    fn total_line_format() {
        let mut engine = scorecard_core::engine::ScoreEngine::new(Rubric::reference());
        engine.compute(&[]);
        assert_eq!(total_line(&engine.statistics()), "Total: 0/65 (0%) grade F");
    }
}
