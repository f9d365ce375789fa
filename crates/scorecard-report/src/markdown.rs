//! Markdown summary of a score record.

use anyhow::Result;
use std::fmt::Write;
use std::path::Path;

use scorecard_core::model::ScoreRecord;

use crate::html::write_file;
use crate::summary::{or_dash, RecordSummary};

/// Escape characters that would break a table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Render a record as Markdown.
pub fn generate_markdown(record: &ScoreRecord) -> String {
    let summary = RecordSummary::new(record);
    let stats = &summary.stats;
    let info = &record.info;
    let mut md = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(md, "# {}\n", info.candidate_name.trim());
    let _ = writeln!(md, "- **Date:** {}", or_dash(&info.interview_date));
    let _ = writeln!(md, "- **Position:** {}", or_dash(&info.position));
    let _ = writeln!(md, "- **Interviewer:** {}", or_dash(&info.interviewer));
    let _ = writeln!(
        md,
        "- **Saved:** {}",
        record.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(md, "- **Id:** `{}`\n", record.id);

    let _ = writeln!(
        md,
        "**Total:** {} / {} ({}%) · **Grade:** {}\n",
        stats.total_score, stats.max_total_score, stats.percentage, stats.grade
    );

    md.push_str("| Category | Score | Max | % |\n");
    md.push_str("|---|---:|---:|---:|\n");
    for row in &stats.breakdown {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {}% |",
            cell(&row.name),
            row.score,
            row.max_score,
            row.percentage
        );
    }

    md.push_str("\n## Checked items\n\n");
    if summary.checked.is_empty() {
        md.push_str("_None._\n");
    } else {
        for line in &summary.checked {
            let _ = writeln!(md, "- [x] {} ({}, +{})", line.label, line.category, line.weight);
        }
    }

    if !info.notes.trim().is_empty() {
        md.push_str("\n## Notes\n\n");
        for l in info.notes.lines() {
            let _ = writeln!(md, "> {l}");
        }
    }

    md
}

/// Write a Markdown summary to a file.
pub fn write_markdown_report(record: &ScoreRecord, path: &Path) -> Result<()> {
    write_file(path, &generate_markdown(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::fixtures;

    #[test]
    fn markdown_contains_totals_and_table() {
        let md = generate_markdown(&fixtures::record());
        assert!(md.starts_with("# Maria <da> Silva\n"));
        assert!(md.contains("**Total:** 9 / 65 (14%)"));
        assert!(md.contains("**Grade:** F"));
        assert!(md.contains("| Arquitetura | 4 | 17 | 24% |"));
        assert!(md.contains("- **Interviewer:** -"));
        assert!(md.contains("> Strong on design & testing"));
    }

    #[test]
    fn markdown_lists_checked_items() {
        let md = generate_markdown(&fixtures::record());
        assert!(md.contains("- [x] Estrutura de código limpa e legível (Qualidade do Código, +3)"));
        assert!(md.contains("- [x] Retired <item> (design, +1)"));
    }

    #[test]
    fn pipes_are_escaped_in_cells() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn markdown_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("score.md");
        write_markdown_report(&fixtures::record(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("## Checked items"));
    }
}
