//! HTML report generator.
//!
//! Produces self-contained HTML files with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use scorecard_core::engine::{CategoryBreakdown, ColorBand};
use scorecard_core::model::{ScoreRecord, APP_NAME};

use crate::summary::{or_dash, RecordSummary};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page_start(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate a one-record score card page.
pub fn generate_html(record: &ScoreRecord) -> String {
    let summary = RecordSummary::new(record);
    let stats = &summary.stats;
    let info = &record.info;
    let mut html = String::new();

    page_start(
        &mut html,
        &format!("{APP_NAME} - {}", info.candidate_name),
    );

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&info.candidate_name)));
    html.push_str(&format!(
        "<p class=\"meta\">Date: <strong>{}</strong> | Position: <strong>{}</strong> | Interviewer: <strong>{}</strong></p>\n",
        html_escape(or_dash(&info.interview_date)),
        html_escape(or_dash(&info.position)),
        html_escape(or_dash(&info.interviewer)),
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Saved {}</p>\n",
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Total
    html.push_str("<section class=\"total\">\n");
    html.push_str(&format!(
        "<p class=\"score\" style=\"color: {}\">{} / {} <span>({}%)</span></p>\n",
        stats.color_band.hex(),
        stats.total_score,
        stats.max_total_score,
        stats.percentage
    ));
    html.push_str(&format!("<p class=\"grade\">Grade {}</p>\n", stats.grade));
    html.push_str("</section>\n");

    // Breakdown
    html.push_str("<section class=\"breakdown\">\n");
    html.push_str("<h2>Categories</h2>\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Category</th><th>Score</th><th>Max</th><th>%</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in &stats.breakdown {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
            html_escape(&row.name),
            row.score,
            row.max_score,
            row.percentage
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str(&generate_bar_chart(&stats.breakdown));
    html.push_str("</section>\n");

    // Checked items
    html.push_str("<section class=\"items\">\n");
    html.push_str("<h2>Checked items</h2>\n");
    if summary.checked.is_empty() {
        html.push_str("<p class=\"meta\">No items checked.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for line in &summary.checked {
            html.push_str(&format!(
                "<li><span class=\"cat\">{}</span> {} <span class=\"weight\">+{}</span></li>\n",
                html_escape(&line.category),
                html_escape(&line.label),
                line.weight
            ));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Notes
    if !info.notes.trim().is_empty() {
        html.push_str("<section class=\"notes\">\n<h2>Notes</h2>\n");
        html.push_str(&format!("<p>{}</p>\n", html_escape(&info.notes)));
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(record).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Generate a sortable listing of saved records.
pub fn generate_history_html(records: &[ScoreRecord]) -> String {
    let mut html = String::new();
    page_start(&mut html, &format!("{APP_NAME} - saved scores"));

    html.push_str("<header>\n");
    html.push_str("<h1>Saved scores</h1>\n");
    html.push_str(&format!("<p class=\"meta\">{} records</p>\n", records.len()));
    html.push_str("</header>\n");

    html.push_str("<section class=\"results\">\n");
    if records.is_empty() {
        html.push_str("<p class=\"meta\">No saved scores.</p>\n");
    } else {
        html.push_str("<table class=\"results-table\" id=\"results\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Candidate</th><th onclick=\"sortTable(1)\">Date</th><th onclick=\"sortTable(2)\">Position</th><th onclick=\"sortTable(3)\">Score</th><th onclick=\"sortTable(4)\">%</th><th>Id</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for r in records {
            let pct = r.percentage();
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}/{}</td><td>{}%</td><td><code>{}</code></td></tr>\n",
                band_class(ColorBand::from_percentage(pct)),
                html_escape(&r.info.candidate_name),
                html_escape(or_dash(&r.info.interview_date)),
                html_escape(or_dash(&r.info.position)),
                r.total_score,
                r.max_total_score,
                pct,
                html_escape(&r.id),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write a score card page to a file.
pub fn write_html_report(record: &ScoreRecord, path: &Path) -> Result<()> {
    write_file(path, &generate_html(record))
}

/// Write the saved-records listing to a file.
pub fn write_history_report(records: &[ScoreRecord], path: &Path) -> Result<()> {
    write_file(path, &generate_history_html(records))
}

/// Write `contents` to `path`, creating parent directories.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

fn band_class(band: ColorBand) -> &'static str {
    match band {
        ColorBand::Green => "good",
        ColorBand::Amber => "fair",
        ColorBand::Red => "poor",
    }
}

fn generate_bar_chart(rows: &[CategoryBreakdown]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 220;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, row) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = row.percentage.min(100) as usize * max_width / 100;
        let color = ColorBand::from_percentage(row.percentage).hex();

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&row.name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}/{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            row.score,
            row.max_score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #d4edda; --fair: #fff3cd; --poor: #f8d7da; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --poor: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 2.5rem; font-weight: bold; margin: 0.5rem 0; }
.score span { font-size: 1.25rem; }
.grade { font-size: 1.25rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.good { background: var(--good); }
.fair { background: var(--fair); }
.poor { background: var(--poor); }
.cat { color: #6b7280; font-size: 0.85rem; }
.weight { font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::fixtures;

    #[test]
    fn html_report_contains_required_elements() {
        let record = fixtures::record();
        let html = generate_html(&record);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("9 / 65"));
        assert!(html.contains("Grade F"));
        assert!(html.contains("Arquitetura"));
        assert!(html.contains(ColorBand::Red.hex()));
        assert!(html.contains("Interviewer: <strong>-</strong>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let record = fixtures::record();
        let html = generate_html(&record);
        assert!(html.contains("Maria &lt;da&gt; Silva"));
        assert!(!html.contains("Maria <da> Silva"));
        assert!(html.contains("design &amp; testing"));
        assert!(html.contains("Retired &lt;item&gt;"));
    }

    #[test]
    fn history_lists_every_record() {
        let mut second = fixtures::record();
        second.id = "second".into();
        second.info.candidate_name = "Ana".into();
        let html = generate_history_html(&[fixtures::record(), second]);

        assert!(html.contains("2 records"));
        assert!(html.contains("<td>Ana</td>"));
        assert!(html.contains("<code>second</code>"));
        assert!(html.contains("sortTable"));
        assert!(html.contains("class=\"poor\""));
    }

    #[test]
    fn empty_history() {
        let html = generate_history_html(&[]);
        assert!(html.contains("No saved scores."));
    }

    #[test]
    fn html_report_write_to_file() {
        let record = fixtures::record();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.html");

        write_html_report(&record, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
