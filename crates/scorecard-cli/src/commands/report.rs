//! The `scorecard report` command.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use scorecard_report::html::{
    generate_history_html, generate_html, write_history_report, write_html_report,
};
use scorecard_report::markdown::{generate_markdown, write_markdown_report};

use super::open;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Html,
    Markdown,
}

fn parse_format(format: &str) -> Result<Format> {
    match format {
        "html" => Ok(Format::Html),
        "markdown" | "md" => Ok(Format::Markdown),
        other => bail!("unknown format: {other} (expected html or markdown)"),
    }
}

pub fn execute(
    config: Option<&Path>,
    id: &str,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = parse_format(format)?;
    let ctx = open(config)?;
    let store = ctx.session.store();

    if id == "all" {
        if format != Format::Html {
            bail!("the records listing is only available as html");
        }
        let records = store.list_records()?;
        match &output {
            Some(path) => write_history_report(&records, path)?,
            None => print!("{}", generate_history_html(&records)),
        }
    } else {
        let record = store
            .get_record(id)?
            .with_context(|| format!("score record not found: {id}"))?;
        match (&output, format) {
            (Some(path), Format::Html) => write_html_report(&record, path)?,
            (Some(path), Format::Markdown) => write_markdown_report(&record, path)?,
            (None, Format::Html) => print!("{}", generate_html(&record)),
            (None, Format::Markdown) => print!("{}", generate_markdown(&record)),
        }
    }

    if let Some(path) = output {
        println!("Report written to {}", path.display());
    }
    Ok(())
}
