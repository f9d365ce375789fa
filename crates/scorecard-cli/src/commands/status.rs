//! The `scorecard status` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};

use scorecard_core::codec::format_file_size;

use super::open;

pub fn execute(config: Option<&Path>) -> Result<()> {
    let ctx = open(config)?;
    let config = &ctx.config;

    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        Cell::new("Data directory"),
        Cell::new(config.storage.data_dir.display()),
    ]);
    table.add_row(vec![
        Cell::new("Storage"),
        Cell::new(if ctx.session.storage_available() {
            "available"
        } else {
            "unavailable"
        }),
    ]);

    if ctx.session.storage_available() {
        let info = ctx.session.store().storage_info()?;
        table.add_row(vec![Cell::new("Saved records"), Cell::new(info.record_count)]);
        table.add_row(vec![
            Cell::new("Draft size"),
            Cell::new(format_file_size(info.draft_bytes as u64)),
        ]);
        table.add_row(vec![
            Cell::new("Records size"),
            Cell::new(format_file_size(info.records_bytes as u64)),
        ]);
    }

    table.add_row(vec![
        Cell::new("Retention"),
        Cell::new(format!(
            "{} records, {}",
            config.records.max_saved, config.records.retention
        )),
    ]);
    table.add_row(vec![
        Cell::new("Autosave"),
        Cell::new(if config.autosave.enabled {
            format!(
                "every {} ms, {} ms debounce",
                config.autosave.interval_ms, config.autosave.debounce_ms
            )
        } else {
            "disabled".to_string()
        }),
    ]);
    println!("{table}");
    Ok(())
}
