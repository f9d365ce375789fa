//! The `scorecard list` command.

use std::path::Path;

use anyhow::Result;

use super::{open, reported};

pub fn execute(config: Option<&Path>) -> Result<()> {
    let mut ctx = open(config)?;
    let records = ctx.session.list_records().map_err(reported)?;
    if !records.is_empty() {
        println!("{} record(s)", records.len());
    }
    Ok(())
}
