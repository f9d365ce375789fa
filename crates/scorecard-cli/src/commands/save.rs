//! The `scorecard save` command.

use std::path::Path;

use anyhow::Result;

use super::{open, reported};
use crate::view::total_line;

pub fn execute(config: Option<&Path>) -> Result<()> {
    let mut ctx = open(config)?;
    let record = ctx.session.save_record().map_err(reported)?;
    if let Some(stats) = ctx.session.view().stats() {
        println!("{}", total_line(stats));
    }
    println!("Record id: {}", record.id);
    Ok(())
}
