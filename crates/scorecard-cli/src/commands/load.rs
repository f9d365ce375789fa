//! The `scorecard load` command.

use std::path::Path;

use anyhow::Result;

use super::{open, reported};

pub fn execute(config: Option<&Path>, id: &str) -> Result<()> {
    let mut ctx = open(config)?;
    ctx.session.load_record(id).map_err(reported)?;
    // The form only lives in the draft slot between invocations.
    ctx.session.save_draft().map_err(reported)?;
    ctx.session.view().print_form();
    Ok(())
}
