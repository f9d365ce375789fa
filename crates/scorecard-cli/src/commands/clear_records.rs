//! The `scorecard clear-records` command.

use std::path::Path;

use anyhow::{bail, Result};

use super::{open, reported};

pub fn execute(config: Option<&Path>, yes: bool) -> Result<()> {
    if !yes {
        bail!("this deletes every saved record; pass --yes to confirm");
    }
    let mut ctx = open(config)?;
    ctx.session.clear_records().map_err(reported)?;
    Ok(())
}
