//! The `scorecard import` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{open, reported};

pub async fn execute(config: Option<&Path>, file: PathBuf) -> Result<()> {
    let mut ctx = open(config)?;
    ctx.session
        .import_path(Some(&file))
        .await
        .map_err(reported)?;
    ctx.session.save_draft().map_err(reported)?;
    ctx.session.view().print_form();
    Ok(())
}
