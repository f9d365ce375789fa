//! The `scorecard export` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{open, reported};

pub fn execute(config: Option<&Path>, id: Option<&str>, output: PathBuf) -> Result<()> {
    let mut ctx = open(config)?;
    let doc = match id {
        Some(id) => ctx.session.export_record(id),
        None => ctx.session.export_current(),
    }
    .map_err(reported)?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let path = output.join(&doc.filename);
    std::fs::write(&path, &doc.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
