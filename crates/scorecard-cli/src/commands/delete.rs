//! The `scorecard delete` command.

use std::path::Path;

use anyhow::Result;

use super::{open, reported};

pub fn execute(config: Option<&Path>, id: &str) -> Result<()> {
    let mut ctx = open(config)?;
    ctx.session.delete_record(id).map_err(reported)
}
