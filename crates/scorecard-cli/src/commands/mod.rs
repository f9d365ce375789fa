//! One module per subcommand, plus the session setup they share.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use scorecard_core::config::{load_config_from, ScorecardConfig};
use scorecard_core::error::ScorecardError;
use scorecard_core::medium::FileMedium;
use scorecard_core::session::Session;
use scorecard_core::store::Store;

use crate::view::TerminalView;

pub mod clear_records;
pub mod delete;
pub mod draft;
pub mod export;
pub mod import;
pub mod init;
pub mod interactive;
pub mod list;
pub mod load;
pub mod report;
pub mod rubric;
pub mod save;
pub mod status;

pub type CliSession = Session<FileMedium, TerminalView>;

/// Loaded configuration plus a started session over the data directory.
pub struct Context {
    pub config: ScorecardConfig,
    pub session: CliSession,
}

/// Load config, open the data directory and restore the draft.
pub fn open(config_path: Option<&Path>) -> Result<Context> {
    let config = load_config_from(config_path)?;
    let medium = FileMedium::new(config.storage.data_dir.clone())
        .with_quota(config.storage.quota_bytes);
    let store =
        Store::new(medium).with_retention(config.records.max_saved, config.records.retention);
    let mut session =
        Session::new(store, TerminalView::new()).with_export_prefix(config.export.prefix.clone());
    session.start();
    Ok(Context { config, session })
}

/// A session failure that the view has already shown.
#[derive(Debug)]
pub struct Reported(pub ScorecardError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Reported {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

pub fn reported(e: ScorecardError) -> anyhow::Error {
    anyhow::Error::new(Reported(e))
}
