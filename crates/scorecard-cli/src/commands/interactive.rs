//! The `scorecard interactive` command: a line-oriented form editor.
//!
//! Text edits are saved after the debounce period, checkbox changes are
//! saved immediately, and the draft is also saved on the autosave interval.

use std::path::Path;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use scorecard_core::autosave::Autosave;
use scorecard_core::model::FieldId;
use scorecard_core::traits::FormView;

use super::draft::parse_items;
use super::{open, reported, CliSession, Reported};
use crate::view::total_line;

const HELP: &str = "\
Commands:
  set <name|date|position|interviewer|notes> <value>
  check <item-id>...      uncheck <item-id>...
  show                    list
  save                    clear
  help                    quit";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub async fn execute(config: Option<&Path>) -> Result<()> {
    let mut ctx = open(config)?;
    let mut autosave = Autosave::new(&ctx.config.autosave);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match apply(&mut ctx.session, &mut autosave, line.trim()) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) if e.is::<Reported>() => {}
                    Err(e) => eprintln!("Error: {e:#}"),
                }
            }
            reason = autosave.due() => {
                if ctx.session.save_draft().is_ok() {
                    tracing::debug!(?reason, "draft autosaved");
                }
            }
        }
    }

    autosave.cancel_pending();
    ctx.session.save_draft().map_err(reported)?;
    Ok(())
}

fn apply(session: &mut CliSession, autosave: &mut Autosave, line: &str) -> Result<Flow> {
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => println!("{HELP}"),
        "show" => session.view().print_form(),
        "list" => {
            session.list_records().map_err(reported)?;
        }
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let Some(field) = parse_field(field) else {
                bail!("unknown field '{field}'");
            };
            session.view_mut().set_field(field, value.trim());
            autosave.note_edit();
        }
        "check" | "uncheck" => {
            let items: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
            if items.is_empty() {
                bail!("{command} needs at least one item id");
            }
            for id in parse_items(&items)? {
                session.view_mut().set_checked(id, command == "check");
            }
            let stats = session.handle_score_change().map_err(reported)?;
            println!("{}", total_line(&stats));
        }
        "save" => {
            let record = session.save_record().map_err(reported)?;
            println!("Record id: {}", record.id);
        }
        "clear" => {
            autosave.cancel_pending();
            session.clear_form().map_err(reported)?;
        }
        other => bail!("unknown command '{other}', type 'help'"),
    }
    Ok(Flow::Continue)
}

fn parse_field(s: &str) -> Option<FieldId> {
    match s {
        "name" => Some(FieldId::CandidateName),
        "date" => Some(FieldId::InterviewDate),
        other => other.parse().ok(),
    }
}
