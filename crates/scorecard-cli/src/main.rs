//! scorecard CLI: a terminal front-end for the interview score card.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod view;

#[derive(Parser)]
#[command(name = "scorecard", version, about = "Interview score card")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter scorecard.toml
    Init,

    /// Show the rubric with item ids and weights
    Rubric,

    /// Inspect or edit the current form
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Validate the form and save it as a score record
    Save,

    /// List saved score records
    List,

    /// Load a saved record into the form
    Load {
        /// Record id
        id: String,
    },

    /// Delete a saved record
    Delete {
        /// Record id
        id: String,
    },

    /// Delete every saved record (the draft is kept)
    ClearRecords {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Export the form, or a saved record, as a JSON document
    Export {
        /// Export this saved record instead of the current form
        #[arg(long)]
        id: Option<String>,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },

    /// Import an exported JSON document into the form
    Import {
        /// Path to the .json file
        file: PathBuf,
    },

    /// Render a saved record as a report
    Report {
        /// Record id, or "all" for the saved-records listing
        id: String,

        /// Output format: html, markdown
        #[arg(long, default_value = "html")]
        format: String,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show storage and configuration status
    Status,

    /// Edit the form line by line with autosave
    Interactive,
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the form and its scores
    Show,

    /// Set candidate fields
    Set {
        #[arg(long)]
        name: Option<String>,

        /// Interview date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        position: Option<String>,

        #[arg(long)]
        interviewer: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Check rubric items by id (e.g. code-quality:1)
    Check {
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Uncheck rubric items by id
    Uncheck {
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Clear every field and checkbox
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scorecard=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Rubric => commands::rubric::execute(),
        Commands::Draft { action } => match action {
            DraftAction::Show => commands::draft::show(config),
            DraftAction::Set {
                name,
                date,
                position,
                interviewer,
                notes,
            } => commands::draft::set(
                config,
                commands::draft::FieldUpdates {
                    name,
                    date,
                    position,
                    interviewer,
                    notes,
                },
            ),
            DraftAction::Check { items } => commands::draft::check(config, &items, true),
            DraftAction::Uncheck { items } => commands::draft::check(config, &items, false),
            DraftAction::Clear => commands::draft::clear(config),
        },
        Commands::Save => commands::save::execute(config),
        Commands::List => commands::list::execute(config),
        Commands::Load { id } => commands::load::execute(config, &id),
        Commands::Delete { id } => commands::delete::execute(config, &id),
        Commands::ClearRecords { yes } => commands::clear_records::execute(config, yes),
        Commands::Export { id, output } => commands::export::execute(config, id.as_deref(), output),
        Commands::Import { file } => commands::import::execute(config, file).await,
        Commands::Report { id, format, output } => {
            commands::report::execute(config, &id, &format, output)
        }
        Commands::Status => commands::status::execute(config),
        Commands::Interactive => commands::interactive::execute(config).await,
    };

    if let Err(e) = result {
        // Session failures were already shown through the view.
        if !e.is::<commands::Reported>() {
            eprintln!("Error: {e:#}");
        }
        process::exit(1);
    }
}
