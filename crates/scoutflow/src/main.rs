//! scoutflow command-line launcher
//!
//! Bulk-imports codes scanned offline by field operators:
//! - **ingest**: classify, deduplicate, stamp and upload a batch of codes
//! - **schema** / **decode**: inspect the record-kind schema and single codes
//! - **list**: show what is already stored
//! - **config**: show resolved paths and settings

use anyhow::Result;
use clap::{Parser, Subcommand};
use scoutflow_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "scoutflow", version, about = "Bulk-import offline scouting codes")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(flatten)]
    config: cli::config::ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest a batch of scanned codes
    Ingest {
        /// Codes to ingest (otherwise read from --file or stdin, one per line)
        codes: Vec<String>,

        /// Read codes from this file, one per line. Empty lines are skipped and
        /// lines that are not valid UTF-8 are reported.
        #[arg(short, long, conflicts_with = "codes")]
        file: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Process the batch and report, but do not upload
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the record kinds defined by the schema
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a single code and decode its fields
    Decode {
        /// The raw code
        code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored codes in the collection
    List {
        /// Maximum number of codes to show (most recent last)
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Ingest { json, .. }
        | Commands::Schema { json }
        | Commands::Decode { json, .. }
        | Commands::List { json, .. }
        | Commands::Config { json } => *json,
    }
}

fn run_command(cli: Cli) -> Result<()> {
    let config = cli.config.resolve();
    match cli.command {
        Commands::Ingest {
            codes,
            file,
            yes,
            dry_run,
            json,
        } => cli::ingest::run(
            cli::ingest::IngestArgs {
                codes,
                file,
                yes,
                dry_run,
                json,
            },
            &config,
        ),
        Commands::Schema { json } => cli::schema::run_show(json, &config),
        Commands::Decode { code, json } => cli::schema::run_decode(&code, json, &config),
        Commands::List { limit, json } => cli::list::run(limit, json, &config),
        Commands::Config { json } => cli::config::run(json, &config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    if let Err(err) = init_logging(LogConfig {
        app_name: "scoutflow",
        verbose: cli.verbose,
        quiet_console: json_mode,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
