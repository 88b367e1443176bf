//! # Clinica Desk Library
//!
//! Terminal front desk for a clinic: doctors, patients and their
//! appointments on a local SQLite database.
//!
//! ## Module Organization
//! ```text
//! clinica_desk_lib/
//! ├── lib.rs          ◄─── You are here (startup & exit codes)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── AppConfig (defaults → TOML → env → flags)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Context & dispatch
//! │   ├── doctor.rs   ◄─── doctor subcommands
//! │   ├── patient.rs  ◄─── patient subcommands
//! │   ├── appointment.rs
//! │   ├── db.rs       ◄─── db status
//! │   └── render.rs   ◄─── text tables / JSON
//! ├── services/       ◄─── validate → repository → DTO
//! └── error.rs        ◄─── ApiError and exit codes
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod services;

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use clinica_db::{Database, DbConfig};
use cli::Cli;
use commands::{Context, Output};
use config::AppConfig;
use error::ApiError;

/// Parses the command line, runs it and maps the outcome to an exit code.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Parse arguments (clap exits with 2 on usage errors)                 │
/// │  2. Load AppConfig                                                      │
/// │  3. Initialize logging (stderr)                                         │
/// │  4. Open the database, run pending migrations                           │
/// │  5. Execute the command, print the result on stdout                     │
/// │  6. Close the pool                                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new(cli.json);

    match run_cli(cli).await {
        Ok(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err, output);
            err.exit_code()
        }
    }
}

async fn run_cli(cli: Cli) -> Result<String, ApiError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(config.log.filter.as_deref(), cli.verbose);

    let db_path = match cli.db {
        Some(path) => path,
        None => config.database_path()?,
    };
    debug!(path = %db_path.display(), "Using database");

    let db = Database::new(
        DbConfig::new(db_path.clone()).max_connections(config.database.max_connections),
    )
    .await
    .map_err(|e| ApiError::from(e).with_stage("open database"))?;

    let ctx = Context::new(db.clone(), db_path, config, Output::new(cli.json));
    let result = commands::execute(cli.command, &ctx).await;

    db.close().await;
    info!("Done");
    result
}

fn report(err: &ApiError, output: Output) {
    match output {
        Output::Json => match serde_json::to_string_pretty(err) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("Error {}", err),
        },
        Output::Text => eprintln!("Error {}", err),
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Filter
/// `RUST_LOG` wins. Otherwise `-v` gives `info,sqlx=warn` and `-vv`
/// gives `debug`; without flags the configured filter applies, else `warn`.
fn init_tracing(configured: Option<&str>, verbose: u8) {
    let fallback = match verbose {
        0 => configured.unwrap_or("warn"),
        1 => "info,sqlx=warn",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when driven from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
