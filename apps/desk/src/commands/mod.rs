//! # Commands
//!
//! One handler per subcommand. Handlers return the text to print on
//! stdout so they can be tested without a terminal.
//!
//! ```text
//! Cli ──► execute(Command) ──► doctor / patient / appointment / db
//!                                   │
//!                                   ▼
//!                          Service call ──► render (table | JSON)
//! ```

pub mod appointment;
pub mod db;
pub mod doctor;
pub mod patient;
pub mod render;

use clinica_core::Page;
use clinica_db::Database;
use dialoguer::Confirm;
use std::path::PathBuf;

use crate::cli::{Command, PageArgs, WindowArgs};
use crate::config::AppConfig;
use crate::error::{ApiError, ErrorCode};
use crate::services::{AppointmentService, DoctorService, PatientService};

pub use render::Output;

/// Everything a handler needs.
#[derive(Debug, Clone)]
pub struct Context {
    pub db: Database,
    pub db_path: PathBuf,
    pub config: AppConfig,
    pub output: Output,
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub appointments: AppointmentService,
}

impl Context {
    pub fn new(db: Database, db_path: PathBuf, config: AppConfig, output: Output) -> Self {
        Context {
            doctors: DoctorService::new(db.clone()),
            patients: PatientService::new(db.clone()),
            appointments: AppointmentService::new(db.clone()),
            db,
            db_path,
            config,
            output,
        }
    }

    /// Rows per page: `--page-size`, else `ui.page_size`.
    fn page(&self, args: &PageArgs) -> Result<Page, ApiError> {
        let size = args.page_size.unwrap_or(self.config.ui.page_size);
        Page::nth(args.page - 1, size).map_err(|e| ApiError::validation(e.to_string()))
    }

    /// `(limit, offset)` for a search: `--limit`, else `ui.search_limit`.
    fn window(&self, args: &WindowArgs) -> (i64, i64) {
        (args.limit.unwrap_or(self.config.ui.search_limit), args.offset)
    }
}

/// Runs `command` and returns what to print on stdout.
pub async fn execute(command: Command, ctx: &Context) -> Result<String, ApiError> {
    match command {
        Command::Doctor { command } => doctor::run(command, ctx).await,
        Command::Patient { command } => patient::run(command, ctx).await,
        Command::Appointment { command } => appointment::run(command, ctx).await,
        Command::Db { command } => db::run(command, ctx).await,
    }
}

/// Asks before a destructive action unless `--yes` was given.
fn confirm(prompt: &str, yes: bool) -> Result<(), ApiError> {
    if yes {
        return Ok(());
    }

    let accepted = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if accepted {
        Ok(())
    } else {
        Err(ApiError::new(ErrorCode::Aborted, "Cancelled by user"))
    }
}

/// Footer under a paged list, e.g. `page 2 · 20 of 45`.
fn page_footer(page: Page, shown: usize, total: i64) -> String {
    format!("page {} · {} of {}", page.index() + 1, shown, total)
}
