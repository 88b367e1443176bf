//! # Command-Line Interface
//!
//! ```text
//! clinica [--db PATH] [--config PATH] [--json] [-v]
//!   doctor       add | update | delete | show | find-license | list
//!                | search-name | search-specialty
//!   patient      add | update | delete | show | find-national-id | list
//!                | search-name | search-insurance
//!   appointment  schedule | cancel | doctor | patient
//!   db           status
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use clinica_core::dto::{AppointmentDto, DoctorDto, PatientDto};

#[derive(Debug, Parser)]
#[command(name = "clinica")]
#[command(version)]
#[command(about = "Manage a clinic's doctors, patients and appointments", long_about = None)]
pub struct Cli {
    /// Database file (`:memory:` for a throwaway database)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (default: <config dir>/clinica.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage doctors
    #[clap(visible_alias = "d")]
    Doctor {
        #[command(subcommand)]
        command: DoctorCommand,
    },
    /// Manage patients
    #[clap(visible_alias = "p")]
    Patient {
        #[command(subcommand)]
        command: PatientCommand,
    },
    /// Schedule and list appointments
    #[clap(visible_alias = "a")]
    Appointment {
        #[command(subcommand)]
        command: AppointmentCommand,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

// =============================================================================
// Shared Arguments
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct PersonArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub national_id: String,

    #[arg(long)]
    pub email: Option<String>,
}

/// `--page N` (1-based) and `--page-size`.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
    pub page: i64,

    /// Rows per page (default: ui.page_size)
    #[arg(long)]
    pub page_size: Option<i64>,
}

/// `--limit` / `--offset` for searches.
#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Maximum rows (default: ui.search_limit)
    #[arg(long)]
    pub limit: Option<i64>,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
}

// =============================================================================
// Doctor
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    #[command(flatten)]
    pub person: PersonArgs,

    #[arg(long)]
    pub specialty: String,

    #[arg(long = "license")]
    pub license_number: String,
}

impl DoctorArgs {
    pub fn into_dto(self, id: Option<i64>) -> DoctorDto {
        DoctorDto {
            id,
            first_name: self.person.first_name,
            last_name: self.person.last_name,
            national_id: self.person.national_id,
            email: self.person.email,
            specialty: self.specialty,
            license_number: self.license_number,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DoctorCommand {
    /// Register a doctor
    Add(DoctorArgs),
    /// Replace every field of a doctor
    Update {
        id: i64,
        #[command(flatten)]
        fields: DoctorArgs,
    },
    /// Delete a doctor and their appointments
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one doctor
    Show { id: i64 },
    /// Look up a doctor by license number
    FindLicense { license: String },
    /// List doctors by name
    List(PageArgs),
    /// Search doctors by name
    SearchName {
        term: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Search doctors by specialty
    SearchSpecialty {
        term: String,
        #[command(flatten)]
        window: WindowArgs,
    },
}

// =============================================================================
// Patient
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct PatientArgs {
    #[command(flatten)]
    pub person: PersonArgs,

    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: NaiveDate,

    /// A+, A-, B+, B-, AB+, AB-, O+ or O-
    #[arg(long)]
    pub blood_type: Option<String>,

    /// Medical insurance provider
    #[arg(long = "insurance")]
    pub insurance_name: Option<String>,
}

impl PatientArgs {
    pub fn into_dto(self, id: Option<i64>) -> PatientDto {
        PatientDto {
            id,
            first_name: self.person.first_name,
            last_name: self.person.last_name,
            national_id: self.person.national_id,
            email: self.person.email,
            birth_date: Some(self.birth_date),
            blood_type: self.blood_type,
            insurance_name: self.insurance_name,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum PatientCommand {
    /// Register a patient
    Add(PatientArgs),
    /// Replace every field of a patient
    Update {
        id: i64,
        #[command(flatten)]
        fields: PatientArgs,
    },
    /// Delete a patient and their appointments
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one patient
    Show { id: i64 },
    /// Look up a patient by national ID
    FindNationalId { national_id: String },
    /// List patients by name
    List(PageArgs),
    /// Search patients by name
    SearchName {
        term: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Search patients by insurance provider
    SearchInsurance {
        term: String,
        #[command(flatten)]
        window: WindowArgs,
    },
}

// =============================================================================
// Appointment
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    #[arg(long = "doctor")]
    pub doctor_id: i64,

    #[arg(long = "patient")]
    pub patient_id: i64,

    /// RFC 3339 (2026-05-04T10:30:00Z) or "YYYY-MM-DD HH:MM" in UTC
    #[arg(long = "at", value_parser = parse_when)]
    pub scheduled_at: DateTime<Utc>,

    #[arg(long)]
    pub reason: Option<String>,
}

impl ScheduleArgs {
    pub fn into_dto(self) -> AppointmentDto {
        AppointmentDto {
            id: None,
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            scheduled_at: Some(self.scheduled_at),
            reason: self.reason,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AppointmentCommand {
    /// Book a visit
    Schedule(ScheduleArgs),
    /// Cancel a visit
    Cancel { id: i64 },
    /// A doctor's visits
    Doctor {
        doctor_id: i64,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// A patient's visits
    Patient {
        patient_id: i64,
        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Migrations, record counts and health
    Status,
}

/// Accepts RFC 3339 or a naive "YYYY-MM-DD HH:MM[:SS]" taken as UTC.
pub fn parse_when(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date/time '{}': use 2026-05-04T10:30:00Z", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_when() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 4, 10, 30, 0).unwrap();
        assert_eq!(parse_when("2026-05-04T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_when("2026-05-04T12:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_when("2026-05-04 10:30").unwrap(), expected);
        assert_eq!(parse_when(" 2026-05-04 10:30:00 ").unwrap(), expected);
        assert!(parse_when("next tuesday").is_err());
    }

    #[test]
    fn test_doctor_add_args() {
        let cli = Cli::try_parse_from([
            "clinica",
            "--db",
            ":memory:",
            "doctor",
            "add",
            "--first-name",
            "Gregory",
            "--last-name",
            "House",
            "--national-id",
            "N-1",
            "--specialty",
            "Diagnostics",
            "--license",
            "LIC-1",
        ])
        .unwrap();

        match cli.command {
            Command::Doctor {
                command: DoctorCommand::Add(args),
            } => {
                let dto = args.into_dto(None);
                assert_eq!(dto.license_number, "LIC-1");
                assert_eq!(dto.email, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_page_must_be_positive() {
        assert!(Cli::try_parse_from(["clinica", "doctor", "list", "--page", "0"]).is_err());
        assert!(Cli::try_parse_from(["clinica", "doctor", "list", "--page", "3"]).is_ok());
    }
}
