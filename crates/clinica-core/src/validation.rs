//! # Validation Module
//!
//! Field rules for doctors, patients and appointments.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end (clap)                                             │
//! │  └── Types: ids are integers, dates parse as YYYY-MM-DD                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present (blank counts as missing)                 │
//! │  ├── Column length limits                                              │
//! │  └── Email / blood type format                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE national_id / license_number                               │
//! │  └── Foreign keys on appointments                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness is deliberately NOT checked here: only the database can
//! answer that question atomically.
//!
//! ## Usage
//! ```rust
//! use clinica_core::validation::{validate_email, validate_search_term};
//!
//! assert!(validate_email("ana@example.com").is_ok());
//! assert!(validate_email("ana@").is_err());
//! assert_eq!(validate_search_term("name", "  house ").unwrap(), "house");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::dto::{AppointmentDto, DoctorDto, PatientDto};
use crate::error::ValidationError;
use crate::types::{NewAppointment, NewDoctor, NewPatient, Person, BLOOD_TYPES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Column Limits
// =============================================================================

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_NATIONAL_ID_LEN: usize = 20;
pub const MAX_EMAIL_LEN: usize = 100;
pub const MAX_SPECIALTY_LEN: usize = 50;
pub const MAX_LICENSE_LEN: usize = 50;
pub const MAX_BLOOD_TYPE_LEN: usize = 5;
pub const MAX_INSURANCE_LEN: usize = 100;
pub const MAX_REASON_LEN: usize = 255;
pub const MAX_SEARCH_LEN: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

// =============================================================================
// Field Validators
// =============================================================================

/// Checks a required text field and returns it trimmed.
///
/// ## Rules
/// - Blank (empty or whitespace only) is missing
/// - At most `max` characters after trimming
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    validate_max_len(field, value, max)?;
    Ok(value.to_string())
}

/// Checks an optional text field. Blank becomes `None`.
pub fn validate_optional(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            validate_max_len(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates email syntax.
///
/// ## Example
/// ```rust
/// use clinica_core::validation::validate_email;
///
/// assert!(validate_email("house@ppth.org").is_ok());
/// assert!(validate_email("first.last+tag@mail.example.co").is_ok());
/// assert!(validate_email("no-at-sign.org").is_err());
/// assert!(validate_email("house@ppth").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }
    Ok(())
}

/// Optional email: blank is `None`, anything else must be well-formed.
pub fn validate_optional_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let email = validate_optional("email", email, MAX_EMAIL_LEN)?;
    if let Some(ref e) = email {
        validate_email(e)?;
    }
    Ok(email)
}

/// Optional blood type, normalized to upper case.
pub fn validate_blood_type(value: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(value) = validate_optional("blood_type", value, MAX_BLOOD_TYPE_LEN)? else {
        return Ok(None);
    };

    let upper = value.to_ascii_uppercase();
    if !BLOOD_TYPES.contains(&upper.as_str()) {
        return Err(ValidationError::NotAllowed {
            field: "blood_type".to_string(),
            allowed: BLOOD_TYPES.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(Some(upper))
}

/// Validates a record id.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a search term and returns it trimmed.
///
/// Unlike listing, searching requires something to search for.
pub fn validate_search_term(field: &str, term: &str) -> ValidationResult<String> {
    validate_required(field, term, MAX_SEARCH_LEN)
}

fn validate_person(
    first_name: &str,
    last_name: &str,
    national_id: &str,
    email: Option<&str>,
) -> ValidationResult<Person> {
    Ok(Person {
        first_name: validate_required("first_name", first_name, MAX_NAME_LEN)?,
        last_name: validate_required("last_name", last_name, MAX_NAME_LEN)?,
        national_id: validate_required("national_id", national_id, MAX_NATIONAL_ID_LEN)?,
        email: validate_optional_email(email)?,
    })
}

// =============================================================================
// Record Validators
// =============================================================================

/// Turns a doctor form into an insertable record.
///
/// ## Required
/// first name, last name, national ID, specialty, license number
pub fn validate_doctor(dto: &DoctorDto) -> ValidationResult<NewDoctor> {
    let person = validate_person(
        &dto.first_name,
        &dto.last_name,
        &dto.national_id,
        dto.email.as_deref(),
    )?;

    Ok(NewDoctor {
        person,
        specialty: validate_required("specialty", &dto.specialty, MAX_SPECIALTY_LEN)?,
        license_number: validate_required("license_number", &dto.license_number, MAX_LICENSE_LEN)?,
    })
}

/// Turns a patient form into an insertable record.
///
/// ## Required
/// first name, last name, national ID, birth date
pub fn validate_patient(dto: &PatientDto) -> ValidationResult<NewPatient> {
    let person = validate_person(
        &dto.first_name,
        &dto.last_name,
        &dto.national_id,
        dto.email.as_deref(),
    )?;

    let birth_date = dto.birth_date.ok_or_else(|| ValidationError::Required {
        field: "birth_date".to_string(),
    })?;

    Ok(NewPatient {
        person,
        birth_date,
        blood_type: validate_blood_type(dto.blood_type.as_deref())?,
        insurance_name: validate_optional(
            "insurance_name",
            dto.insurance_name.as_deref(),
            MAX_INSURANCE_LEN,
        )?,
    })
}

/// Turns an appointment form into an insertable record.
pub fn validate_appointment(dto: &AppointmentDto) -> ValidationResult<NewAppointment> {
    validate_id("doctor_id", dto.doctor_id)?;
    validate_id("patient_id", dto.patient_id)?;

    let scheduled_at = dto.scheduled_at.ok_or_else(|| ValidationError::Required {
        field: "scheduled_at".to_string(),
    })?;

    Ok(NewAppointment {
        doctor_id: dto.doctor_id,
        patient_id: dto.patient_id,
        scheduled_at,
        reason: validate_optional("reason", dto.reason.as_deref(), MAX_REASON_LEN)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
