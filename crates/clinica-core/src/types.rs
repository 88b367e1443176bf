//! # Domain Types
//!
//! Records stored by Clinica.
//!
//! ## Type Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │                    ┌─────────────────────┐                              │
//! │                    │       Person        │  (embedded, not a table)     │
//! │                    │  first_name         │                              │
//! │                    │  last_name          │                              │
//! │                    │  national_id (uniq) │                              │
//! │                    │  email              │                              │
//! │                    └──────────┬──────────┘                              │
//! │               ┌───────────────┴───────────────┐                         │
//! │   ┌───────────▼─────────┐         ┌───────────▼─────────┐               │
//! │   │       Doctor        │         │       Patient       │               │
//! │   │  id                 │         │  id                 │               │
//! │   │  specialty          │         │  birth_date         │               │
//! │   │  license_number(uq) │         │  blood_type         │               │
//! │   └───────────┬─────────┘         │  insurance_name     │               │
//! │               │                   └───────────┬─────────┘               │
//! │               │      ┌─────────────────┐      │                         │
//! │               └─────►│   Appointment   │◄─────┘                         │
//! │                      │  scheduled_at   │                                │
//! │                      └─────────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each stored type has a `New*` twin: the validated payload used for
//! inserts and full replacements. `New*` values only come out of
//! [`crate::validation`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Person
// =============================================================================

/// Fields shared by doctors and patients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub first_name: String,
    pub last_name: String,

    /// Official identification number. Unique per table.
    pub national_id: String,

    pub email: Option<String>,
}

impl Person {
    /// "First Last", as shown in lists.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Doctor
// =============================================================================

/// A doctor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,

    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub person: Person,

    pub specialty: String,

    /// Professional license number. Unique.
    pub license_number: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated doctor payload for insert or full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub person: Person,
    pub specialty: String,
    pub license_number: String,
}

// =============================================================================
// Patient
// =============================================================================

/// A patient row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,

    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub person: Person,

    pub birth_date: NaiveDate,

    /// ABO/Rh group, upper-case (e.g. "AB+").
    pub blood_type: Option<String>,

    /// Name of the medical insurance provider.
    pub insurance_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.birth_date).unwrap_or(0)
    }
}

/// Validated patient payload for insert or full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub person: Person,
    pub birth_date: NaiveDate,
    pub blood_type: Option<String>,
    pub insurance_name: Option<String>,
}

// =============================================================================
// Appointment
// =============================================================================

/// A scheduled visit between one doctor and one patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated appointment payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
}

// =============================================================================
// Blood Type
// =============================================================================

/// Accepted blood groups.
pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
