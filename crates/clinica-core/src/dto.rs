//! # Data Transfer Objects
//!
//! Plain records moving between the front-end and the service layer.
//!
//! ## Why separate DTOs?
//! ```text
//! form input ──► DoctorDto ──► validate_doctor() ──► NewDoctor ──► INSERT
//!                 (raw, may be incomplete)             (trimmed, checked)
//!
//! Doctor row ──► DoctorDto ──► table / JSON output
//! ```
//! A DTO may be missing an id (not registered yet) or a birth date (not
//! entered yet); stored records never are.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Appointment, Doctor, Patient};

/// Doctor fields as entered in the form or returned to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    /// Absent until the doctor is registered.
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: Option<String>,
    pub specialty: String,
    pub license_number: String,
}

impl From<Doctor> for DoctorDto {
    fn from(d: Doctor) -> Self {
        DoctorDto {
            id: Some(d.id),
            first_name: d.person.first_name,
            last_name: d.person.last_name,
            national_id: d.person.national_id,
            email: d.person.email,
            specialty: d.specialty,
            license_number: d.license_number,
        }
    }
}

/// Patient fields as entered in the form or returned to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub blood_type: Option<String>,
    pub insurance_name: Option<String>,
}

impl From<Patient> for PatientDto {
    fn from(p: Patient) -> Self {
        PatientDto {
            id: Some(p.id),
            first_name: p.person.first_name,
            last_name: p.person.last_name,
            national_id: p.person.national_id,
            email: p.person.email,
            birth_date: Some(p.birth_date),
            blood_type: p.blood_type,
            insurance_name: p.insurance_name,
        }
    }
}

/// Appointment fields as entered or listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: Option<i64>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        AppointmentDto {
            id: Some(a.id),
            doctor_id: a.doctor_id,
            patient_id: a.patient_id,
            scheduled_at: Some(a.scheduled_at),
            reason: a.reason,
        }
    }
}
