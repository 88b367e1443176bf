//! # Services
//!
//! The layer between the front-end and the repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command (clap)                                                        │
//! │       │  DoctorDto / PatientDto / AppointmentDto                       │
//! │       ▼                                                                 │
//! │  Service ── validate (clinica-core) ── repository (clinica-db)         │
//! │       │                                                                 │
//! │       ▼  DTO back, or ServiceError { stage, kind }                     │
//! │  render / ApiError                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services are cheap to build: each holds a clone of the [`Database`]
//! handle, which shares one pool.
//!
//! [`Database`]: clinica_db::Database

pub mod appointment;
pub mod doctor;
pub mod error;
pub mod patient;

pub use appointment::AppointmentService;
pub use doctor::DoctorService;
pub use error::{ServiceError, ServiceErrorKind, ServiceResult};
pub use patient::PatientService;
