//! # clinica-core: Pure Domain Logic for Clinica
//!
//! This crate holds the records a medical practice keeps about its doctors
//! and patients, and every rule those records must satisfy before they reach
//! the database. There is no I/O here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Clinica Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    clinica (terminal front-end)                 │   │
//! │  │     doctor add ──► patient search-name ──► appointment ...      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               Services (validate → persist → DTO)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ clinica-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    dto    │  │ validation │  │pagination │  │   │
//! │  │   │  Doctor   │  │ DoctorDto │  │   rules    │  │   Page    │  │   │
//! │  │   │  Patient  │  │PatientDto │  │   email    │  │  bounds   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   clinica-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Stored records (Person, Doctor, Patient, Appointment)
//! - [`dto`] - Data transfer objects exchanged with the front-end
//! - [`validation`] - Field rules turning DTOs into insertable records
//! - [`pagination`] - Limit/offset bounds
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use clinica_core::dto::DoctorDto;
//! use clinica_core::validation::validate_doctor;
//!
//! let dto = DoctorDto {
//!     id: None,
//!     first_name: " Gregory ".to_string(),
//!     last_name: "House".to_string(),
//!     national_id: "HOU-001".to_string(),
//!     email: Some("house@ppth.org".to_string()),
//!     specialty: "Diagnostics".to_string(),
//!     license_number: "LIC-42".to_string(),
//! };
//!
//! let doctor = validate_doctor(&dto).unwrap();
//! assert_eq!(doctor.person.first_name, "Gregory");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dto;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use pagination::Page;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows shown per page on the list screens.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Rows returned by a search when the caller gives no limit.
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

/// Upper bound for any single page request.
pub const MAX_PAGE_LIMIT: i64 = 1000;
