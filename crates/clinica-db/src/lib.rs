//! # clinica-db: Database Layer for Clinica
//!
//! This crate provides database access for Clinica.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Clinica Data Flow                                │
//! │                                                                         │
//! │  Service call (register doctor)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     clinica-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │   │   │
//! │  │   │               │    │ DoctorRepo     │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ PatientRepo    │   │ 001_initial  │   │   │
//! │  │   │               │    │ AppointmentRepo│   │ 002_appts    │   │   │
//! │  │   │               │    │                │   │ 003_keys     │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/clinica/clinica.db                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (doctor, patient, appointment)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinica_core::Page;
//! use clinica_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/clinica.db")).await?;
//! let cardiologists = db.doctors().search_by_specialty("cardio", Page::search()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::appointment::AppointmentRepository;
pub use repository::doctor::DoctorRepository;
pub use repository::patient::PatientRepository;
