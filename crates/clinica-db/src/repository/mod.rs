//! # Repository Module
//!
//! Database repository implementations for Clinica.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service                                                               │
//! │       │                                                                 │
//! │       │  db.doctors().search_by_specialty("cardio", page)              │
//! │       ▼                                                                 │
//! │  DoctorRepository                                                      │
//! │  ├── insert(&self, doctor)                                             │
//! │  ├── update(&self, id, doctor)                                         │
//! │  ├── delete(&self, id)                                                 │
//! │  ├── get_by_id / get_by_license                                        │
//! │  └── list / search_by_name / search_by_specialty                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Search Semantics
//! All text searches are case-insensitive substring matches. The search term
//! is matched literally: `%` and `_` in user input are escaped, so they never
//! act as wildcards.
//!
//! Case folding happens here, not in SQL: every write stores a
//! [`search_key`] copy of the searchable columns (`*_key`), and searches
//! compare against those with a folded term. Name ordering uses the same
//! keys, so "ana" and "Ana" sort together.
//!
//! ## Available Repositories
//!
//! - [`DoctorRepository`](doctor::DoctorRepository) - Doctor CRUD and search
//! - [`PatientRepository`](patient::PatientRepository) - Patient CRUD and search
//! - [`AppointmentRepository`](appointment::AppointmentRepository) - Scheduling

pub mod appointment;
pub mod doctor;
pub mod patient;

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Lower-cased form of `value` used for searching and ordering.
///
/// Unlike SQLite's `LOWER()`, this folds non-ASCII letters too.
pub(crate) fn search_key(value: &str) -> String {
    value.to_lowercase()
}

/// Wraps `term` in `%...%` for a literal substring match.
///
/// Pair with `LIKE ? ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
