//! # Service Errors
//!
//! Every service failure carries the operation it happened in.
//!
//! ```text
//! ValidationError ──┐
//!                   ├──► ServiceError { stage: "register doctor", kind }
//! DbError ──────────┘
//! ```
//!
//! `DbError::NotFound` and `DbError::UniqueViolation` become their own kinds
//! so the front-end can tell the user what to fix. Anything else is a
//! persistence failure and is logged once, here.

use clinica_core::ValidationError;
use clinica_db::DbError;
use thiserror::Error;
use tracing::error;

/// A failed service call.
#[derive(Debug, Error)]
#[error("{stage}: {kind}")]
pub struct ServiceError {
    /// Operation label, e.g. "update patient".
    pub stage: &'static str,
    pub kind: ServiceErrorKind,
}

/// What went wrong.
#[derive(Debug, Error)]
pub enum ServiceErrorKind {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    #[error("database error: {0}")]
    Persistence(DbError),
}

impl From<DbError> for ServiceErrorKind {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceErrorKind::NotFound { entity, id },
            DbError::UniqueViolation { field, value } => ServiceErrorKind::Duplicate { field, value },
            other => ServiceErrorKind::Persistence(other),
        }
    }
}

impl ServiceError {
    pub fn new(stage: &'static str, kind: impl Into<ServiceErrorKind>) -> Self {
        let kind = kind.into();
        if let ServiceErrorKind::Persistence(ref err) = kind {
            error!(stage = stage, error = %err, "Persistence failure");
        }
        ServiceError { stage, kind }
    }

    /// `map_err` adapter: `.map_err(ServiceError::at("delete doctor"))`.
    pub fn at<E: Into<ServiceErrorKind>>(stage: &'static str) -> impl FnOnce(E) -> ServiceError {
        move |err| ServiceError::new(stage, err)
    }

    pub fn not_found(stage: &'static str, entity: &str, id: impl ToString) -> Self {
        ServiceError::new(
            stage,
            ServiceErrorKind::NotFound {
                entity: entity.to_string(),
                id: id.to_string(),
            },
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ServiceErrorKind::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ServiceErrorKind::NotFound { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, ServiceErrorKind::Duplicate { .. })
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
