//! # API Error Type
//!
//! What the user sees when a command fails.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Clinica                                │
//! │                                                                         │
//! │  command handler                                                       │
//! │       │  Result<T, ApiError>                                           │
//! │       ▼                                                                 │
//! │  ServiceError { stage, kind } ──► ApiError { code, stage, message }    │
//! │  ConfigError ───────────────────► ApiError { CONFIG_ERROR, ... }       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stderr:  Error [NOT_FOUND] update doctor: Doctor not found: 42        │
//! │  exit:    3                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` the same error is printed to stderr as an object:
//! ```json
//! { "code": "NOT_FOUND", "stage": "update doctor", "message": "Doctor not found: 42" }
//! ```

use serde::Serialize;
use std::process::ExitCode;

use crate::config::ConfigError;
use crate::services::{ServiceError, ServiceErrorKind};
use clinica_db::DbError;

/// Error returned from command handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Operation that failed, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, each with its own process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Record not found
    NotFound,

    /// Unique value already taken
    Duplicate,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    /// User declined a confirmation prompt
    Aborted,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Duplicate => "DUPLICATE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Aborted => "ABORTED",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Duplicate => 4,
            _ => 1,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            stage: None,
            message: message.into(),
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

/// Converts database errors to API errors.
///
/// Internal details go to the log; the user gets a short message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, format!("Database connection failed: {}", e))
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::QueryFailed(_)
            | DbError::TransactionFailed(_)
            | DbError::Internal(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let api = match err.kind {
            ServiceErrorKind::Validation(e) => ApiError::validation(e.to_string()),
            ServiceErrorKind::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            ServiceErrorKind::Duplicate { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            // Already logged by the service layer
            ServiceErrorKind::Persistence(e) => ApiError::from(e),
        };
        api.with_stage(err.stage)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string()).with_stage("load config")
    }
}

impl From<dialoguer::Error> for ApiError {
    fn from(err: dialoguer::Error) -> Self {
        ApiError::internal(format!("Prompt failed: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.stage {
            Some(stage) => write!(f, "[{}] {}: {}", self.code.as_str(), stage, self.message),
            None => write!(f, "[{}] {}", self.code.as_str(), self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use clinica_core::ValidationError;

    #[test]
    fn test_service_errors_map_to_codes() {
        let err: ApiError = ServiceError::new(
            "register doctor",
            ValidationError::Required {
                field: "specialty".to_string(),
            },
        )
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.exit_status(), 2);
        assert_eq!(
            err.to_string(),
            "[VALIDATION_ERROR] register doctor: specialty is required"
        );

        let err: ApiError =
            ServiceError::new("delete patient", DbError::not_found("Patient", 9)).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.code.exit_status(), 3);

        let err: ApiError =
            ServiceError::new("register patient", DbError::duplicate("national_id", "P-1")).into();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(err.code.exit_status(), 4);
        assert_eq!(err.message, "national_id 'P-1' already exists");

        let err: ApiError =
            ServiceError::new("list doctors", DbError::QueryFailed("boom".into())).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.code.exit_status(), 1);
        assert!(!err.message.contains("boom"));
    }

    #[test]
    fn test_json_shape() {
        let err = ApiError::not_found("Doctor", "42").with_stage("update doctor");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["stage"], "update doctor");
        assert_eq!(json["message"], "Doctor not found: 42");
    }
}
