//! # Patient Repository
//!
//! Database operations for patients. Mirrors the doctor repository; the
//! only unique column is `national_id`.

use chrono::Utc;
use clinica_core::{NewPatient, Page, Patient};
use sqlx::SqlitePool;
use tracing::debug;

use super::{like_pattern, search_key};
use crate::error::{DbError, DbResult};

const SELECT_PATIENT: &str = r#"
    SELECT id, first_name, last_name, national_id, email,
           birth_date, blood_type, insurance_name, created_at, updated_at
    FROM patients
"#;

const ORDER_BY_NAME: &str = "ORDER BY first_name_key ASC, last_name_key ASC, id ASC";

/// Repository for patient database operations.
#[derive(Debug, Clone)]
pub struct PatientRepository {
    pool: SqlitePool,
}

impl PatientRepository {
    /// Creates a new PatientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PatientRepository { pool }
    }

    /// Inserts a new patient and returns the stored row.
    ///
    /// ## Errors
    /// * `UniqueViolation` - national ID already taken
    pub async fn insert(&self, patient: &NewPatient) -> DbResult<Patient> {
        debug!(national_id = %patient.person.national_id, "Inserting patient");

        let stored = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (
                first_name, last_name, national_id, email,
                birth_date, blood_type, insurance_name, created_at, updated_at,
                first_name_key, last_name_key, insurance_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8, ?9, ?10, ?11)
            RETURNING id, first_name, last_name, national_id, email,
                      birth_date, blood_type, insurance_name, created_at, updated_at
            "#,
        )
        .bind(&patient.person.first_name)
        .bind(&patient.person.last_name)
        .bind(&patient.person.national_id)
        .bind(&patient.person.email)
        .bind(patient.birth_date)
        .bind(&patient.blood_type)
        .bind(&patient.insurance_name)
        .bind(Utc::now())
        .bind(search_key(&patient.person.first_name))
        .bind(search_key(&patient.person.last_name))
        .bind(patient.insurance_name.as_deref().map(search_key))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| with_conflicting_value(e, patient))?;

        debug!(id = stored.id, "Patient inserted");
        Ok(stored)
    }

    /// Replaces every mutable field of patient `id`.
    ///
    /// ## Errors
    /// * `NotFound` - no patient with that id
    /// * `UniqueViolation` - national ID belongs to another patient
    pub async fn update(&self, id: i64, patient: &NewPatient) -> DbResult<Patient> {
        debug!(id = id, "Updating patient");

        let updated = sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients SET
                first_name = ?1,
                last_name = ?2,
                national_id = ?3,
                email = ?4,
                birth_date = ?5,
                blood_type = ?6,
                insurance_name = ?7,
                updated_at = ?8,
                first_name_key = ?10,
                last_name_key = ?11,
                insurance_key = ?12
            WHERE id = ?9
            RETURNING id, first_name, last_name, national_id, email,
                      birth_date, blood_type, insurance_name, created_at, updated_at
            "#,
        )
        .bind(&patient.person.first_name)
        .bind(&patient.person.last_name)
        .bind(&patient.person.national_id)
        .bind(&patient.person.email)
        .bind(patient.birth_date)
        .bind(&patient.blood_type)
        .bind(&patient.insurance_name)
        .bind(Utc::now())
        .bind(id)
        .bind(search_key(&patient.person.first_name))
        .bind(search_key(&patient.person.last_name))
        .bind(patient.insurance_name.as_deref().map(search_key))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| with_conflicting_value(e, patient))?;

        updated.ok_or_else(|| DbError::not_found("Patient", id))
    }

    /// Deletes patient `id` and returns the removed row.
    pub async fn delete(&self, id: i64) -> DbResult<Patient> {
        debug!(id = id, "Deleting patient");

        let deleted = sqlx::query_as::<_, Patient>(
            r#"
            DELETE FROM patients WHERE id = ?1
            RETURNING id, first_name, last_name, national_id, email,
                      birth_date, blood_type, insurance_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        deleted.ok_or_else(|| DbError::not_found("Patient", id))
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Patient>> {
        let sql = format!("{SELECT_PATIENT} WHERE id = ?1");
        let patient = sqlx::query_as::<_, Patient>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(patient)
    }

    /// Gets a patient by exact national ID.
    pub async fn get_by_national_id(&self, national_id: &str) -> DbResult<Option<Patient>> {
        let sql = format!("{SELECT_PATIENT} WHERE national_id = ?1");
        let patient = sqlx::query_as::<_, Patient>(&sql)
            .bind(national_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(patient)
    }

    pub async fn list(&self, page: Page) -> DbResult<Vec<Patient>> {
        let sql = format!("{SELECT_PATIENT} {ORDER_BY_NAME} LIMIT ?1 OFFSET ?2");
        let patients = sqlx::query_as::<_, Patient>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(patients)
    }

    /// Patients whose "first last" name contains `term`, case-insensitively.
    pub async fn search_by_name(&self, term: &str, page: Page) -> DbResult<Vec<Patient>> {
        debug!(term = %term, limit = page.limit(), "Searching patients by name");

        let sql = format!(
            r#"{SELECT_PATIENT}
            WHERE first_name_key || ' ' || last_name_key LIKE ?1 ESCAPE '\'
            {ORDER_BY_NAME}
            LIMIT ?2 OFFSET ?3"#
        );
        let patients = sqlx::query_as::<_, Patient>(&sql)
            .bind(like_pattern(&search_key(term)))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        debug!(count = patients.len(), "Name search returned patients");
        Ok(patients)
    }

    /// Patients whose insurance provider contains `term`, case-insensitively.
    ///
    /// Patients without insurance never match.
    pub async fn search_by_insurance(&self, term: &str, page: Page) -> DbResult<Vec<Patient>> {
        debug!(term = %term, limit = page.limit(), "Searching patients by insurance");

        let sql = format!(
            r#"{SELECT_PATIENT}
            WHERE insurance_key IS NOT NULL
              AND insurance_key LIKE ?1 ESCAPE '\'
            {ORDER_BY_NAME}
            LIMIT ?2 OFFSET ?3"#
        );
        let patients = sqlx::query_as::<_, Patient>(&sql)
            .bind(like_pattern(&search_key(term)))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        debug!(count = patients.len(), "Insurance search returned patients");
        Ok(patients)
    }

    /// Fills in search keys left empty by the migration that added them.
    pub async fn backfill_search_keys(&self) -> DbResult<u64> {
        let stale = sqlx::query_as::<_, (i64, String, String, Option<String>)>(
            "SELECT id, first_name, last_name, insurance_name FROM patients WHERE first_name_key = ''",
        )
        .fetch_all(&self.pool)
        .await?;

        for (id, first_name, last_name, insurance_name) in &stale {
            sqlx::query(
                "UPDATE patients SET first_name_key = ?1, last_name_key = ?2, insurance_key = ?3
                 WHERE id = ?4",
            )
            .bind(search_key(first_name))
            .bind(search_key(last_name))
            .bind(insurance_name.as_deref().map(search_key))
            .bind(id)
            .execute(&self.pool)
            .await?;
        }

        if !stale.is_empty() {
            debug!(rows = stale.len(), "Backfilled patient search keys");
        }
        Ok(stale.len() as u64)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn with_conflicting_value(err: sqlx::Error, patient: &NewPatient) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => {
            let value = match field.as_str() {
                "national_id" => patient.person.national_id.clone(),
                _ => "unknown".to_string(),
            };
            DbError::UniqueViolation { field, value }
        }
        other => other,
    }
}
