//! # Doctor Repository
//!
//! Database operations for doctors.
//!
//! ## Key Operations
//! - Insert / full update / delete, each a single statement
//! - Lookup by id and by license number
//! - Paged listing and case-insensitive search by name or specialty
//!
//! Uniqueness of `national_id` and `license_number` is enforced by the
//! schema. A violating insert or update fails with
//! [`DbError::UniqueViolation`] naming the column and the offending value.

use chrono::Utc;
use clinica_core::{Doctor, NewDoctor, Page};
use sqlx::SqlitePool;
use tracing::debug;

use super::{like_pattern, search_key};
use crate::error::{DbError, DbResult};

const SELECT_DOCTOR: &str = r#"
    SELECT id, first_name, last_name, national_id, email,
           specialty, license_number, created_at, updated_at
    FROM doctors
"#;

const ORDER_BY_NAME: &str = "ORDER BY first_name_key ASC, last_name_key ASC, id ASC";

/// Repository for doctor database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = DoctorRepository::new(pool);
///
/// let doctor = repo.insert(&new_doctor).await?;
/// let found = repo.get_by_license("LIC-42").await?;
/// ```
#[derive(Debug, Clone)]
pub struct DoctorRepository {
    pool: SqlitePool,
}

impl DoctorRepository {
    /// Creates a new DoctorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DoctorRepository { pool }
    }

    /// Inserts a new doctor and returns the stored row.
    ///
    /// ## Errors
    /// * `UniqueViolation` - national ID or license number already taken
    pub async fn insert(&self, doctor: &NewDoctor) -> DbResult<Doctor> {
        debug!(license = %doctor.license_number, "Inserting doctor");

        let now = Utc::now();
        let stored = sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (
                first_name, last_name, national_id, email,
                specialty, license_number, created_at, updated_at,
                first_name_key, last_name_key, specialty_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, ?9, ?10)
            RETURNING id, first_name, last_name, national_id, email,
                      specialty, license_number, created_at, updated_at
            "#,
        )
        .bind(&doctor.person.first_name)
        .bind(&doctor.person.last_name)
        .bind(&doctor.person.national_id)
        .bind(&doctor.person.email)
        .bind(&doctor.specialty)
        .bind(&doctor.license_number)
        .bind(now)
        .bind(search_key(&doctor.person.first_name))
        .bind(search_key(&doctor.person.last_name))
        .bind(search_key(&doctor.specialty))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| with_conflicting_value(e, doctor))?;

        debug!(id = stored.id, "Doctor inserted");
        Ok(stored)
    }

    /// Replaces every mutable field of doctor `id`.
    ///
    /// `created_at` is preserved; `updated_at` is bumped.
    ///
    /// ## Errors
    /// * `NotFound` - no doctor with that id
    /// * `UniqueViolation` - national ID or license number belongs to another doctor
    pub async fn update(&self, id: i64, doctor: &NewDoctor) -> DbResult<Doctor> {
        debug!(id = id, "Updating doctor");

        let updated = sqlx::query_as::<_, Doctor>(
            r#"
            UPDATE doctors SET
                first_name = ?1,
                last_name = ?2,
                national_id = ?3,
                email = ?4,
                specialty = ?5,
                license_number = ?6,
                updated_at = ?7,
                first_name_key = ?9,
                last_name_key = ?10,
                specialty_key = ?11
            WHERE id = ?8
            RETURNING id, first_name, last_name, national_id, email,
                      specialty, license_number, created_at, updated_at
            "#,
        )
        .bind(&doctor.person.first_name)
        .bind(&doctor.person.last_name)
        .bind(&doctor.person.national_id)
        .bind(&doctor.person.email)
        .bind(&doctor.specialty)
        .bind(&doctor.license_number)
        .bind(Utc::now())
        .bind(id)
        .bind(search_key(&doctor.person.first_name))
        .bind(search_key(&doctor.person.last_name))
        .bind(search_key(&doctor.specialty))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| with_conflicting_value(e, doctor))?;

        updated.ok_or_else(|| DbError::not_found("Doctor", id))
    }

    /// Deletes doctor `id` and returns the removed row.
    ///
    /// The doctor's appointments are removed with it.
    pub async fn delete(&self, id: i64) -> DbResult<Doctor> {
        debug!(id = id, "Deleting doctor");

        let deleted = sqlx::query_as::<_, Doctor>(
            r#"
            DELETE FROM doctors WHERE id = ?1
            RETURNING id, first_name, last_name, national_id, email,
                      specialty, license_number, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        deleted.ok_or_else(|| DbError::not_found("Doctor", id))
    }

    /// Gets a doctor by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Doctor>> {
        let sql = format!("{SELECT_DOCTOR} WHERE id = ?1");
        let doctor = sqlx::query_as::<_, Doctor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(doctor)
    }

    /// Gets a doctor by exact license number.
    pub async fn get_by_license(&self, license_number: &str) -> DbResult<Option<Doctor>> {
        let sql = format!("{SELECT_DOCTOR} WHERE license_number = ?1");
        let doctor = sqlx::query_as::<_, Doctor>(&sql)
            .bind(license_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(doctor)
    }

    /// Lists doctors ordered by name.
    pub async fn list(&self, page: Page) -> DbResult<Vec<Doctor>> {
        let sql = format!("{SELECT_DOCTOR} {ORDER_BY_NAME} LIMIT ?1 OFFSET ?2");
        let doctors = sqlx::query_as::<_, Doctor>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(doctors)
    }

    /// Doctors whose "first last" name contains `term`, case-insensitively.
    pub async fn search_by_name(&self, term: &str, page: Page) -> DbResult<Vec<Doctor>> {
        debug!(term = %term, limit = page.limit(), "Searching doctors by name");

        let sql = format!(
            r#"{SELECT_DOCTOR}
            WHERE first_name_key || ' ' || last_name_key LIKE ?1 ESCAPE '\'
            {ORDER_BY_NAME}
            LIMIT ?2 OFFSET ?3"#
        );
        let doctors = sqlx::query_as::<_, Doctor>(&sql)
            .bind(like_pattern(&search_key(term)))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        debug!(count = doctors.len(), "Name search returned doctors");
        Ok(doctors)
    }

    /// Doctors whose specialty contains `term`, case-insensitively.
    pub async fn search_by_specialty(&self, term: &str, page: Page) -> DbResult<Vec<Doctor>> {
        debug!(term = %term, limit = page.limit(), "Searching doctors by specialty");

        let sql = format!(
            r#"{SELECT_DOCTOR}
            WHERE specialty_key LIKE ?1 ESCAPE '\'
            {ORDER_BY_NAME}
            LIMIT ?2 OFFSET ?3"#
        );
        let doctors = sqlx::query_as::<_, Doctor>(&sql)
            .bind(like_pattern(&search_key(term)))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        debug!(count = doctors.len(), "Specialty search returned doctors");
        Ok(doctors)
    }

    /// Fills in search keys left empty by the migration that added them.
    ///
    /// Returns the number of rows updated.
    pub async fn backfill_search_keys(&self) -> DbResult<u64> {
        let stale = sqlx::query_as::<_, (i64, String, String, String)>(
            "SELECT id, first_name, last_name, specialty FROM doctors WHERE first_name_key = ''",
        )
        .fetch_all(&self.pool)
        .await?;

        for (id, first_name, last_name, specialty) in &stale {
            sqlx::query(
                "UPDATE doctors SET first_name_key = ?1, last_name_key = ?2, specialty_key = ?3
                 WHERE id = ?4",
            )
            .bind(search_key(first_name))
            .bind(search_key(last_name))
            .bind(search_key(specialty))
            .bind(id)
            .execute(&self.pool)
            .await?;
        }

        if !stale.is_empty() {
            debug!(rows = stale.len(), "Backfilled doctor search keys");
        }
        Ok(stale.len() as u64)
    }

    /// Total number of doctors.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doctors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fills in the value that broke a unique index.
fn with_conflicting_value(err: sqlx::Error, doctor: &NewDoctor) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => {
            let value = match field.as_str() {
                "national_id" => doctor.person.national_id.clone(),
                "license_number" => doctor.license_number.clone(),
                _ => "unknown".to_string(),
            };
            DbError::UniqueViolation { field, value }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use clinica_core::Person;

    fn new_doctor(first: &str, last: &str, national_id: &str, license: &str, specialty: &str) -> NewDoctor {
        NewDoctor {
            person: Person {
                first_name: first.to_string(),
                last_name: last.to_string(),
                national_id: national_id.to_string(),
                email: None,
            },
            specialty: specialty.to_string(),
            license_number: license.to_string(),
        }
    }

    async fn setup() -> DoctorRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.doctors()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup().await;

        let stored = repo
            .insert(&new_doctor("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();
        assert!(stored.id > 0);
        assert_eq!(stored.created_at, stored.updated_at);

        let by_id = repo.get_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(by_id, stored);

        let by_license = repo.get_by_license("LIC-1").await.unwrap().unwrap();
        assert_eq!(by_license.id, stored.id);

        assert!(repo.get_by_license("LIC-404").await.unwrap().is_none());
        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicates_rejected() {
        let repo = setup().await;
        repo.insert(&new_doctor("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();

        let err = repo
            .insert(&new_doctor("James", "Wilson", "N-1", "LIC-2", "Oncology"))
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "national_id");
                assert_eq!(value, "N-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = repo
            .insert(&new_doctor("James", "Wilson", "N-2", "LIC-1", "Oncology"))
            .await
            .unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "license_number");
                assert_eq!(value, "LIC-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let repo = setup().await;
        let house = repo
            .insert(&new_doctor("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();
        let wilson = repo
            .insert(&new_doctor("James", "Wilson", "N-2", "LIC-2", "Oncology"))
            .await
            .unwrap();

        let updated = repo
            .update(house.id, &new_doctor("Greg", "House", "N-1", "LIC-1", "Nephrology"))
            .await
            .unwrap();
        assert_eq!(updated.person.first_name, "Greg");
        assert_eq!(updated.specialty, "Nephrology");
        assert_eq!(updated.created_at, house.created_at);

        // Keeping its own unique values is fine; taking another doctor's is not
        let err = repo
            .update(wilson.id, &new_doctor("James", "Wilson", "N-2", "LIC-1", "Oncology"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let err = repo
            .update(9999, &new_doctor("No", "One", "N-9", "LIC-9", "None"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let house = repo
            .insert(&new_doctor("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();

        let deleted = repo.delete(house.id).await.unwrap();
        assert_eq!(deleted.id, house.id);
        assert!(repo.get_by_id(house.id).await.unwrap().is_none());

        let err = repo.delete(house.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search() {
        let repo = setup().await;
        repo.insert(&new_doctor("Lisa", "Cuddy", "N-1", "LIC-1", "Endocrinology"))
            .await
            .unwrap();
        repo.insert(&new_doctor("Allison", "Cameron", "N-2", "LIC-2", "Immunology"))
            .await
            .unwrap();
        repo.insert(&new_doctor("Robert", "Chase", "N-3", "LIC-3", "Intensive_Care"))
            .await
            .unwrap();

        let found = repo.search_by_name("CA", Page::search()).await.unwrap();
        let names: Vec<_> = found.iter().map(|d| d.person.full_name()).collect();
        assert_eq!(names, vec!["Allison Cameron"]);

        // Matches across the first/last name boundary
        let found = repo.search_by_name("n cam", Page::search()).await.unwrap();
        assert_eq!(found.len(), 1);

        let found = repo.search_by_specialty("OLOGY", Page::search()).await.unwrap();
        let firsts: Vec<_> = found.iter().map(|d| d.person.first_name.as_str()).collect();
        assert_eq!(firsts, vec!["Allison", "Lisa"]);

        // '_' is literal, not a single-character wildcard
        let found = repo.search_by_specialty("e_c", Page::search()).await.unwrap();
        assert_eq!(found.len(), 1);
        let found = repo.search_by_specialty("n_o", Page::search()).await.unwrap();
        assert!(found.is_empty());

        let found = repo.search_by_name("zzz", Page::search()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_list_pages() {
        let repo = setup().await;
        for i in 0..5 {
            repo.insert(&new_doctor(
                &format!("Doc{i}"),
                "Test",
                &format!("N-{i}"),
                &format!("LIC-{i}"),
                "General",
            ))
            .await
            .unwrap();
        }

        let first = repo.list(Page::new(2, 0).unwrap()).await.unwrap();
        let firsts: Vec<_> = first.iter().map(|d| d.person.first_name.as_str()).collect();
        assert_eq!(firsts, vec!["Doc0", "Doc1"]);

        let last = repo.list(Page::new(2, 4).unwrap()).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].person.first_name, "Doc4");

        let past_end = repo.list(Page::new(2, 10).unwrap()).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_accented_letters() {
        let repo = setup().await;
        let jose = repo
            .insert(&new_doctor("José", "Álvarez", "N-1", "LIC-1", "Pediatría"))
            .await
            .unwrap();

        let found = repo.search_by_name("álvarez", Page::search()).await.unwrap();
        assert_eq!(found.len(), 1);
        let found = repo.search_by_name("JOSÉ ÁLV", Page::search()).await.unwrap();
        assert_eq!(found.len(), 1);

        let found = repo.search_by_specialty("PEDIATRÍA", Page::search()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].specialty, "Pediatría");

        // Keys follow updates
        repo.update(jose.id, &new_doctor("José", "Ñúñez", "N-1", "LIC-1", "Cardiología"))
            .await
            .unwrap();
        assert!(repo.search_by_name("álvarez", Page::search()).await.unwrap().is_empty());
        assert_eq!(repo.search_by_name("ÑÚÑ", Page::search()).await.unwrap().len(), 1);
        assert_eq!(repo.search_by_specialty("CARDIOLOGÍA", Page::search()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_names_ignoring_case() {
        let repo = setup().await;
        for (i, first) in ["zoe", "ana", "Bruno", "Ángela"].into_iter().enumerate() {
            repo.insert(&new_doctor(
                first,
                "Test",
                &format!("N-{i}"),
                &format!("LIC-{i}"),
                "General",
            ))
            .await
            .unwrap();
        }

        let listed = repo.list(Page::first()).await.unwrap();
        let firsts: Vec<_> = listed.iter().map(|d| d.person.first_name.as_str()).collect();
        // Folded keys compare by code point, so accented initials sort after 'z'
        assert_eq!(firsts, vec!["ana", "Bruno", "zoe", "Ángela"]);
    }

    #[tokio::test]
    async fn test_backfill_search_keys() {
        let repo = setup().await;
        let stored = repo
            .insert(&new_doctor("Íñigo", "Pérez", "N-1", "LIC-1", "Neurología"))
            .await
            .unwrap();

        // Rows written before the key columns existed
        sqlx::query("UPDATE doctors SET first_name_key = '', last_name_key = '', specialty_key = ''")
            .execute(&repo.pool)
            .await
            .unwrap();
        assert!(repo.search_by_name("íñigo", Page::search()).await.unwrap().is_empty());

        assert_eq!(repo.backfill_search_keys().await.unwrap(), 1);
        let found = repo.search_by_name("ÍÑIGO PÉ", Page::search()).await.unwrap();
        assert_eq!(found[0].id, stored.id);
        assert_eq!(repo.backfill_search_keys().await.unwrap(), 0);
    }
}
