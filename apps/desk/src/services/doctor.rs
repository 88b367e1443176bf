//! # Doctor Service
//!
//! Validate → repository → DTO, for doctors.
//!
//! ```text
//! DoctorDto ──► validate_doctor ──► NewDoctor ──► DoctorRepository ──► Doctor ──► DoctorDto
//! ```

use clinica_core::dto::DoctorDto;
use clinica_core::validation::{validate_doctor, validate_id, validate_search_term};
use clinica_core::{Page, ValidationError};
use clinica_db::Database;
use tracing::info;

use super::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct DoctorService {
    db: Database,
}

impl DoctorService {
    pub fn new(db: Database) -> Self {
        DoctorService { db }
    }

    /// Registers a new doctor. Any id on `dto` is ignored.
    ///
    /// ## Errors
    /// * `Validation` - missing/oversized field or malformed email
    /// * `Duplicate` - national ID or license number already registered
    pub async fn register(&self, dto: &DoctorDto) -> ServiceResult<DoctorDto> {
        const STAGE: &str = "register doctor";

        let doctor = validate_doctor(dto).map_err(ServiceError::at(STAGE))?;
        let stored = self
            .db
            .doctors()
            .insert(&doctor)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = stored.id, license = %stored.license_number, "Doctor registered");
        Ok(stored.into())
    }

    /// Replaces every field of the doctor identified by `dto.id`.
    ///
    /// ## Errors
    /// * `Validation` - `dto.id` missing or not positive, or a bad field
    /// * `NotFound` - no doctor with that id
    /// * `Duplicate` - unique value taken by another doctor
    pub async fn update(&self, dto: &DoctorDto) -> ServiceResult<DoctorDto> {
        const STAGE: &str = "update doctor";

        let id = dto
            .id
            .ok_or_else(|| ValidationError::Required {
                field: "id".to_string(),
            })
            .and_then(|id| validate_id("id", id).map(|_| id))
            .map_err(ServiceError::at(STAGE))?;
        let doctor = validate_doctor(dto).map_err(ServiceError::at(STAGE))?;

        let updated = self
            .db
            .doctors()
            .update(id, &doctor)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = id, "Doctor updated");
        Ok(updated.into())
    }

    /// Deletes doctor `id` and returns what was removed.
    pub async fn delete(&self, id: i64) -> ServiceResult<DoctorDto> {
        const STAGE: &str = "delete doctor";

        validate_id("id", id).map_err(ServiceError::at(STAGE))?;
        let deleted = self
            .db
            .doctors()
            .delete(id)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = id, "Doctor deleted");
        Ok(deleted.into())
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<DoctorDto>> {
        const STAGE: &str = "find doctor";

        validate_id("id", id).map_err(ServiceError::at(STAGE))?;
        let doctor = self
            .db
            .doctors()
            .get_by_id(id)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(doctor.map(DoctorDto::from))
    }

    /// Exact license lookup. A blank license finds nothing.
    pub async fn find_by_license(&self, license_number: &str) -> ServiceResult<Option<DoctorDto>> {
        const STAGE: &str = "find doctor by license";

        let license_number = license_number.trim();
        if license_number.is_empty() {
            return Ok(None);
        }

        let doctor = self
            .db
            .doctors()
            .get_by_license(license_number)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(doctor.map(DoctorDto::from))
    }

    pub async fn search_by_name(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<DoctorDto>> {
        const STAGE: &str = "search doctors by name";

        let term = validate_search_term("name", term).map_err(ServiceError::at(STAGE))?;
        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;
        let doctors = self
            .db
            .doctors()
            .search_by_name(&term, page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(doctors.into_iter().map(DoctorDto::from).collect())
    }

    pub async fn search_by_specialty(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<DoctorDto>> {
        const STAGE: &str = "search doctors by specialty";

        let term = validate_search_term("specialty", term).map_err(ServiceError::at(STAGE))?;
        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;
        let doctors = self
            .db
            .doctors()
            .search_by_specialty(&term, page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(doctors.into_iter().map(DoctorDto::from).collect())
    }

    /// One page of doctors ordered by name.
    pub async fn list(&self, limit: i64, offset: i64) -> ServiceResult<Vec<DoctorDto>> {
        const STAGE: &str = "list doctors";

        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;
        let doctors = self
            .db
            .doctors()
            .list(page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(doctors.into_iter().map(DoctorDto::from).collect())
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        self.db
            .doctors()
            .count()
            .await
            .map_err(ServiceError::at("count doctors"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ServiceErrorKind;
    use clinica_db::DbConfig;

    fn dto(first: &str, last: &str, national_id: &str, license: &str, specialty: &str) -> DoctorDto {
        DoctorDto {
            id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            national_id: national_id.to_string(),
            email: Some(format!("{}@clinic.org", first.to_lowercase())),
            specialty: specialty.to_string(),
            license_number: license.to_string(),
        }
    }

    async fn service() -> DoctorService {
        DoctorService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_register_round_trip() {
        let svc = service().await;
        let input = dto("Gregory", "House", "N-1", "LIC-1", "Diagnostics");

        let registered = svc.register(&input).await.unwrap();
        let id = registered.id.unwrap();

        let found = svc.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found, DoctorDto { id: Some(id), ..input });
    }

    #[tokio::test]
    async fn test_register_trims_and_validates() {
        let svc = service().await;

        let registered = svc
            .register(&dto("  Lisa ", "Cuddy", " N-2 ", "LIC-2", "Endocrinology"))
            .await
            .unwrap();
        assert_eq!(registered.first_name, "Lisa");
        assert_eq!(registered.national_id, "N-2");

        let mut bad_email = dto("James", "Wilson", "N-3", "LIC-3", "Oncology");
        bad_email.email = Some("not-an-email".to_string());
        let err = svc.register(&bad_email).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.stage, "register doctor");

        let err = svc
            .register(&dto("James", "Wilson", "N-3", "LIC-3", "   "))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_license() {
        let svc = service().await;
        svc.register(&dto("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();

        let err = svc
            .register(&dto("James", "Wilson", "N-2", "LIC-1", "Oncology"))
            .await
            .unwrap_err();
        match err.kind {
            ServiceErrorKind::Duplicate { field, value } => {
                assert_eq!(field, "license_number");
                assert_eq!(value, "LIC-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update() {
        let svc = service().await;
        let registered = svc
            .register(&dto("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();

        let mut changed = registered.clone();
        changed.specialty = "Nephrology".to_string();
        changed.email = None;
        let updated = svc.update(&changed).await.unwrap();
        assert_eq!(updated, changed);

        // No id
        let err = svc
            .update(&dto("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // Unknown id
        let mut missing = changed.clone();
        missing.id = Some(4242);
        let err = svc.update(&missing).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.stage, "update doctor");
    }

    #[tokio::test]
    async fn test_delete() {
        let svc = service().await;
        let registered = svc
            .register(&dto("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();
        let id = registered.id.unwrap();

        let deleted = svc.delete(id).await.unwrap();
        assert_eq!(deleted, registered);
        assert!(svc.find_by_id(id).await.unwrap().is_none());

        assert!(svc.delete(id).await.unwrap_err().is_not_found());
        assert!(svc.delete(0).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_find_by_license() {
        let svc = service().await;
        svc.register(&dto("Gregory", "House", "N-1", "LIC-1", "Diagnostics"))
            .await
            .unwrap();

        assert!(svc.find_by_license("LIC-1").await.unwrap().is_some());
        assert!(svc.find_by_license(" LIC-1 ").await.unwrap().is_some());
        assert!(svc.find_by_license("LIC-2").await.unwrap().is_none());
        assert!(svc.find_by_license("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_and_paging_bounds() {
        let svc = service().await;
        svc.register(&dto("Robert", "Chase", "N-1", "LIC-1", "Intensive Care"))
            .await
            .unwrap();
        svc.register(&dto("Allison", "Cameron", "N-2", "LIC-2", "Immunology"))
            .await
            .unwrap();
        svc.register(&dto("Eric", "Foreman", "N-3", "LIC-3", "Neurology"))
            .await
            .unwrap();

        let found = svc.search_by_specialty("OLOGY", 50, 0).await.unwrap();
        let firsts: Vec<_> = found.iter().map(|d| d.first_name.as_str()).collect();
        assert_eq!(firsts, vec!["Allison", "Eric"]);

        let found = svc.search_by_name("cha", 50, 0).await.unwrap();
        assert_eq!(found.len(), 1);

        assert!(svc.search_by_name("", 50, 0).await.unwrap_err().is_validation());
        assert!(svc.list(0, 0).await.unwrap_err().is_validation());
        assert!(svc.list(1001, 0).await.unwrap_err().is_validation());
        assert!(svc.list(10, -1).await.unwrap_err().is_validation());

        let page = svc.list(2, 0).await.unwrap();
        let firsts: Vec<_> = page.iter().map(|d| d.first_name.as_str()).collect();
        assert_eq!(firsts, vec!["Allison", "Eric"]);
        assert_eq!(svc.list(2, 2).await.unwrap().len(), 1);
    }
}
