//! # Patient Service
//!
//! Same flow as the doctor service; patients are keyed by national ID.

use clinica_core::dto::PatientDto;
use clinica_core::validation::{validate_id, validate_patient, validate_search_term};
use clinica_core::{Page, ValidationError};
use clinica_db::Database;
use tracing::info;

use super::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct PatientService {
    db: Database,
}

impl PatientService {
    pub fn new(db: Database) -> Self {
        PatientService { db }
    }

    /// Registers a new patient. Any id on `dto` is ignored.
    pub async fn register(&self, dto: &PatientDto) -> ServiceResult<PatientDto> {
        const STAGE: &str = "register patient";

        let patient = validate_patient(dto).map_err(ServiceError::at(STAGE))?;
        let stored = self
            .db
            .patients()
            .insert(&patient)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = stored.id, "Patient registered");
        Ok(stored.into())
    }

    /// Replaces every field of the patient identified by `dto.id`.
    pub async fn update(&self, dto: &PatientDto) -> ServiceResult<PatientDto> {
        const STAGE: &str = "update patient";

        let id = dto
            .id
            .ok_or_else(|| ValidationError::Required {
                field: "id".to_string(),
            })
            .and_then(|id| validate_id("id", id).map(|_| id))
            .map_err(ServiceError::at(STAGE))?;
        let patient = validate_patient(dto).map_err(ServiceError::at(STAGE))?;

        let updated = self
            .db
            .patients()
            .update(id, &patient)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = id, "Patient updated");
        Ok(updated.into())
    }

    /// Deletes patient `id`, with their appointments, and returns the record.
    pub async fn delete(&self, id: i64) -> ServiceResult<PatientDto> {
        const STAGE: &str = "delete patient";

        validate_id("id", id).map_err(ServiceError::at(STAGE))?;
        let deleted = self
            .db
            .patients()
            .delete(id)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = id, "Patient deleted");
        Ok(deleted.into())
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<PatientDto>> {
        const STAGE: &str = "find patient";

        validate_id("id", id).map_err(ServiceError::at(STAGE))?;
        let patient = self
            .db
            .patients()
            .get_by_id(id)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(patient.map(PatientDto::from))
    }

    /// Exact national ID lookup. A blank ID finds nothing.
    pub async fn find_by_national_id(&self, national_id: &str) -> ServiceResult<Option<PatientDto>> {
        let national_id = national_id.trim();
        if national_id.is_empty() {
            return Ok(None);
        }

        let patient = self
            .db
            .patients()
            .get_by_national_id(national_id)
            .await
            .map_err(ServiceError::at("find patient by national id"))?;

        Ok(patient.map(PatientDto::from))
    }

    pub async fn search_by_name(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<PatientDto>> {
        const STAGE: &str = "search patients by name";

        let term = validate_search_term("name", term).map_err(ServiceError::at(STAGE))?;
        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;
        let patients = self
            .db
            .patients()
            .search_by_name(&term, page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(patients.into_iter().map(PatientDto::from).collect())
    }

    pub async fn search_by_insurance(
        &self,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<PatientDto>> {
        const STAGE: &str = "search patients by insurance";

        let term = validate_search_term("insurance_name", term).map_err(ServiceError::at(STAGE))?;
        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;
        let patients = self
            .db
            .patients()
            .search_by_insurance(&term, page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(patients.into_iter().map(PatientDto::from).collect())
    }

    pub async fn list(&self, limit: i64, offset: i64) -> ServiceResult<Vec<PatientDto>> {
        const STAGE: &str = "list patients";

        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;
        let patients = self
            .db
            .patients()
            .list(page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(patients.into_iter().map(PatientDto::from).collect())
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        self.db
            .patients()
            .count()
            .await
            .map_err(ServiceError::at("count patients"))
    }
}
