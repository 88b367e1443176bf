//! # Appointment Service
//!
//! Booking and listing visits between a doctor and a patient.

use clinica_core::dto::AppointmentDto;
use clinica_core::validation::{validate_appointment, validate_id};
use clinica_core::Page;
use clinica_db::Database;
use tracing::info;

use super::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct AppointmentService {
    db: Database,
}

impl AppointmentService {
    pub fn new(db: Database) -> Self {
        AppointmentService { db }
    }

    /// Books a visit. Both the doctor and the patient must exist.
    pub async fn schedule(&self, dto: &AppointmentDto) -> ServiceResult<AppointmentDto> {
        const STAGE: &str = "schedule appointment";

        let appointment = validate_appointment(dto).map_err(ServiceError::at(STAGE))?;
        let stored = self
            .db
            .appointments()
            .schedule(&appointment)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(
            id = stored.id,
            doctor_id = stored.doctor_id,
            patient_id = stored.patient_id,
            "Appointment scheduled"
        );
        Ok(stored.into())
    }

    pub async fn cancel(&self, id: i64) -> ServiceResult<AppointmentDto> {
        const STAGE: &str = "cancel appointment";

        validate_id("id", id).map_err(ServiceError::at(STAGE))?;
        let cancelled = self
            .db
            .appointments()
            .cancel(id)
            .await
            .map_err(ServiceError::at(STAGE))?;

        info!(id = id, "Appointment cancelled");
        Ok(cancelled.into())
    }

    /// A doctor's visits, earliest first. Unknown doctors are NotFound.
    pub async fn for_doctor(
        &self,
        doctor_id: i64,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<AppointmentDto>> {
        const STAGE: &str = "list doctor appointments";

        validate_id("doctor_id", doctor_id).map_err(ServiceError::at(STAGE))?;
        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;

        let doctor = self
            .db
            .doctors()
            .get_by_id(doctor_id)
            .await
            .map_err(ServiceError::at(STAGE))?;
        if doctor.is_none() {
            return Err(ServiceError::not_found(STAGE, "Doctor", doctor_id));
        }

        let appointments = self
            .db
            .appointments()
            .list_for_doctor(doctor_id, page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(appointments.into_iter().map(AppointmentDto::from).collect())
    }

    /// A patient's visits, earliest first. Unknown patients are NotFound.
    pub async fn for_patient(
        &self,
        patient_id: i64,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<AppointmentDto>> {
        const STAGE: &str = "list patient appointments";

        validate_id("patient_id", patient_id).map_err(ServiceError::at(STAGE))?;
        let page = Page::new(limit, offset).map_err(ServiceError::at(STAGE))?;

        let patient = self
            .db
            .patients()
            .get_by_id(patient_id)
            .await
            .map_err(ServiceError::at(STAGE))?;
        if patient.is_none() {
            return Err(ServiceError::not_found(STAGE, "Patient", patient_id));
        }

        let appointments = self
            .db
            .appointments()
            .list_for_patient(patient_id, page)
            .await
            .map_err(ServiceError::at(STAGE))?;

        Ok(appointments.into_iter().map(AppointmentDto::from).collect())
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        self.db
            .appointments()
            .count()
            .await
            .map_err(ServiceError::at("count appointments"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{DoctorService, PatientService};
    use chrono::{NaiveDate, TimeZone, Utc};
    use clinica_core::dto::{DoctorDto, PatientDto};
    use clinica_db::DbConfig;

    /// Returns (service, doctor id, patient id).
    async fn setup() -> (AppointmentService, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let doctor = DoctorService::new(db.clone())
            .register(&DoctorDto {
                first_name: "Meredith".to_string(),
                last_name: "Grey".to_string(),
                national_id: "D-1".to_string(),
                specialty: "General Surgery".to_string(),
                license_number: "LIC-1".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let patient = PatientService::new(db.clone())
            .register(&PatientDto {
                first_name: "Denny".to_string(),
                last_name: "Duquette".to_string(),
                national_id: "P-1".to_string(),
                birth_date: NaiveDate::from_ymd_opt(1970, 2, 2),
                ..Default::default()
            })
            .await
            .unwrap();

        (
            AppointmentService::new(db),
            doctor.id.unwrap(),
            patient.id.unwrap(),
        )
    }

    fn booking(doctor_id: i64, patient_id: i64, day: u32) -> AppointmentDto {
        AppointmentDto {
            id: None,
            doctor_id,
            patient_id,
            scheduled_at: Utc.with_ymd_and_hms(2026, 5, day, 10, 30, 0).single(),
            reason: Some("  Follow-up  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_schedule_and_cancel() {
        let (svc, doctor_id, patient_id) = setup().await;

        let booked = svc.schedule(&booking(doctor_id, patient_id, 4)).await.unwrap();
        assert_eq!(booked.reason.as_deref(), Some("Follow-up"));

        let listed = svc.for_patient(patient_id, 20, 0).await.unwrap();
        assert_eq!(listed, vec![booked.clone()]);

        let cancelled = svc.cancel(booked.id.unwrap()).await.unwrap();
        assert_eq!(cancelled, booked);
        assert!(svc.for_doctor(doctor_id, 20, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_rejects_bad_input() {
        let (svc, doctor_id, patient_id) = setup().await;

        let mut no_time = booking(doctor_id, patient_id, 4);
        no_time.scheduled_at = None;
        assert!(svc.schedule(&no_time).await.unwrap_err().is_validation());

        let err = svc.schedule(&booking(doctor_id + 100, patient_id, 4)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.stage, "schedule appointment");

        assert!(svc.for_doctor(doctor_id + 100, 20, 0).await.unwrap_err().is_not_found());
        assert!(svc.cancel(999).await.unwrap_err().is_not_found());
        assert_eq!(svc.count().await.unwrap(), 0);
    }
}
