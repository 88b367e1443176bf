//! # Appointment Repository
//!
//! Links doctors and patients.
//!
//! ## Scheduling Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    ├── doctor exists?   ── no ──► ROLLBACK, NotFound(Doctor)            │
//! │    ├── patient exists?  ── no ──► ROLLBACK, NotFound(Patient)           │
//! │    └── INSERT appointment ... RETURNING                                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting a doctor or patient cascades to its appointments
//! (`ON DELETE CASCADE`).

use chrono::{SubsecRound, Utc};
use clinica_core::{Appointment, NewAppointment, Page};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

const SELECT_APPOINTMENT: &str = r#"
    SELECT id, doctor_id, patient_id, scheduled_at, reason, created_at
    FROM appointments
"#;

/// Repository for appointment database operations.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    /// Creates a new AppointmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AppointmentRepository { pool }
    }

    /// Books an appointment after checking both sides exist.
    ///
    /// ## Errors
    /// * `NotFound` - doctor or patient id doesn't exist
    pub async fn schedule(&self, appointment: &NewAppointment) -> DbResult<Appointment> {
        debug!(
            doctor_id = appointment.doctor_id,
            patient_id = appointment.patient_id,
            scheduled_at = %appointment.scheduled_at,
            "Scheduling appointment"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let doctor: Option<i64> = sqlx::query_scalar("SELECT id FROM doctors WHERE id = ?1")
            .bind(appointment.doctor_id)
            .fetch_optional(&mut *tx)
            .await?;
        if doctor.is_none() {
            return Err(DbError::not_found("Doctor", appointment.doctor_id));
        }

        let patient: Option<i64> = sqlx::query_scalar("SELECT id FROM patients WHERE id = ?1")
            .bind(appointment.patient_id)
            .fetch_optional(&mut *tx)
            .await?;
        if patient.is_none() {
            return Err(DbError::not_found("Patient", appointment.patient_id));
        }

        // Whole seconds keep the stored text sortable
        let scheduled_at = appointment.scheduled_at.trunc_subsecs(0);

        let stored = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (doctor_id, patient_id, scheduled_at, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, doctor_id, patient_id, scheduled_at, reason, created_at
            "#,
        )
        .bind(appointment.doctor_id)
        .bind(appointment.patient_id)
        .bind(scheduled_at)
        .bind(&appointment.reason)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = stored.id, "Appointment scheduled");
        Ok(stored)
    }

    /// Cancels (deletes) appointment `id` and returns it.
    pub async fn cancel(&self, id: i64) -> DbResult<Appointment> {
        debug!(id = id, "Cancelling appointment");

        let cancelled = sqlx::query_as::<_, Appointment>(
            r#"
            DELETE FROM appointments WHERE id = ?1
            RETURNING id, doctor_id, patient_id, scheduled_at, reason, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        cancelled.ok_or_else(|| DbError::not_found("Appointment", id))
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Appointment>> {
        let sql = format!("{SELECT_APPOINTMENT} WHERE id = ?1");
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(appointment)
    }

    /// A doctor's appointments, earliest first.
    pub async fn list_for_doctor(&self, doctor_id: i64, page: Page) -> DbResult<Vec<Appointment>> {
        let sql = format!(
            "{SELECT_APPOINTMENT} WHERE doctor_id = ?1 \
             ORDER BY scheduled_at ASC, id ASC LIMIT ?2 OFFSET ?3"
        );
        let appointments = sqlx::query_as::<_, Appointment>(&sql)
            .bind(doctor_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        debug!(doctor_id = doctor_id, count = appointments.len(), "Listed doctor appointments");
        Ok(appointments)
    }

    /// A patient's appointments, earliest first.
    pub async fn list_for_patient(&self, patient_id: i64, page: Page) -> DbResult<Vec<Appointment>> {
        let sql = format!(
            "{SELECT_APPOINTMENT} WHERE patient_id = ?1 \
             ORDER BY scheduled_at ASC, id ASC LIMIT ?2 OFFSET ?3"
        );
        let appointments = sqlx::query_as::<_, Appointment>(&sql)
            .bind(patient_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        debug!(patient_id = patient_id, count = appointments.len(), "Listed patient appointments");
        Ok(appointments)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appointments")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
