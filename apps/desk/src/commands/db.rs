//! `clinica db status`

use serde::Serialize;

use super::render::{self, Output};
use super::Context;
use crate::cli::DbCommand;
use crate::error::ApiError;
use crate::services::ServiceError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbStatus {
    pub path: String,
    pub healthy: bool,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub doctors: i64,
    pub patients: i64,
    pub appointments: i64,
}

pub async fn run(command: DbCommand, ctx: &Context) -> Result<String, ApiError> {
    match command {
        DbCommand::Status => {
            let status = status(ctx).await?;
            match ctx.output {
                Output::Json => render::json(&status),
                Output::Text => Ok(render::details(&[
                    ("Database", status.path.clone()),
                    ("Healthy", if status.healthy { "yes" } else { "no" }.to_string()),
                    (
                        "Migrations",
                        format!("{}/{} applied", status.migrations_applied, status.migrations_total),
                    ),
                    ("Doctors", status.doctors.to_string()),
                    ("Patients", status.patients.to_string()),
                    ("Appointments", status.appointments.to_string()),
                ])),
            }
        }
    }
}

pub async fn status(ctx: &Context) -> Result<DbStatus, ApiError> {
    let (total, applied) = ctx
        .db
        .migration_status()
        .await
        .map_err(ServiceError::at("database status"))?;

    Ok(DbStatus {
        path: ctx.db_path.display().to_string(),
        healthy: ctx.db.health_check().await,
        migrations_total: total,
        migrations_applied: applied,
        doctors: ctx.doctors.count().await?,
        patients: ctx.patients.count().await?,
        appointments: ctx.appointments.count().await?,
    })
}
