//! `clinica appointment ...`

use clinica_core::dto::AppointmentDto;

use super::render::{self, Output};
use super::Context;
use crate::cli::AppointmentCommand;
use crate::error::ApiError;

pub async fn run(command: AppointmentCommand, ctx: &Context) -> Result<String, ApiError> {
    let svc = &ctx.appointments;

    let (appointments, heading) = match command {
        AppointmentCommand::Schedule(args) => {
            let booked = svc.schedule(&args.into_dto()).await?;
            return match ctx.output {
                Output::Json => render::json(&booked),
                Output::Text => Ok(format!(
                    "Scheduled appointment\n{}",
                    render::appointment_details(&booked)
                )),
            };
        }

        AppointmentCommand::Cancel { id } => {
            let cancelled = svc.cancel(id).await?;
            return match ctx.output {
                Output::Json => render::json(&cancelled),
                Output::Text => Ok(format!(
                    "Cancelled appointment\n{}",
                    render::appointment_details(&cancelled)
                )),
            };
        }

        AppointmentCommand::Doctor { doctor_id, paging } => {
            let page = ctx.page(&paging)?;
            let found = svc.for_doctor(doctor_id, page.limit(), page.offset()).await?;
            (found, format!("Doctor {} · page {}", doctor_id, page.index() + 1))
        }

        AppointmentCommand::Patient { patient_id, paging } => {
            let page = ctx.page(&paging)?;
            let found = svc.for_patient(patient_id, page.limit(), page.offset()).await?;
            (found, format!("Patient {} · page {}", patient_id, page.index() + 1))
        }
    };

    listing(ctx.output, &appointments, &heading)
}

fn listing(output: Output, appointments: &[AppointmentDto], heading: &str) -> Result<String, ApiError> {
    match output {
        Output::Json => render::json(appointments),
        Output::Text => Ok(format!("{}\n{}", heading, render::appointments_table(appointments))),
    }
}
