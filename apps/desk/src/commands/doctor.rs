//! `clinica doctor ...`

use clinica_core::dto::DoctorDto;

use super::render::{self, Output};
use super::{confirm, page_footer, Context};
use crate::cli::DoctorCommand;
use crate::error::ApiError;

pub async fn run(command: DoctorCommand, ctx: &Context) -> Result<String, ApiError> {
    let svc = &ctx.doctors;

    match command {
        DoctorCommand::Add(args) => {
            let doctor = svc.register(&args.into_dto(None)).await?;
            one(ctx.output, &doctor, "Registered doctor")
        }

        DoctorCommand::Update { id, fields } => {
            let doctor = svc.update(&fields.into_dto(Some(id))).await?;
            one(ctx.output, &doctor, "Updated doctor")
        }

        DoctorCommand::Delete { id, yes } => {
            let existing = svc
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Doctor", &id.to_string()).with_stage("delete doctor"))?;

            confirm(
                &format!(
                    "Delete Dr. {} {} and all of their appointments?",
                    existing.first_name, existing.last_name
                ),
                yes,
            )?;

            let doctor = svc.delete(id).await?;
            one(ctx.output, &doctor, "Deleted doctor")
        }

        DoctorCommand::Show { id } => {
            let doctor = svc
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Doctor", &id.to_string()).with_stage("find doctor"))?;
            one(ctx.output, &doctor, "")
        }

        DoctorCommand::FindLicense { license } => {
            let doctor = svc.find_by_license(&license).await?.ok_or_else(|| {
                ApiError::not_found("Doctor", &license).with_stage("find doctor by license")
            })?;
            one(ctx.output, &doctor, "")
        }

        DoctorCommand::List(args) => {
            let page = ctx.page(&args)?;
            let doctors = svc.list(page.limit(), page.offset()).await?;
            if ctx.output.is_json() {
                return render::json(&doctors);
            }
            let total = svc.count().await?;
            Ok(format!(
                "{}\n{}",
                render::doctors_table(&doctors),
                page_footer(page, doctors.len(), total)
            ))
        }

        DoctorCommand::SearchName { term, window } => {
            let (limit, offset) = ctx.window(&window);
            let doctors = svc.search_by_name(&term, limit, offset).await?;
            many(ctx.output, &doctors)
        }

        DoctorCommand::SearchSpecialty { term, window } => {
            let (limit, offset) = ctx.window(&window);
            let doctors = svc.search_by_specialty(&term, limit, offset).await?;
            many(ctx.output, &doctors)
        }
    }
}

fn one(output: Output, doctor: &DoctorDto, headline: &str) -> Result<String, ApiError> {
    match output {
        Output::Json => render::json(doctor),
        Output::Text if headline.is_empty() => Ok(render::doctor_details(doctor)),
        Output::Text => Ok(format!("{}\n{}", headline, render::doctor_details(doctor))),
    }
}

fn many(output: Output, doctors: &[DoctorDto]) -> Result<String, ApiError> {
    match output {
        Output::Json => render::json(doctors),
        Output::Text => Ok(render::doctors_table(doctors)),
    }
}
