//! `clinica patient ...`

use clinica_core::dto::PatientDto;

use super::render::{self, Output};
use super::{confirm, page_footer, Context};
use crate::cli::PatientCommand;
use crate::error::ApiError;

pub async fn run(command: PatientCommand, ctx: &Context) -> Result<String, ApiError> {
    let svc = &ctx.patients;

    match command {
        PatientCommand::Add(args) => {
            let patient = svc.register(&args.into_dto(None)).await?;
            one(ctx.output, &patient, "Registered patient")
        }

        PatientCommand::Update { id, fields } => {
            let patient = svc.update(&fields.into_dto(Some(id))).await?;
            one(ctx.output, &patient, "Updated patient")
        }

        PatientCommand::Delete { id, yes } => {
            let existing = svc.find_by_id(id).await?.ok_or_else(|| {
                ApiError::not_found("Patient", &id.to_string()).with_stage("delete patient")
            })?;

            confirm(
                &format!(
                    "Delete patient {} {} and all of their appointments?",
                    existing.first_name, existing.last_name
                ),
                yes,
            )?;

            let patient = svc.delete(id).await?;
            one(ctx.output, &patient, "Deleted patient")
        }

        PatientCommand::Show { id } => {
            let patient = svc.find_by_id(id).await?.ok_or_else(|| {
                ApiError::not_found("Patient", &id.to_string()).with_stage("find patient")
            })?;
            one(ctx.output, &patient, "")
        }

        PatientCommand::FindNationalId { national_id } => {
            let patient = svc.find_by_national_id(&national_id).await?.ok_or_else(|| {
                ApiError::not_found("Patient", &national_id).with_stage("find patient by national ID")
            })?;
            one(ctx.output, &patient, "")
        }

        PatientCommand::List(args) => {
            let page = ctx.page(&args)?;
            let patients = svc.list(page.limit(), page.offset()).await?;
            if ctx.output.is_json() {
                return render::json(&patients);
            }
            let total = svc.count().await?;
            Ok(format!(
                "{}\n{}",
                render::patients_table(&patients),
                page_footer(page, patients.len(), total)
            ))
        }

        PatientCommand::SearchName { term, window } => {
            let (limit, offset) = ctx.window(&window);
            let patients = svc.search_by_name(&term, limit, offset).await?;
            many(ctx.output, &patients)
        }

        PatientCommand::SearchInsurance { term, window } => {
            let (limit, offset) = ctx.window(&window);
            let patients = svc.search_by_insurance(&term, limit, offset).await?;
            many(ctx.output, &patients)
        }
    }
}

fn one(output: Output, patient: &PatientDto, headline: &str) -> Result<String, ApiError> {
    match output {
        Output::Json => render::json(patient),
        Output::Text if headline.is_empty() => Ok(render::patient_details(patient)),
        Output::Text => Ok(format!("{}\n{}", headline, render::patient_details(patient))),
    }
}

fn many(output: Output, patients: &[PatientDto]) -> Result<String, ApiError> {
    match output {
        Output::Json => render::json(patients),
        Output::Text => Ok(render::patients_table(patients)),
    }
}
