//! Text tables and JSON for command output.

use clinica_core::dto::{AppointmentDto, DoctorDto, PatientDto};
use console::measure_text_width;
use serde::Serialize;

use crate::error::ApiError;

/// Output mode picked by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    pub fn new(json: bool) -> Self {
        if json {
            Output::Json
        } else {
            Output::Text
        }
    }

    pub fn is_json(&self) -> bool {
        *self == Output::Json
    }
}

/// Pretty JSON for any serializable result.
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode JSON: {}", e)))
}

/// Left-aligned columns separated by two spaces, with a dashed rule
/// under the header.
///
/// Widths are terminal columns, so combining marks take no space and
/// wide characters take two.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let line = |cells: &mut dyn Iterator<Item = &str>| -> String {
        let padded: Vec<String> = cells.zip(&widths).map(|(cell, width)| pad(cell, *width)).collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(&mut headers.iter().copied()));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(&mut row.iter().map(String::as_str)));
    }
    out.join("\n")
}

/// `text` followed by spaces up to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(measure_text_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn id_cell(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn opt_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

pub fn doctors_table(doctors: &[DoctorDto]) -> String {
    let rows: Vec<Vec<String>> = doctors
        .iter()
        .map(|d| {
            vec![
                id_cell(d.id),
                format!("{} {}", d.first_name, d.last_name),
                d.national_id.clone(),
                d.specialty.clone(),
                d.license_number.clone(),
                opt_cell(&d.email),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "NATIONAL ID", "SPECIALTY", "LICENSE", "EMAIL"],
        &rows,
    )
}

pub fn patients_table(patients: &[PatientDto]) -> String {
    let rows: Vec<Vec<String>> = patients
        .iter()
        .map(|p| {
            vec![
                id_cell(p.id),
                format!("{} {}", p.first_name, p.last_name),
                p.national_id.clone(),
                p.birth_date.map(|d| d.to_string()).unwrap_or_default(),
                opt_cell(&p.blood_type),
                opt_cell(&p.insurance_name),
                opt_cell(&p.email),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "NATIONAL ID", "BORN", "BLOOD", "INSURANCE", "EMAIL"],
        &rows,
    )
}

pub fn appointments_table(appointments: &[AppointmentDto]) -> String {
    let rows: Vec<Vec<String>> = appointments
        .iter()
        .map(|a| {
            vec![
                id_cell(a.id),
                a.scheduled_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                a.doctor_id.to_string(),
                a.patient_id.to_string(),
                opt_cell(&a.reason),
            ]
        })
        .collect();
    table(&["ID", "WHEN (UTC)", "DOCTOR", "PATIENT", "REASON"], &rows)
}

/// `key: value` lines for a single record.
pub fn details(fields: &[(&str, String)]) -> String {
    let width = fields
        .iter()
        .map(|(k, _)| measure_text_width(k))
        .max()
        .unwrap_or(0);
    fields
        .iter()
        .map(|(k, v)| format!("{}  {}", pad(&format!("{}:", k), width + 1), v))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn doctor_details(d: &DoctorDto) -> String {
    details(&[
        ("ID", id_cell(d.id)),
        ("Name", format!("{} {}", d.first_name, d.last_name)),
        ("National ID", d.national_id.clone()),
        ("Email", opt_cell(&d.email)),
        ("Specialty", d.specialty.clone()),
        ("License", d.license_number.clone()),
    ])
}

pub fn patient_details(p: &PatientDto) -> String {
    details(&[
        ("ID", id_cell(p.id)),
        ("Name", format!("{} {}", p.first_name, p.last_name)),
        ("National ID", p.national_id.clone()),
        ("Email", opt_cell(&p.email)),
        ("Born", p.birth_date.map(|d| d.to_string()).unwrap_or_default()),
        ("Blood type", opt_cell(&p.blood_type)),
        ("Insurance", opt_cell(&p.insurance_name)),
    ])
}

pub fn appointment_details(a: &AppointmentDto) -> String {
    details(&[
        ("ID", id_cell(a.id)),
        (
            "When (UTC)",
            a.scheduled_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ),
        ("Doctor", a.doctor_id.to_string()),
        ("Patient", a.patient_id.to_string()),
        ("Reason", opt_cell(&a.reason)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let out = table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "Ana Lopez".to_string()],
                vec!["12".to_string(), "Bo".to_string()],
            ],
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  ---------");
        assert_eq!(lines[2], "1   Ana Lopez");
        assert_eq!(lines[3], "12  Bo");
    }

    #[test]
    fn test_table_alignment_with_combining_marks() {
        // "José" spelled with a combining acute accent: five chars, four columns
        let decomposed = "Jose\u{301}".to_string();
        let out = table(
            &["NAME", "ID"],
            &[
                vec![decomposed.clone(), "1".to_string()],
                vec!["Ana".to_string(), "2".to_string()],
                vec!["李娜".to_string(), "3".to_string()],
            ],
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "NAME  ID");
        assert_eq!(lines[1], "----  --");
        assert_eq!(lines[2], format!("{}  1", decomposed));
        assert_eq!(lines[3], "Ana   2");
        assert_eq!(lines[4], "李娜  3");
    }

    #[test]
    fn test_empty_table_has_header() {
        let out = doctors_table(&[]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("ID  NAME"));
    }

    #[test]
    fn test_details() {
        let dto = DoctorDto {
            id: Some(3),
            first_name: "Lisa".to_string(),
            last_name: "Cuddy".to_string(),
            national_id: "N-3".to_string(),
            specialty: "Endocrinology".to_string(),
            license_number: "LIC-3".to_string(),
            email: None,
        };
        let out = doctor_details(&dto);
        assert!(out.contains("Name:         Lisa Cuddy"));
        assert!(out.contains("Email:        -"));
    }
}
