//! # Seed Data Generator
//!
//! Populates the database with sample doctors, patients and appointments
//! for development.
//!
//! ## Usage
//! ```bash
//! # 50 doctors, 200 patients (default)
//! cargo run -p clinica-db --bin seed
//!
//! # Custom amounts
//! cargo run -p clinica-db --bin seed -- --doctors 10 --patients 1000
//!
//! # Specify database path
//! cargo run -p clinica-db --bin seed -- --db ./data/clinica.db
//! ```
//!
//! Records are built from fixed name lists, so runs are reproducible.
//! Every record goes through the same validation as user input.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use clinica_core::dto::{AppointmentDto, DoctorDto, PatientDto};
use clinica_core::validation::{validate_appointment, validate_doctor, validate_patient};
use clinica_core::BLOOD_TYPES;
use clinica_db::{Database, DbConfig};
use std::env;
use tracing_subscriber::EnvFilter;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Fabio", "Gloria", "Hugo", "Irene", "Javier",
    "Karen", "Luis", "Marta", "Nicolas", "Olga", "Pablo", "Quique", "Rosa", "Sergio", "Teresa",
];

const LAST_NAMES: &[&str] = &[
    "Alonso", "Blanco", "Castro", "Delgado", "Estevez", "Fuentes", "Garrido", "Herrera",
    "Iglesias", "Jimenez", "Lozano", "Molina", "Navarro", "Ortega", "Prieto", "Ramos",
];

const SPECIALTIES: &[&str] = &[
    "Cardiology",
    "Dermatology",
    "Endocrinology",
    "Family Medicine",
    "Gastroenterology",
    "Neurology",
    "Oncology",
    "Pediatrics",
    "Psychiatry",
    "Radiology",
];

const INSURERS: &[&str] = &["MediCare Plus", "Sanitas", "Adeslas", "Asisa", "DKV"];

fn name_at(seed: usize) -> (String, String) {
    let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let last = LAST_NAMES[(seed / FIRST_NAMES.len() + seed * 7) % LAST_NAMES.len()];
    (first.to_string(), last.to_string())
}

fn doctor_at(seed: usize) -> DoctorDto {
    let (first_name, last_name) = name_at(seed * 3 + 1);
    DoctorDto {
        id: None,
        email: Some(format!(
            "{}.{}{}@clinica.test",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            seed
        )),
        first_name,
        last_name,
        national_id: format!("D{:08}", seed),
        specialty: SPECIALTIES[seed % SPECIALTIES.len()].to_string(),
        license_number: format!("LIC-{:05}", 10_000 + seed),
    }
}

fn patient_at(seed: usize) -> PatientDto {
    let (first_name, last_name) = name_at(seed);
    let birth_date = NaiveDate::from_ymd_opt(1940, 1, 1)
        .map(|base| base + Duration::days(((seed * 137) % 29_000) as i64));

    PatientDto {
        id: None,
        first_name,
        last_name,
        national_id: format!("P{:08}", seed),
        email: None,
        birth_date,
        // Every fifth patient has no blood type on file
        blood_type: (seed % 5 != 0).then(|| BLOOD_TYPES[seed % BLOOD_TYPES.len()].to_string()),
        insurance_name: (seed % 4 != 0).then(|| INSURERS[seed % INSURERS.len()].to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut doctors: usize = 50;
    let mut patients: usize = 200;
    let mut db_path = String::from("./clinica_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--doctors" => {
                if i + 1 < args.len() {
                    doctors = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--patients" => {
                if i + 1 < args.len() {
                    patients = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Clinica Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("      --doctors <N>   Number of doctors to generate (default: 50)");
                println!("      --patients <N>  Number of patients to generate (default: 200)");
                println!("  -d, --db <PATH>     Database file path (default: ./clinica_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Clinica Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Doctors:  {}", doctors);
    println!("Patients: {}", patients);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.doctors().count().await? + db.patients().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} records", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    let mut doctor_ids = Vec::with_capacity(doctors);
    for seed in 0..doctors {
        let doctor = validate_doctor(&doctor_at(seed))?;
        match db.doctors().insert(&doctor).await {
            Ok(stored) => doctor_ids.push(stored.id),
            Err(e) => eprintln!("Failed to insert doctor {}: {}", doctor.license_number, e),
        }
    }
    println!("✓ Generated {} doctors", doctor_ids.len());

    let mut patient_ids = Vec::with_capacity(patients);
    for seed in 0..patients {
        let patient = validate_patient(&patient_at(seed))?;
        match db.patients().insert(&patient).await {
            Ok(stored) => patient_ids.push(stored.id),
            Err(e) => eprintln!("Failed to insert patient {}: {}", patient.person.national_id, e),
        }

        if (seed + 1) % 500 == 0 {
            println!("  Generated {} patients...", seed + 1);
        }
    }
    println!("✓ Generated {} patients", patient_ids.len());

    // One appointment per patient, spread over the doctors and next month
    let mut booked = 0;
    if !doctor_ids.is_empty() {
        let first_slot = Utc.with_ymd_and_hms(2026, 11, 2, 9, 0, 0).single();
        for (n, patient_id) in patient_ids.iter().enumerate() {
            let dto = AppointmentDto {
                id: None,
                doctor_id: doctor_ids[n % doctor_ids.len()],
                patient_id: *patient_id,
                scheduled_at: first_slot
                    .map(|slot| slot + Duration::days((n / 8) as i64) + Duration::hours((n % 8) as i64)),
                reason: Some("Routine checkup".to_string()),
            };
            db.appointments().schedule(&validate_appointment(&dto)?).await?;
            booked += 1;
        }
    }
    println!("✓ Scheduled {} appointments", booked);

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seed complete in {:?}", elapsed);

    Ok(())
}
