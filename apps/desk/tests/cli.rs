//! End-to-end tests for the `clinica` binary against a throwaway database.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated database and config file for one test.
struct TestContext {
    _root: TempDir,
    db: PathBuf,
    config: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let db = root.path().join("clinica.db");
        let config = root.path().join("clinica.toml");
        fs::write(&config, "").expect("Failed to write test config");
        Self {
            _root: root,
            db,
            config,
        }
    }

    fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("clinica").expect("clinica binary should build");
        cmd.env_remove("RUST_LOG")
            .env_remove("CLINICA_DB_PATH")
            .env_remove("CLINICA_PAGE_SIZE")
            .env_remove("CLINICA_LOG")
            .arg("--db")
            .arg(&self.db)
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    /// Runs with `--json`, expects success, returns the parsed stdout.
    fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cli()
            .arg("--json")
            .args(args)
            .output()
            .expect("Failed to run clinica");
        assert!(
            output.status.success(),
            "clinica {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }

    fn add_doctor(&self, first: &str, last: &str, n: u32, specialty: &str) -> i64 {
        let national_id = format!("D-{}", n);
        let license = format!("LIC-{}", n);
        let added = self.json(&[
            "doctor",
            "add",
            "--first-name",
            first,
            "--last-name",
            last,
            "--national-id",
            &national_id,
            "--specialty",
            specialty,
            "--license",
            &license,
        ]);
        added["id"].as_i64().expect("doctor id")
    }

    fn add_patient(&self, first: &str, national_id: &str) -> i64 {
        let added = self.json(&[
            "patient",
            "add",
            "--first-name",
            first,
            "--last-name",
            "Doe",
            "--national-id",
            national_id,
            "--birth-date",
            "1990-06-15",
            "--blood-type",
            "ab-",
            "--insurance",
            "Acme Health",
        ]);
        added["id"].as_i64().expect("patient id")
    }
}

#[test]
fn doctor_add_show_and_list() {
    let ctx = TestContext::new();
    let id = ctx.add_doctor("Gregory", "House", 1, "Diagnostics");
    ctx.add_doctor("Allison", "Cameron", 2, "Immunology");

    let shown = ctx.json(&["doctor", "show", &id.to_string()]);
    assert_eq!(shown["firstName"], "Gregory");
    assert_eq!(shown["licenseNumber"], "LIC-1");

    let listed = ctx.json(&["doctor", "list", "--page-size", "1"]);
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["firstName"], "Allison");

    ctx.cli()
        .args(["doctor", "list", "--page", "2", "--page-size", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gregory House"))
        .stdout(predicate::str::contains("page 2 · 1 of 2"));
}

#[test]
fn doctor_search_by_name_and_specialty() {
    let ctx = TestContext::new();
    ctx.add_doctor("Robert", "Chase", 1, "Intensive Care");
    ctx.add_doctor("Eric", "Foreman", 2, "Neurology");

    let found = ctx.json(&["doctor", "search-name", "ric fore"]);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let found = ctx.json(&["doctor", "search-specialty", "CARE"]);
    assert_eq!(found[0]["lastName"], "Chase");

    let found = ctx.json(&["doctor", "search-specialty", "%"]);
    assert_eq!(found.as_array().map(Vec::len), Some(0));
}

#[test]
fn duplicate_license_exits_4() {
    let ctx = TestContext::new();
    ctx.add_doctor("Gregory", "House", 1, "Diagnostics");

    ctx.cli()
        .args([
            "doctor",
            "add",
            "--first-name",
            "James",
            "--last-name",
            "Wilson",
            "--national-id",
            "D-99",
            "--specialty",
            "Oncology",
            "--license",
            "LIC-1",
        ])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Error [DUPLICATE] register doctor"))
        .stderr(predicate::str::contains("LIC-1"));
}

#[test]
fn missing_records_exit_3() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["doctor", "show", "42"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("NOT_FOUND"));

    ctx.cli()
        .args([
            "patient",
            "update",
            "42",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--national-id",
            "P-1",
            "--birth-date",
            "1990-06-15",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("update patient"));
}

#[test]
fn validation_errors_exit_2() {
    let ctx = TestContext::new();

    ctx.cli()
        .args([
            "doctor",
            "add",
            "--first-name",
            "Gregory",
            "--last-name",
            "House",
            "--national-id",
            "D-1",
            "--specialty",
            "Diagnostics",
            "--license",
            "LIC-1",
            "--email",
            "not-an-email",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("VALIDATION_ERROR"));

    ctx.cli()
        .args(["patient", "search-name", "   "])
        .assert()
        .code(2);
}

#[test]
fn json_errors_go_to_stderr() {
    let ctx = TestContext::new();

    let output = ctx
        .cli()
        .args(["--json", "patient", "show", "5"])
        .output()
        .expect("Failed to run clinica");
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());

    let err: Value = serde_json::from_slice(&output.stderr).expect("stderr should be JSON");
    assert_eq!(err["code"], "NOT_FOUND");
    assert_eq!(err["stage"], "find patient");
}

#[test]
fn patient_lookup_and_delete() {
    let ctx = TestContext::new();
    let id = ctx.add_patient("Jane", "P-1");

    let found = ctx.json(&["patient", "find-national-id", "P-1"]);
    assert_eq!(found["id"], id);
    assert_eq!(found["bloodType"], "AB-");
    assert_eq!(found["birthDate"], "1990-06-15");

    let found = ctx.json(&["patient", "search-insurance", "acme"]);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    ctx.cli()
        .args(["patient", "delete", &id.to_string(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted patient"));

    ctx.cli()
        .args(["patient", "show", &id.to_string()])
        .assert()
        .code(3);
}

#[test]
fn appointments_follow_their_doctor() {
    let ctx = TestContext::new();
    let doctor_id = ctx.add_doctor("Miranda", "Bailey", 1, "General Surgery");
    let patient_id = ctx.add_patient("Izzie", "P-1");
    let (doctor, patient) = (doctor_id.to_string(), patient_id.to_string());

    let booked = ctx.json(&[
        "appointment",
        "schedule",
        "--doctor",
        &doctor,
        "--patient",
        &patient,
        "--at",
        "2026-05-04 10:30",
        "--reason",
        "Check-up",
    ]);
    assert_eq!(booked["scheduledAt"], "2026-05-04T10:30:00Z");

    let listed = ctx.json(&["appointment", "patient", &patient]);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    ctx.cli()
        .args(["doctor", "delete", &doctor, "-y"])
        .assert()
        .success();

    let listed = ctx.json(&["appointment", "patient", &patient]);
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}

#[test]
fn db_status_reports_counts() {
    let ctx = TestContext::new();
    ctx.add_doctor("Gregory", "House", 1, "Diagnostics");

    let status = ctx.json(&["db", "status"]);
    assert_eq!(status["healthy"], true);
    assert_eq!(status["doctors"], 1);
    assert_eq!(status["patients"], 0);
    assert_eq!(status["migrationsTotal"], status["migrationsApplied"]);
}

#[test]
fn usage_errors_are_rejected_by_clap() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["doctor", "list", "--page", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--page"));
}
