//! # Clinica Entry Point
//!
//! The setup lives in `lib.rs` so tests can drive it.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    clinica_desk_lib::run().await
}
