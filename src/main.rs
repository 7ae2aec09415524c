use mpu9250_port::{init_tracing, run_probes};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    // Initialize tracing with RUST_LOG environment variable support
    init_tracing();

    // Load configuration from CONFIG_PATH or default
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

    match run_probes(&config_path) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("[main] {}", e);
            ExitCode::FAILURE
        }
    }
}
