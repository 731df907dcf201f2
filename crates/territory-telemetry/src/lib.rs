//! # Territory Telemetry
//!
//! Owns the global tracing subscriber for every binary and test harness in
//! the workspace. Subsystem crates only emit `tracing` events; this crate
//! decides where they go and how they are formatted.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

pub use config::TelemetryConfig;

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Telemetry setup errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The subscriber could not be installed.
    #[error("Failed to initialize telemetry: {0}")]
    Init(String),

    /// A global subscriber is already installed.
    #[error("Telemetry already initialized")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber.
///
/// Idempotence guard: callable once per process; subsequent calls fail with
/// `AlreadyInitialized` instead of panicking inside tracing-subscriber.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TelemetryError::AlreadyInitialized);
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(config.console_output);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(())
}

/// `init` with configuration read from the environment.
pub fn init_from_env() -> Result<(), TelemetryError> {
    init(&TelemetryConfig::from_env())
}
