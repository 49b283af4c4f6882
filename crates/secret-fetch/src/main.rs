//! `secret-fetch`: binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing + optional OTLP).
//! 3. Print the configuration summary.
//! 4. Install the TLS crypto provider and build the Secret Manager client.
//! 5. Fetch the secret and, if it is encrypted, decrypt it with Cloud KMS.
//!
//! Configuration and client setup failures exit with a non-zero status. A
//! failed fetch is reported and ends the run normally unless
//! `FAIL_ON_FETCH_ERROR` is set.

mod config;
mod gcp;
mod kms;
mod report;
mod run;
mod secret;
mod telemetry;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use report::Report;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    let _telemetry: telemetry::TelemetryGuard =
        telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        encrypted = cfg.secret_encrypted,
        "secret-fetch starting"
    );

    // -----------------------------------------------------------------------
    // 3. Configuration summary
    // -----------------------------------------------------------------------
    let mut report = Report::new(std::io::stdout().lock());
    report.config(&cfg)?;

    // -----------------------------------------------------------------------
    // 4. Clients
    // -----------------------------------------------------------------------
    // Ignore the error: it only means a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let secrets = gcp::GcpSecretManager::connect()
        .await
        .context("failed to set up secret manager client")?;
    let kms = gcp::GcpKms::new();

    // -----------------------------------------------------------------------
    // 5. Fetch
    // -----------------------------------------------------------------------
    let outcome = run::run(&cfg, &secrets, &kms, &mut report).await;
    Ok(run::finish(&cfg, outcome))
}
