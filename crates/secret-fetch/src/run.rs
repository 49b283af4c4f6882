//! The fetch flow: access the secret, then decrypt it when configured to.
//!
//! Each external capability is called at most once. The first failure is
//! printed to the report and returned; nothing after it runs. [`finish`] turns
//! the outcome into the process exit code.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::kms::{self, KeyDecryptor};
use crate::report::Report;
use crate::secret::{self, SecretAccessor, SecretValue};

/// Values produced by a successful run.
#[derive(Debug)]
pub struct Resolved {
    /// Payload exactly as stored in Secret Manager.
    pub raw: SecretValue,
    /// Plaintext, for encrypted secrets.
    pub decrypted: Option<SecretValue>,
}

impl Resolved {
    /// The value a consumer should use: the plaintext if there is one.
    pub fn value(&self) -> &SecretValue {
        self.decrypted.as_ref().unwrap_or(&self.raw)
    }
}

/// Run the fetch flow against the given capabilities.
///
/// `kms` is only used when `cfg.secret_encrypted` is set. The configuration
/// summary is printed by the caller before any client is built.
///
/// # Errors
///
/// Returns the [`common::FetchError`] that stopped the flow, or an I/O error if
/// the report cannot be written.
#[instrument(skip_all, fields(encrypted = cfg.secret_encrypted))]
pub async fn run<W: Write>(
    cfg: &Config,
    secrets: &dyn SecretAccessor,
    kms: &dyn KeyDecryptor,
    report: &mut Report<W>,
) -> Result<Resolved> {
    let name = cfg.secret_version_name();
    report.secret_name(&name)?;

    let raw = match secret::access_secret_version(secrets, &name).await {
        Ok(value) => value,
        Err(e) => {
            report.access_failed(&e)?;
            return Err(e.into());
        }
    };
    report.secret_value(&raw)?;

    let Some(key) = cfg.crypto_key_name() else {
        report.encryption_disabled()?;
        info!(name = %name, "secret fetched without decryption");
        return Ok(Resolved {
            raw,
            decrypted: None,
        });
    };

    let plaintext = match kms::decrypt_symmetric(kms, &key, raw.as_bytes()).await {
        Ok(value) => value,
        Err(e) => {
            report.decrypt_failed(&e)?;
            return Err(e.into());
        }
    };
    report.decrypted_value(&plaintext)?;
    info!(name = %name, key = %key, "secret fetched and decrypted");

    Ok(Resolved {
        raw,
        decrypted: Some(plaintext),
    })
}

/// Log the outcome of [`run`] once and pick the exit code.
///
/// A failed fetch ends the run normally unless `cfg.fail_on_fetch_error` is set.
pub fn finish(cfg: &Config, outcome: Result<Resolved>) -> ExitCode {
    match outcome {
        Ok(resolved) => {
            info!(
                bytes = resolved.value().as_bytes().len(),
                decrypted = resolved.decrypted.is_some(),
                "secret resolved"
            );
            ExitCode::SUCCESS
        }
        Err(e) if cfg.fail_on_fetch_error => {
            error!(error = %e, "secret fetch failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            warn!(error = %e, "secret fetch failed; finishing without a value");
            ExitCode::SUCCESS
        }
    }
}
