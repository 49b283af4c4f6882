//! Configuration loading and validation for the secret fetcher.
//!
//! All values are read from environment variables at startup. Loading returns a
//! [`ConfigError`] if any required variable is missing or invalid; no external
//! service is contacted before validation succeeds.

use common::{CryptoKeyName, SecretVersionName, DEFAULT_KMS_LOCATION};
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment could not be read or deserialised.
    #[error("failed to load configuration from environment: {0}")]
    Load(#[from] config::ConfigError),

    /// A variable that is always required is absent or empty.
    #[error("{0} is required and must not be empty")]
    Missing(&'static str),

    /// A variable required for encrypted secrets is absent or empty.
    #[error("{0} is required when SECRET_ENCRYPTED is true")]
    MissingForEncryption(&'static str),

    /// A boolean variable is not one of `true`, `false`, `1` or `0`.
    #[error("invalid value for {name}: {value:?} (expected true, false, 1 or 0)")]
    InvalidBool { name: &'static str, value: String },
}

/// Environment variables as read, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    project_id: String,
    #[serde(default)]
    secret_id: String,
    #[serde(default)]
    secret_version_id: String,
    #[serde(default)]
    secret_encrypted: String,
    #[serde(default)]
    key_ring: String,
    #[serde(default)]
    key: String,
    #[serde(default = "default_key_location")]
    key_location: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    otel_exporter_otlp_endpoint: Option<String>,
    #[serde(default)]
    fail_on_fetch_error: String,
}

/// Validated fetcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Google Cloud project owning both the secret and the key. **Required.**
    pub project_id: String,

    /// Secret Manager secret ID. **Required.**
    pub secret_id: String,

    /// Secret version, numeric or `latest`. **Required.**
    pub secret_version_id: String,

    /// Whether the secret payload is KMS ciphertext. **Required.**
    pub secret_encrypted: bool,

    /// KMS key ring. Required when `secret_encrypted` is set.
    pub key_ring: String,

    /// KMS crypto key. Required when `secret_encrypted` is set.
    pub key: String,

    /// KMS location of the key ring.
    pub key_location: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    pub log_level: String,

    /// OTLP endpoint for span export; export is disabled when unset.
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Exit non-zero when the secret cannot be fetched or decrypted.
    /// Off by default: the failure is reported and the run ends normally.
    pub fail_on_fetch_error: bool,
}

fn default_key_location() -> String {
    DEFAULT_KMS_LOCATION.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any required variable is absent, empty, or
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    fn load(source: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawConfig = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Self::validate(raw)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let secret_encrypted = match raw.secret_encrypted.as_str() {
            "" => return Err(ConfigError::Missing("SECRET_ENCRYPTED")),
            value => parse_bool("SECRET_ENCRYPTED", value)?,
        };
        let fail_on_fetch_error = match raw.fail_on_fetch_error.as_str() {
            "" => false,
            value => parse_bool("FAIL_ON_FETCH_ERROR", value)?,
        };

        ensure_non_empty(&raw.project_id, "PROJECT_ID", ConfigError::Missing)?;
        ensure_non_empty(&raw.secret_id, "SECRET_ID", ConfigError::Missing)?;
        ensure_non_empty(
            &raw.secret_version_id,
            "SECRET_VERSION_ID",
            ConfigError::Missing,
        )?;

        if secret_encrypted {
            ensure_non_empty(&raw.key_ring, "KEY_RING", ConfigError::MissingForEncryption)?;
            ensure_non_empty(&raw.key, "KEY", ConfigError::MissingForEncryption)?;
            ensure_non_empty(
                &raw.key_location,
                "KEY_LOCATION",
                ConfigError::MissingForEncryption,
            )?;
        }

        Ok(Self {
            project_id: raw.project_id,
            secret_id: raw.secret_id,
            secret_version_id: raw.secret_version_id,
            secret_encrypted,
            key_ring: raw.key_ring,
            key: raw.key,
            key_location: raw.key_location,
            log_level: raw.log_level,
            otel_exporter_otlp_endpoint: raw
                .otel_exporter_otlp_endpoint
                .filter(|e| !e.trim().is_empty()),
            fail_on_fetch_error,
        })
    }

    /// Resource name of the configured secret version.
    pub fn secret_version_name(&self) -> SecretVersionName {
        SecretVersionName::new(&self.project_id, &self.secret_id, &self.secret_version_id)
    }

    /// Resource name of the decryption key, or `None` for unencrypted secrets.
    pub fn crypto_key_name(&self) -> Option<CryptoKeyName> {
        self.secret_encrypted.then(|| {
            CryptoKeyName::new(&self.project_id, &self.key_location, &self.key_ring, &self.key)
        })
    }
}

/// Only the exact spellings are accepted; padded values are rejected.
fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ConfigError::InvalidBool {
            name,
            value: other.to_string(),
        }),
    }
}

fn ensure_non_empty(
    value: &str,
    name: &'static str,
    err: fn(&'static str) -> ConfigError,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(err(name));
    }
    Ok(())
}
