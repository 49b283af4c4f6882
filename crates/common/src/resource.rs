//! Fully-qualified Google Cloud resource names.
//!
//! Both types render their canonical path through [`std::fmt::Display`], which
//! is the string sent as the `name` field of the corresponding API request.

use std::fmt;

/// KMS location used when none is configured.
pub const DEFAULT_KMS_LOCATION: &str = "global";

/// `projects/{project}/secrets/{secret}/versions/{version}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersionName {
    pub project: String,
    pub secret: String,
    pub version: String,
}

impl SecretVersionName {
    pub fn new(
        project: impl Into<String>,
        secret: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            secret: secret.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for SecretVersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/secrets/{}/versions/{}",
            self.project, self.secret, self.version
        )
    }
}

/// `projects/{project}/locations/{location}/keyRings/{key_ring}/cryptoKeys/{crypto_key}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoKeyName {
    pub project: String,
    pub location: String,
    pub key_ring: String,
    pub crypto_key: String,
}

impl CryptoKeyName {
    /// Build a key name in the [`DEFAULT_KMS_LOCATION`].
    pub fn global(
        project: impl Into<String>,
        key_ring: impl Into<String>,
        crypto_key: impl Into<String>,
    ) -> Self {
        Self::new(project, DEFAULT_KMS_LOCATION, key_ring, crypto_key)
    }

    pub fn new(
        project: impl Into<String>,
        location: impl Into<String>,
        key_ring: impl Into<String>,
        crypto_key: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            key_ring: key_ring.into(),
            crypto_key: crypto_key.into(),
        }
    }
}

impl fmt::Display for CryptoKeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}",
            self.project, self.location, self.key_ring, self.crypto_key
        )
    }
}
