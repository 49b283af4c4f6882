//! Common error types shared across crates.

use thiserror::Error;

/// Boxed source error from an external client library.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error raised while fetching or decrypting a secret.
///
/// Variants fall into two classes:
/// - remote failures ([`FetchError::Client`], [`FetchError::SecretAccess`],
///   [`FetchError::EmptyPayload`], [`FetchError::Decrypt`]), where the call
///   itself did not succeed;
/// - integrity failures ([`FetchError::Corrupted`]), where the call nominally
///   succeeded but the response did not match its checksum.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A client for an external service could not be constructed.
    #[error("failed to create {service} client: {source}")]
    Client {
        service: &'static str,
        #[source]
        source: BoxError,
    },

    /// The secret-access call failed (not found, permission denied, transport).
    #[error("failed to access secret version: {0}")]
    SecretAccess(#[source] BoxError),

    /// The secret version exists but the response carried no payload.
    #[error("secret version {0} returned no payload")]
    EmptyPayload(String),

    /// The decrypt call failed.
    #[error("failed to decrypt ciphertext: {0}")]
    Decrypt(#[source] BoxError),

    /// The response checksum did not match the locally computed CRC32C.
    #[error("{operation}: response corrupted in-transit")]
    Corrupted { operation: &'static str },
}

impl FetchError {
    /// Returns `true` for integrity failures, as opposed to remote-call failures.
    pub fn is_corruption(&self) -> bool {
        matches!(self, FetchError::Corrupted { .. })
    }
}
