//! Secret Manager access: the [`SecretAccessor`] capability and payload checks.
//!
//! # Security invariants
//!
//! - Payload bytes are **never** included in log fields or span attributes;
//!   only lengths and checksums are recorded.

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use common::{checksum, FetchError, SecretVersionName};
use tracing::{debug, instrument};

/// Payload returned by a single access call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessedPayload {
    /// Raw secret bytes.
    pub data: Bytes,
    /// CRC32C reported by the service, when the secret version carries one.
    pub data_crc32c: Option<i64>,
}

/// Capability to read one version of a secret.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretAccessor: Send + Sync {
    /// Access `name` once.
    ///
    /// Returns `Ok(None)` if the service answered without a payload.
    async fn access(&self, name: &SecretVersionName)
        -> Result<Option<AccessedPayload>, FetchError>;
}

/// The bytes of an accessed secret version.
///
/// Kept as bytes so that binary KMS ciphertext survives unchanged on its way to
/// the decrypt call. [`fmt::Display`] renders the value as UTF-8 text.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(Bytes);

impl SecretValue {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The value as text; invalid UTF-8 sequences are replaced.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue([REDACTED; {} bytes])", self.0.len())
    }
}

/// Access a secret version and return its payload.
///
/// When the service reports a CRC32C for the payload, it is checked against
/// the bytes received.
///
/// # Errors
///
/// - [`FetchError::SecretAccess`] (or [`FetchError::Client`]) if the call fails.
/// - [`FetchError::EmptyPayload`] if the response carries no payload.
/// - [`FetchError::Corrupted`] if the reported checksum does not match.
#[instrument(skip_all, fields(name = %name))]
pub async fn access_secret_version(
    accessor: &dyn SecretAccessor,
    name: &SecretVersionName,
) -> Result<SecretValue, FetchError> {
    let payload = accessor
        .access(name)
        .await?
        .ok_or_else(|| FetchError::EmptyPayload(name.to_string()))?;

    if payload.data_crc32c.is_some() && !checksum::verify(&payload.data, payload.data_crc32c) {
        return Err(FetchError::Corrupted {
            operation: "access secret version",
        });
    }

    debug!(
        bytes = payload.data.len(),
        checksum_reported = payload.data_crc32c.is_some(),
        "secret version accessed"
    );
    Ok(SecretValue(payload.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn name() -> SecretVersionName {
        SecretVersionName::new("abc", "foo", "3")
    }

    #[tokio::test]
    async fn returns_payload_bytes() {
        let mut mock = MockSecretAccessor::new();
        mock.expect_access()
            .with(eq(name()))
            .times(1)
            .returning(|_| {
                Ok(Some(AccessedPayload {
                    data: Bytes::from_static(b"s3cr3t"),
                    data_crc32c: None,
                }))
            });

        let value = access_secret_version(&mock, &name()).await.unwrap();
        assert_eq!(value.as_bytes(), b"s3cr3t");
        assert_eq!(value.to_string(), "s3cr3t");
    }

    #[tokio::test]
    async fn verifies_reported_checksum() {
        let mut mock = MockSecretAccessor::new();
        mock.expect_access().returning(|_| {
            Ok(Some(AccessedPayload {
                data: Bytes::from_static(b"s3cr3t"),
                data_crc32c: Some(i64::from(checksum::crc32c(b"s3cr3t"))),
            }))
        });

        let value = access_secret_version(&mock, &name()).await.unwrap();
        assert_eq!(value.as_bytes(), b"s3cr3t");
    }

    #[tokio::test]
    async fn checksum_mismatch_is_corruption() {
        let mut mock = MockSecretAccessor::new();
        mock.expect_access().returning(|_| {
            Ok(Some(AccessedPayload {
                data: Bytes::from_static(b"s3cr3t"),
                data_crc32c: Some(i64::from(checksum::crc32c(b"other"))),
            }))
        });

        let err = access_secret_version(&mock, &name()).await.unwrap_err();
        assert!(err.is_corruption());
    }

    #[tokio::test]
    async fn missing_payload_is_an_error() {
        let mut mock = MockSecretAccessor::new();
        mock.expect_access().returning(|_| Ok(None));

        let err = access_secret_version(&mock, &name()).await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyPayload(n) if n == "projects/abc/secrets/foo/versions/3"));
    }

    #[tokio::test]
    async fn remote_failure_propagates() {
        let mut mock = MockSecretAccessor::new();
        mock.expect_access()
            .returning(|_| Err(FetchError::SecretAccess("NOT_FOUND".into())));

        let err = access_secret_version(&mock, &name()).await.unwrap_err();
        assert!(matches!(err, FetchError::SecretAccess(_)));
        assert!(!err.is_corruption());
    }

    #[test]
    fn secret_value_redacted_in_debug() {
        let value = SecretValue::new(Bytes::from_static(b"hunter2"));
        let debug = format!("{value:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn secret_value_renders_invalid_utf8_lossily() {
        let value = SecretValue::new(vec![b'o', b'k', 0xFF]);
        assert_eq!(value.as_text(), "ok\u{FFFD}");
        assert_eq!(value.as_bytes().len(), 3);
    }
}
