//! Cloud KMS symmetric decryption with end-to-end CRC32C verification.
//!
//! # Integrity
//!
//! 1. The CRC32C of the ciphertext is sent with the request so the service can
//!    reject a request corrupted on the way in.
//! 2. The CRC32C of the plaintext returned by the service is recomputed locally.
//!    A mismatch means the response was corrupted on the way out, even though
//!    the call itself succeeded, and is reported as [`FetchError::Corrupted`].

use async_trait::async_trait;
use bytes::Bytes;
use common::{checksum, CryptoKeyName, FetchError};
use tracing::{debug, instrument};

use crate::secret::SecretValue;

/// A single decrypt request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptRequest {
    /// Key used to decrypt.
    pub name: CryptoKeyName,
    /// Ciphertext as stored.
    pub ciphertext: Bytes,
    /// CRC32C of `ciphertext`.
    pub ciphertext_crc32c: u32,
}

/// Result of a decrypt call, before verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptResponse {
    pub plaintext: Bytes,
    /// CRC32C of `plaintext` as computed by the service.
    pub plaintext_crc32c: Option<i64>,
}

/// Capability to decrypt ciphertext with a symmetric key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyDecryptor: Send + Sync {
    /// Send one decrypt request.
    async fn decrypt(&self, request: DecryptRequest) -> Result<DecryptResponse, FetchError>;
}

/// Decrypt `ciphertext` with `key`, verifying checksums in both directions.
///
/// # Errors
///
/// - [`FetchError::Decrypt`] (or [`FetchError::Client`]) if the call fails.
/// - [`FetchError::Corrupted`] if the returned checksum is missing or does not
///   match the plaintext. No plaintext is returned in that case.
#[instrument(skip_all, fields(key = %key))]
pub async fn decrypt_symmetric(
    decryptor: &dyn KeyDecryptor,
    key: &CryptoKeyName,
    ciphertext: &[u8],
) -> Result<SecretValue, FetchError> {
    let ciphertext_crc32c = checksum::crc32c(ciphertext);
    debug!(
        bytes = ciphertext.len(),
        ciphertext_crc32c, "sending decrypt request"
    );

    let response = decryptor
        .decrypt(DecryptRequest {
            name: key.clone(),
            ciphertext: Bytes::copy_from_slice(ciphertext),
            ciphertext_crc32c,
        })
        .await?;

    if !checksum::verify(&response.plaintext, response.plaintext_crc32c) {
        return Err(FetchError::Corrupted {
            operation: "decrypt",
        });
    }

    debug!(bytes = response.plaintext.len(), "ciphertext decrypted");
    Ok(SecretValue::new(response.plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CryptoKeyName {
        CryptoKeyName::global("abc", "ring1", "key1")
    }

    fn respond_with(plaintext: &'static [u8], crc: Option<i64>) -> MockKeyDecryptor {
        let mut mock = MockKeyDecryptor::new();
        mock.expect_decrypt().times(1).returning(move |_| {
            Ok(DecryptResponse {
                plaintext: Bytes::from_static(plaintext),
                plaintext_crc32c: crc,
            })
        });
        mock
    }

    #[tokio::test]
    async fn returns_plaintext_when_checksum_matches() {
        let crc = i64::from(checksum::crc32c(b"hello"));
        let mock = respond_with(b"hello", Some(crc));

        let plaintext = decrypt_symmetric(&mock, &key(), b"\x0a\x24ciphertext")
            .await
            .unwrap();
        assert_eq!(plaintext.as_bytes(), b"hello");
    }

    #[tokio::test]
    async fn checksum_mismatch_is_corruption() {
        let crc = i64::from(checksum::crc32c(b"hello")) ^ 0x1;
        let mock = respond_with(b"hello", Some(crc));

        let err = decrypt_symmetric(&mock, &key(), b"ciphertext")
            .await
            .unwrap_err();
        assert!(err.is_corruption());
        assert_eq!(err.to_string(), "decrypt: response corrupted in-transit");
    }

    #[tokio::test]
    async fn missing_checksum_is_corruption() {
        let mock = respond_with(b"hello", None);

        let err = decrypt_symmetric(&mock, &key(), b"ciphertext")
            .await
            .unwrap_err();
        assert!(err.is_corruption());
    }

    #[tokio::test]
    async fn request_carries_key_and_ciphertext_checksum() {
        let ciphertext: &'static [u8] = b"\x00\xffbinary ciphertext";
        let mut mock = MockKeyDecryptor::new();
        mock.expect_decrypt()
            .withf(move |req| {
                req.name.to_string()
                    == "projects/abc/locations/global/keyRings/ring1/cryptoKeys/key1"
                    && req.ciphertext.as_ref() == ciphertext
                    && req.ciphertext_crc32c == checksum::crc32c(ciphertext)
            })
            .times(1)
            .returning(|_| {
                Ok(DecryptResponse {
                    plaintext: Bytes::from_static(b"ok"),
                    plaintext_crc32c: Some(i64::from(checksum::crc32c(b"ok"))),
                })
            });

        decrypt_symmetric(&mock, &key(), ciphertext).await.unwrap();
    }

    #[tokio::test]
    async fn remote_failure_is_not_corruption() {
        let mut mock = MockKeyDecryptor::new();
        mock.expect_decrypt()
            .returning(|_| Err(FetchError::Decrypt("PERMISSION_DENIED".into())));

        let err = decrypt_symmetric(&mock, &key(), b"ciphertext")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decrypt(_)));
        assert!(!err.is_corruption());
    }
}
