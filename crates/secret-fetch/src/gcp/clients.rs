//! Google Cloud SDK clients behind the [`SecretAccessor`] and [`KeyDecryptor`]
//! capabilities.

use async_trait::async_trait;
use common::{FetchError, SecretVersionName};
use google_cloud_kms_v1::client::KeyManagementService;
use google_cloud_secretmanager_v1::client::SecretManagerService;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::kms::{DecryptRequest, DecryptResponse, KeyDecryptor};
use crate::secret::{AccessedPayload, SecretAccessor};

/// Secret Manager client, built eagerly at startup.
#[derive(Clone)]
pub struct GcpSecretManager {
    client: SecretManagerService,
}

impl GcpSecretManager {
    /// Build the Secret Manager client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if credentials cannot be resolved or the
    /// client cannot be constructed.
    pub async fn connect() -> Result<Self, FetchError> {
        let client = SecretManagerService::builder()
            .build()
            .await
            .map_err(|e| FetchError::Client {
                service: "secret manager",
                source: e.into(),
            })?;
        info!("secret manager client ready");
        Ok(Self { client })
    }
}

#[async_trait]
impl SecretAccessor for GcpSecretManager {
    async fn access(
        &self,
        name: &SecretVersionName,
    ) -> Result<Option<AccessedPayload>, FetchError> {
        let response = self
            .client
            .access_secret_version()
            .set_name(name.to_string())
            .send()
            .await
            .map_err(|e| FetchError::SecretAccess(e.into()))?;

        debug!(version = %response.name, "access secret version returned");
        Ok(response.payload.map(|p| AccessedPayload {
            data: p.data,
            data_crc32c: p.data_crc32c,
        }))
    }
}

/// Cloud KMS client, built on the first decrypt.
///
/// Runs that never decrypt never resolve KMS credentials.
#[derive(Default)]
pub struct GcpKms {
    client: OnceCell<KeyManagementService>,
}

impl GcpKms {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client(&self) -> Result<&KeyManagementService, FetchError> {
        self.client
            .get_or_try_init(|| async {
                let client = KeyManagementService::builder()
                    .build()
                    .await
                    .map_err(|e| FetchError::Client {
                        service: "kms",
                        source: e.into(),
                    })?;
                info!("kms client ready");
                Ok::<_, FetchError>(client)
            })
            .await
    }
}

#[async_trait]
impl KeyDecryptor for GcpKms {
    async fn decrypt(&self, request: DecryptRequest) -> Result<DecryptResponse, FetchError> {
        let DecryptRequest {
            name,
            ciphertext,
            ciphertext_crc32c,
        } = request;

        let response = self
            .client()
            .await?
            .decrypt()
            .set_name(name.to_string())
            .set_ciphertext(ciphertext)
            .set_ciphertext_crc32c(i64::from(ciphertext_crc32c))
            .send()
            .await
            .map_err(|e| FetchError::Decrypt(e.into()))?;

        Ok(DecryptResponse {
            plaintext: response.plaintext,
            plaintext_crc32c: response.plaintext_crc32c,
        })
    }
}
