//! Azure Blob Storage client implementation
//!
//! Wraps azure_storage_blobs and implements the ObjectStore trait from blobup-core.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_storage::{CloudLocation, ConnectionString, StorageCredentials};
use azure_storage_blobs::prelude::{BlobServiceClient, ClientBuilder};
use url::Url;

use blobup_core::{AuthMethod, Error, ObjectStore, Result, TransferOptions, UploadConfig, UploadRecord};

use crate::identity;
use crate::upload;

/// Azurite's default blob endpoint and account
const EMULATOR_ADDRESS: &str = "127.0.0.1";
const EMULATOR_PORT: u16 = 10000;
const EMULATOR_ACCOUNT: &str = "devstoreaccount1";

/// Azure blob service client wrapper
pub struct AzureBlobClient {
    inner: BlobServiceClient,
    account: String,
}

impl AzureBlobClient {
    /// Create a client for a validated configuration
    ///
    /// A connection string is used when present; otherwise the ambient
    /// identity chain must produce a credential for the account.
    pub async fn connect(config: &UploadConfig) -> Result<Self> {
        match config.auth() {
            AuthMethod::ConnectionString(conn) => Self::from_connection_string(conn),
            AuthMethod::Ambient { account } => {
                let endpoint = service_endpoint(account)?;
                tracing::debug!(%endpoint, "acquiring ambient credential");
                let credential = identity::ambient_credential().await?;
                Ok(Self::with_token_credential(account, &endpoint, credential))
            }
        }
    }

    /// Create a client from a storage connection string
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let parsed = ConnectionString::new(connection_string)
            .map_err(|e| Error::Config(format!("invalid connection string: {e}")))?;

        let (account, location) = location_for(&parsed)?;

        let credentials = parsed
            .storage_credentials()
            .map_err(|e| Error::Auth(format!("connection string credentials: {e}")))?;

        tracing::debug!(account = %account, "using connection string credentials");

        Ok(Self {
            inner: ClientBuilder::with_location(location, credentials).blob_service_client(),
            account,
        })
    }

    /// Create a client for `account` at `endpoint`, authenticated with a
    /// token credential
    pub fn with_token_credential(
        account: &str,
        endpoint: &Url,
        credential: Arc<dyn TokenCredential>,
    ) -> Self {
        let credentials = StorageCredentials::token_credential(credential);
        let location = CloudLocation::Custom {
            account: account.to_string(),
            uri: endpoint.as_str().trim_end_matches('/').to_string(),
        };
        Self {
            inner: ClientBuilder::with_location(location, credentials).blob_service_client(),
            account: account.to_string(),
        }
    }

    /// Storage account this client talks to
    pub fn account(&self) -> &str {
        &self.account
    }
}

/// Public blob endpoint for an account: `https://{account}.blob.core.windows.net/`
pub fn service_endpoint(account: &str) -> Result<Url> {
    let valid = !account.is_empty()
        && account
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !valid {
        return Err(Error::Config(format!(
            "invalid storage account name '{account}': use lowercase letters and digits only"
        )));
    }

    Url::parse(&format!("https://{account}.blob.core.windows.net/"))
        .map_err(|e| Error::Config(format!("invalid storage account name '{account}': {e}")))
}

fn location_for(parsed: &ConnectionString<'_>) -> Result<(String, CloudLocation)> {
    if parsed.use_development_storage == Some(true) {
        let location = CloudLocation::Emulator {
            address: EMULATOR_ADDRESS.to_string(),
            port: EMULATOR_PORT,
        };
        return Ok((EMULATOR_ACCOUNT.to_string(), location));
    }

    let account = parsed
        .account_name
        .ok_or_else(|| Error::Config("connection string is missing AccountName".into()))?
        .to_string();

    let location = match (parsed.blob_endpoint, parsed.endpoint_suffix) {
        (Some(endpoint), _) => CloudLocation::Custom {
            account: account.clone(),
            uri: endpoint.trim_end_matches('/').to_string(),
        },
        (None, Some(suffix)) => CloudLocation::Custom {
            account: account.clone(),
            uri: format!("https://{account}.blob.{suffix}"),
        },
        (None, None) => CloudLocation::Public {
            account: account.clone(),
        },
    };

    Ok((account, location))
}

/// Map an SDK error, singling out authorization failures
pub(crate) fn storage_error(e: azure_core::Error) -> Error {
    let err_str = e.to_string();
    if err_str.contains("AuthenticationFailed")
        || err_str.contains("AuthorizationFailure")
        || err_str.contains("AuthorizationPermissionMismatch")
    {
        Error::Auth(err_str)
    } else {
        Error::Network(err_str)
    }
}

#[async_trait]
impl ObjectStore for AzureBlobClient {
    async fn create_container(&self, container: &str) -> Result<()> {
        self.inner
            .container_client(container)
            .create()
            .await
            .map_err(storage_error)
    }

    async fn upload_file(
        &self,
        container: &str,
        key: &str,
        source: &Path,
        options: &TransferOptions,
    ) -> Result<UploadRecord> {
        let blob = self.inner.container_client(container).blob_client(key);
        let size = upload::upload_file(&blob, source, options).await?;
        Ok(UploadRecord::new(source, key, size))
    }
}
