//! Ambient identity sources
//!
//! Used when no connection string is configured. Sources are tried in a fixed
//! order and each candidate must actually produce a token for the storage
//! scope before it is accepted.

use std::sync::Arc;

use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_identity::{
    AppServiceManagedIdentityCredential, AzureCliCredential, EnvironmentCredential,
    TokenCredentialOptions, VirtualMachineManagedIdentityCredential,
};

use blobup_core::{CredentialSource, Error, Result, first_available};

/// OAuth scope for Azure Storage data-plane requests
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

/// A source in the ambient identity chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientSource {
    /// Service principal from AZURE_TENANT_ID / AZURE_CLIENT_ID / AZURE_CLIENT_SECRET
    Environment,
    /// Managed identity of an App Service, Functions or Container Apps host
    AppService,
    /// Managed identity from the VM instance metadata endpoint
    VirtualMachine,
    /// Session of a logged-in `az` CLI
    AzureCli,
}

impl AmbientSource {
    /// Chain order, as in `azure_identity::DefaultAzureCredential`
    pub const ORDER: [AmbientSource; 4] = [
        AmbientSource::Environment,
        AmbientSource::AppService,
        AmbientSource::VirtualMachine,
        AmbientSource::AzureCli,
    ];

    fn credential(&self) -> Result<Arc<dyn TokenCredential>> {
        let credential: Arc<dyn TokenCredential> = match self {
            AmbientSource::Environment => Arc::new(
                EnvironmentCredential::create(TokenCredentialOptions::default())
                    .map_err(|e| Error::Auth(e.to_string()))?,
            ),
            AmbientSource::AppService => Arc::new(
                AppServiceManagedIdentityCredential::create(TokenCredentialOptions::default())
                    .map_err(|e| Error::Auth(e.to_string()))?,
            ),
            AmbientSource::VirtualMachine => Arc::new(
                VirtualMachineManagedIdentityCredential::new(TokenCredentialOptions::default()),
            ),
            AmbientSource::AzureCli => Arc::new(AzureCliCredential::new()),
        };
        Ok(credential)
    }
}

#[async_trait]
impl CredentialSource<Arc<dyn TokenCredential>> for AmbientSource {
    fn name(&self) -> &'static str {
        match self {
            AmbientSource::Environment => "environment",
            AmbientSource::AppService => "app-service-managed-identity",
            AmbientSource::VirtualMachine => "vm-managed-identity",
            AmbientSource::AzureCli => "azure-cli",
        }
    }

    async fn acquire(&self) -> Result<Arc<dyn TokenCredential>> {
        let credential = self.credential()?;
        credential
            .get_token(&[STORAGE_SCOPE])
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;
        Ok(credential)
    }
}

/// The ambient chain in its fixed order
pub fn ambient_sources() -> Vec<Box<dyn CredentialSource<Arc<dyn TokenCredential>>>> {
    AmbientSource::ORDER
        .into_iter()
        .map(|source| Box::new(source) as Box<dyn CredentialSource<Arc<dyn TokenCredential>>>)
        .collect()
}

/// Obtain a credential from the first ambient source that works
pub async fn ambient_credential() -> Result<Arc<dyn TokenCredential>> {
    first_available(&ambient_sources()).await
}
