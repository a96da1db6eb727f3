//! Upload configuration
//!
//! Each setting comes from an explicit value (usually a command-line flag) or,
//! when that is empty, from a fixed environment variable. The merged values are
//! validated once and then borrowed read-only for the rest of the run.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable holding the storage account name
pub const ENV_STORAGE_ACCOUNT: &str = "AZURE_STORAGE_ACCOUNT";

/// Environment variable holding the container name
pub const ENV_CONTAINER: &str = "AZURE_STORAGE_CONTAINER";

/// Environment variable holding the sub-folder prefix
pub const ENV_SUBFOLDER: &str = "AZURE_STORAGE_SUBFOLDER";

/// Environment variable holding the local folder to upload
pub const ENV_LOCAL_FOLDER: &str = "LOCAL_FOLDER";

/// Environment variable holding the storage connection string
pub const ENV_CONNECTION_STRING: &str = "AZURE_STORAGE_CONNECTION_STRING";

/// Raw settings before validation
///
/// `None` means neither the explicit value nor its environment variable
/// provided a non-empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub storage_account: Option<String>,
    pub container: Option<String>,
    pub subfolder: Option<String>,
    pub local_folder: Option<String>,
    pub connection_string: Option<String>,
}

impl Settings {
    /// Merge explicit values with the process environment
    pub fn resolve(explicit: Settings) -> Self {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Merge explicit values with a custom environment lookup
    pub fn resolve_with<F>(explicit: Settings, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |value: Option<String>, name: &str| {
            non_empty(value).or_else(|| non_empty(env(name)))
        };

        Self {
            storage_account: pick(explicit.storage_account, ENV_STORAGE_ACCOUNT),
            container: pick(explicit.container, ENV_CONTAINER),
            subfolder: pick(explicit.subfolder, ENV_SUBFOLDER),
            local_folder: pick(explicit.local_folder, ENV_LOCAL_FOLDER),
            connection_string: pick(explicit.connection_string, ENV_CONNECTION_STRING),
        }
    }

    /// Validate the merged settings
    ///
    /// Checks run in a fixed order and stop at the first violation. Only a
    /// folder that is definitely missing is rejected here; any other stat
    /// failure is left for the traversal to report. The check is best effort:
    /// nothing prevents the folder from disappearing before the upload starts.
    pub fn validate(self) -> Result<UploadConfig> {
        let local_folder = self.local_folder.ok_or_else(|| {
            Error::Config(format!(
                "local folder is required (use --folder or {ENV_LOCAL_FOLDER} env var)"
            ))
        })?;

        let container = self.container.ok_or_else(|| {
            Error::Config(format!(
                "container name is required (use --container or {ENV_CONTAINER} env var)"
            ))
        })?;

        if self.storage_account.is_none() && self.connection_string.is_none() {
            return Err(Error::Config(format!(
                "either storage account name (use --account or {ENV_STORAGE_ACCOUNT} env var) \
                 or connection string (use --connection or {ENV_CONNECTION_STRING} env var) is required"
            )));
        }

        let local_folder = PathBuf::from(local_folder);
        if let Err(e) = std::fs::metadata(&local_folder)
            && e.kind() == io::ErrorKind::NotFound
        {
            return Err(Error::Config(format!(
                "local folder '{}' does not exist",
                local_folder.display()
            )));
        }

        Ok(UploadConfig {
            storage_account: self.storage_account,
            container,
            subfolder: self.subfolder,
            local_folder,
            connection_string: self.connection_string,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Validated upload job configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    storage_account: Option<String>,
    container: String,
    subfolder: Option<String>,
    local_folder: PathBuf,
    connection_string: Option<String>,
}

/// How the storage client authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod<'a> {
    /// Connection string carrying the account and its credentials
    ConnectionString(&'a str),
    /// Ambient identity chain against the named account
    Ambient { account: &'a str },
}

impl UploadConfig {
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn subfolder(&self) -> Option<&str> {
        self.subfolder.as_deref()
    }

    pub fn local_folder(&self) -> &Path {
        &self.local_folder
    }

    /// Authentication to use; a connection string wins over an account name
    pub fn auth(&self) -> AuthMethod<'_> {
        match self.connection_string.as_deref() {
            Some(conn) => AuthMethod::ConnectionString(conn),
            None => AuthMethod::Ambient {
                account: self.storage_account.as_deref().unwrap_or_default(),
            },
        }
    }
}
