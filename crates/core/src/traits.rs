//! ObjectStore trait definition
//!
//! This trait defines the storage operations the uploader needs. It keeps the
//! orchestration logic independent of the Azure SDK.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::transfer::TransferOptions;

/// A file that was stored successfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    /// Local source path
    pub source: String,

    /// Destination object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: u64,

    /// Human-readable size
    pub size_human: String,
}

impl UploadRecord {
    pub fn new(source: &Path, key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            source: source.display().to_string(),
            key: key.into(),
            size_bytes,
            size_human: humansize::format_size(size_bytes, humansize::BINARY),
        }
    }
}

/// Trait for blob storage operations
///
/// Implemented by the Azure adapter and mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Request creation of a container
    ///
    /// Callers treat failures (including "already exists") as non-fatal.
    async fn create_container(&self, container: &str) -> Result<()>;

    /// Stream a local file to `container/key`
    ///
    /// The file is opened here and closed before returning, on success and
    /// on error alike.
    async fn upload_file(
        &self,
        container: &str,
        key: &str,
        source: &Path,
        options: &TransferOptions,
    ) -> Result<UploadRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_record_sizes() {
        let record = UploadRecord::new(Path::new("data/a.txt"), "docs/a.txt", 2048);
        assert_eq!(record.source, "data/a.txt");
        assert_eq!(record.key, "docs/a.txt");
        assert_eq!(record.size_bytes, 2048);
        assert_eq!(record.size_human, "2 KiB");
    }
}
