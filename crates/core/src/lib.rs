//! blobup-core: Core library for the blobup folder uploader
//!
//! This crate provides the SDK-independent parts of blobup:
//! - Configuration resolution from flags and environment variables
//! - Source tree traversal and object key derivation
//! - Block transfer settings
//! - An ordered credential chain
//! - The ObjectStore trait and the folder uploader built on it
//!
//! Storage backends live in their own crates so the uploader can be tested
//! against a mock store.

pub mod config;
pub mod credential;
pub mod error;
pub mod key;
pub mod traits;
pub mod transfer;
pub mod uploader;
pub mod walk;

pub use config::{AuthMethod, Settings, UploadConfig};
pub use credential::{CredentialSource, first_available};
pub use error::{Error, Result};
pub use key::object_key;
pub use traits::{ObjectStore, UploadRecord};
pub use transfer::TransferOptions;
pub use uploader::{FolderUploader, PlannedUpload, Silent, UploadObserver, UploadSummary};
pub use walk::{SourceFile, SourceFiles};
