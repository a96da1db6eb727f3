//! blobup-azure: Azure Blob Storage adapter for blobup
//!
//! This crate provides the implementation of the ObjectStore trait
//! using the azure_storage_blobs crate. It is the only crate that directly
//! depends on the Azure SDK.

pub mod client;
pub mod identity;
mod upload;

pub use client::AzureBlobClient;
