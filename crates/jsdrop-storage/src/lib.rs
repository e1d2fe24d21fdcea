//! jsdrop Storage Library
//!
//! This crate provides the storage abstraction for accepted uploads: the
//! `Storage` trait, its S3 and local filesystem backends, and storage key
//! generation.
//!
//! # Storage key format
//!
//! Keys are flat: `{basename}-{receipt_millis}{extension}`, e.g.
//! `bundle-1700000000000.js`. Key generation lives in the `keys` module so all
//! backends stay consistent. Backends only ever create objects; writing to a key
//! that already exists fails with `StorageError::AlreadyExists`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use jsdrop_core::StorageBackend;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
