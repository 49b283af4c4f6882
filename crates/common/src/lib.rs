//! Common types, resource names, and errors shared across `secret-fetch` crates.

pub mod checksum;
pub mod error;
pub mod resource;

pub use error::FetchError;
pub use resource::{CryptoKeyName, SecretVersionName, DEFAULT_KMS_LOCATION};
