//! Cryptographic primitives for TheVault.
//!
//! This module provides:
//! - SHA-256 password hashing for the manifest (`hash`)
//! - Password-derived AES-256 key and IV (`keys`)
//! - Streaming AES-256-CBC encryption and decryption (`encryption`)
//! - File-level `EncryptionService` with output-path resolution (`service`)

pub mod encryption;
pub mod hash;
pub mod keys;
pub mod service;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{EncryptionService, FileOperationRequest, ...};
pub use encryption::{decrypt_stream, encrypt_stream, IvMode};
pub use hash::{HashService, Sha256HashService};
pub use keys::DerivedKey;
pub use service::{EncryptionService, FileOperationRequest, DEFAULT_ENCRYPTED_SUFFIX};
