//! Vault module — manifest persistence and the unlocked session.
//!
//! This module provides:
//! - `VaultManifest` and its JSON file format (`manifest`)
//! - `VaultRepository`, the owner of the manifest (`repository`)
//! - `Vault`, the operations a front end drives (`session`)

pub mod manifest;
pub mod repository;
pub mod session;

// Re-export the most commonly used items.
pub use manifest::VaultManifest;
pub use repository::{VaultRepository, MANIFEST_FILE_NAME};
pub use session::{AuthOutcome, SessionOptions, Vault, VaultStats};
