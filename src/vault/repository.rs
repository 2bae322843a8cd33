//! `VaultRepository` owns the manifest and persists every change.
//!
//! The repository is constructed once per vault directory.  It loads the
//! manifest on construction and rewrites it after each mutation, so
//! callers never have a separate save step to forget.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::crypto::hash::{HashService, Sha256HashService};
use crate::errors::Result;

use super::manifest::{read_manifest, write_manifest, VaultManifest};

/// File name of the manifest inside a vault directory.
pub const MANIFEST_FILE_NAME: &str = "vault.json";

/// Persistent record of the password hash and tracked artifacts.
#[derive(Debug)]
pub struct VaultRepository<H = Sha256HashService> {
    path: PathBuf,
    manifest: VaultManifest,
    hasher: H,
}

impl VaultRepository {
    /// Open the manifest in `vault_dir`, or start empty if there is none.
    pub fn open(vault_dir: &Path) -> Result<Self> {
        Self::with_hasher(vault_dir.join(MANIFEST_FILE_NAME), Sha256HashService)
    }
}

impl<H: HashService> VaultRepository<H> {
    /// Open the manifest file at `manifest_path` using `hasher`.
    pub fn with_hasher(manifest_path: impl Into<PathBuf>, hasher: H) -> Result<Self> {
        let path = manifest_path.into();
        let manifest = read_manifest(&path)?;
        debug!(
            path = %path.display(),
            files = manifest.encrypted_files.len(),
            notes = manifest.notes.len(),
            "loaded manifest"
        );
        Ok(Self {
            path,
            manifest,
            hasher,
        })
    }

    // ------------------------------------------------------------------
    // Password
    // ------------------------------------------------------------------

    /// `true` once a master password has been stored.
    pub fn password_exists(&self) -> bool {
        !self.manifest.password_hash.trim().is_empty()
    }

    /// Hash `password`, replace the stored hash, and persist.
    ///
    /// Used both for first-time setup and for changing the password.
    pub fn save_password_hash(&mut self, password: &str) -> Result<()> {
        let hash = self.hasher.hash_password(password);
        let previous = std::mem::replace(&mut self.manifest.password_hash, hash);
        if let Err(e) = self.save() {
            self.manifest.password_hash = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Check `password` against the stored hash.  `false` when no hash is
    /// stored.
    pub fn verify_password(&self, password: &str) -> bool {
        self.password_exists()
            && self
                .hasher
                .verify_password(password, &self.manifest.password_hash)
    }

    // ------------------------------------------------------------------
    // Tracked artifacts
    // ------------------------------------------------------------------

    /// Track an encrypted file.  Already-tracked paths are left alone.
    pub fn add_encrypted_file(&mut self, path: &str) -> Result<()> {
        self.track(List::EncryptedFiles, path)
    }

    /// Track an encrypted note.  Already-tracked paths are left alone.
    pub fn add_note(&mut self, path: &str) -> Result<()> {
        self.track(List::Notes, path)
    }

    /// Tracked encrypted files, in insertion order.
    pub fn encrypted_files(&self) -> &[String] {
        &self.manifest.encrypted_files
    }

    /// Tracked notes, in insertion order.
    pub fn notes(&self) -> &[String] {
        &self.manifest.notes
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &VaultManifest {
        &self.manifest
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn track(&mut self, list: List, path: &str) -> Result<()> {
        let entries = match list {
            List::EncryptedFiles => &mut self.manifest.encrypted_files,
            List::Notes => &mut self.manifest.notes,
        };
        if entries.iter().any(|p| p == path) {
            debug!(path, ?list, "already tracked");
            return Ok(());
        }
        entries.push(path.to_string());

        // Keep memory and disk in step if the write fails.
        if let Err(e) = self.save() {
            match list {
                List::EncryptedFiles => self.manifest.encrypted_files.pop(),
                List::Notes => self.manifest.notes.pop(),
            };
            return Err(e);
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        write_manifest(&self.path, &self.manifest)?;
        debug!(path = %self.path.display(), "manifest saved");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum List {
    EncryptedFiles,
    Notes,
}
