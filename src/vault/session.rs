//! The operations a front end needs, in one place.
//!
//! `Vault` pairs a `VaultRepository` with an `EncryptionService` bound to
//! the authenticated password, so every artifact it produces is recorded
//! in the manifest as soon as it exists.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zeroize::Zeroize;

use crate::crypto::{EncryptionService, FileOperationRequest, IvMode, DEFAULT_ENCRYPTED_SUFFIX};
use crate::errors::{Result, VaultError};

use super::repository::VaultRepository;

/// How `Vault::authenticate` got in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// No password was stored; this one has been saved.
    Created,
    /// The password matched the stored hash.
    Unlocked,
}

/// Session-wide choices, usually built from `Settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub iv_mode: IvMode,
    pub encrypted_suffix: String,
    /// Where new notes go when no directory is given.
    pub notes_dir: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            iv_mode: IvMode::default(),
            encrypted_suffix: DEFAULT_ENCRYPTED_SUFFIX.to_string(),
            notes_dir: PathBuf::from("notes"),
        }
    }
}

/// Counts, locations and missing-on-disk paths for the `stats` view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultStats {
    pub encrypted_files: usize,
    pub notes: usize,
    pub file_paths: Vec<String>,
    pub note_paths: Vec<String>,
    pub missing_files: Vec<String>,
    pub missing_notes: Vec<String>,
}

/// An unlocked vault.
#[derive(Debug)]
pub struct Vault {
    repo: VaultRepository,
    cipher: EncryptionService,
    notes_dir: PathBuf,
}

impl Vault {
    /// Unlock `repo` with `password`.
    ///
    /// On first use (no stored hash) the password is saved and the outcome
    /// is `Created`.  Afterwards a mismatch fails with `WrongPassword`.
    pub fn authenticate(
        mut repo: VaultRepository,
        password: &str,
        options: SessionOptions,
    ) -> Result<(Self, AuthOutcome)> {
        let outcome = if !repo.password_exists() {
            repo.save_password_hash(password)?;
            AuthOutcome::Created
        } else if repo.verify_password(password) {
            AuthOutcome::Unlocked
        } else {
            debug!(manifest = %repo.path().display(), "password rejected");
            return Err(VaultError::WrongPassword);
        };

        info!(manifest = %repo.path().display(), ?outcome, "vault unlocked");

        let cipher =
            EncryptionService::with_options(password, options.iv_mode, &options.encrypted_suffix);
        Ok((
            Self {
                repo,
                cipher,
                notes_dir: options.notes_dir,
            },
            outcome,
        ))
    }

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// Encrypt a file and track the artifact.
    pub fn encrypt(&mut self, request: &FileOperationRequest) -> Result<PathBuf> {
        let output = std::path::absolute(self.cipher.encrypt_file(request)?)?;
        self.repo.add_encrypted_file(&output.to_string_lossy())?;
        info!(artifact = %output.display(), "file encrypted");
        Ok(output)
    }

    /// Decrypt a file.  The plaintext output is not tracked.
    pub fn decrypt(&self, request: &FileOperationRequest) -> Result<PathBuf> {
        let output = self.cipher.decrypt_file(request)?;
        info!(output = %output.display(), "file decrypted");
        Ok(output)
    }

    pub fn encrypted_files(&self) -> &[String] {
        self.repo.encrypted_files()
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    /// Encrypt `text` as a note and track it.
    ///
    /// The text is staged in a uniquely named, owner-only temp file which
    /// is deleted whether or not encryption succeeds.  The default name is
    /// the temp file's name plus the encrypted suffix.
    pub fn add_note(
        &mut self,
        text: &str,
        output_dir: Option<&Path>,
        output_file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let mut staged = tempfile::Builder::new()
            .prefix("note-")
            .suffix(".txt")
            .tempfile()?;
        staged.write_all(text.as_bytes())?;
        staged.flush()?;

        let request = FileOperationRequest {
            input_path: staged.path().to_path_buf(),
            output_dir: Some(output_dir.unwrap_or(self.notes_dir.as_path()).to_path_buf()),
            output_file_name: output_file_name.map(str::to_string),
        };
        let encrypted = self.cipher.encrypt_file(&request);

        // Remove the plaintext before anything else can fail.
        staged.close()?;

        let output = std::path::absolute(encrypted?)?;
        self.repo.add_note(&output.to_string_lossy())?;
        info!(artifact = %output.display(), "note encrypted");
        Ok(output)
    }

    /// Decrypt a note into memory.
    ///
    /// Output that is not UTF-8 is treated as a failed decryption.
    pub fn read_note(&self, path: &str) -> Result<String> {
        let plaintext = self.cipher.decrypt_to_vec(Path::new(path))?;
        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::DecryptionFailed
        })
    }

    pub fn notes(&self) -> &[String] {
        self.repo.notes()
    }

    // ------------------------------------------------------------------
    // Password & stats
    // ------------------------------------------------------------------

    /// Store a new master password and use it for artifacts created from
    /// now on.  Existing artifacts are not re-encrypted.
    ///
    /// Fails with `PasswordUnchanged` if `new_password` is the current one.
    pub fn change_password(&mut self, new_password: &str) -> Result<()> {
        if self.repo.verify_password(new_password) {
            return Err(VaultError::PasswordUnchanged);
        }
        self.repo.save_password_hash(new_password)?;
        self.cipher = EncryptionService::with_options(
            new_password,
            self.cipher.iv_mode(),
            self.cipher.suffix(),
        );
        info!(manifest = %self.repo.path().display(), "master password changed");
        Ok(())
    }

    pub fn stats(&self) -> VaultStats {
        let missing = |paths: &[String]| -> Vec<String> {
            paths
                .iter()
                .filter(|p| !Path::new(p.as_str()).exists())
                .cloned()
                .collect()
        };
        VaultStats {
            encrypted_files: self.repo.encrypted_files().len(),
            notes: self.repo.notes().len(),
            file_paths: self.repo.encrypted_files().to_vec(),
            note_paths: self.repo.notes().to_vec(),
            missing_files: missing(self.repo.encrypted_files()),
            missing_notes: missing(self.repo.notes()),
        }
    }

    pub fn repository(&self) -> &VaultRepository {
        &self.repo
    }
}
