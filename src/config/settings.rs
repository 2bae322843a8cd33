use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{IvMode, DEFAULT_ENCRYPTED_SUFFIX};
use crate::errors::{Result, VaultError};
use crate::vault::{SessionOptions, MANIFEST_FILE_NAME};

/// Project-level configuration, loaded from `.thevault.toml`.
///
/// Every field has a sensible default so TheVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding `vault.json`.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Default directory for new notes, relative to the vault directory.
    #[serde(default = "default_notes_dir")]
    pub notes_dir: String,

    /// Suffix added to encrypted artifacts and stripped on decryption.
    #[serde(default = "default_encrypted_suffix")]
    pub encrypted_suffix: String,

    /// `derived` (legacy, IV taken from the key) or `random` (per-file IV).
    #[serde(default)]
    pub iv_mode: IvMode,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".".to_string()
}

fn default_notes_dir() -> String {
    "notes".to_string()
}

fn default_encrypted_suffix() -> String {
    DEFAULT_ENCRYPTED_SUFFIX.to_string()
}

// ── Implementation ───────────────────────────────────────────────────

/// Join `dir` onto `base`, dropping `.` components so `"."` resolves to
/// `base` itself.
pub fn resolve_dir(base: &Path, dir: &str) -> PathBuf {
    base.join(dir).components().collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            notes_dir: default_notes_dir(),
            encrypted_suffix: default_encrypted_suffix(),
            iv_mode: IvMode::default(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".thevault.toml";

    /// Load settings from `<project_dir>/.thevault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Absolute vault directory for a project.
    pub fn vault_dir(&self, project_dir: &Path) -> PathBuf {
        resolve_dir(project_dir, &self.vault_dir)
    }

    /// Full path to the manifest.
    ///
    /// Example: `project_dir/vault.json`
    pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
        self.vault_dir(project_dir).join(MANIFEST_FILE_NAME)
    }

    /// Convert the settings into session options for a vault directory.
    pub fn session_options(&self, vault_dir: &Path) -> SessionOptions {
        SessionOptions {
            iv_mode: self.iv_mode,
            encrypted_suffix: self.encrypted_suffix.clone(),
            notes_dir: resolve_dir(vault_dir, &self.notes_dir),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.encrypted_suffix.is_empty() {
            return Err(VaultError::ConfigError(
                "encrypted_suffix cannot be empty".into(),
            ));
        }
        if self.encrypted_suffix.contains(['/', '\\']) {
            return Err(VaultError::ConfigError(format!(
                "encrypted_suffix '{}' cannot contain path separators",
                self.encrypted_suffix
            )));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
