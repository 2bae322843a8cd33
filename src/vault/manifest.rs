//! On-disk vault manifest.
//!
//! The manifest is a single pretty-printed JSON document:
//!
//! ```text
//! {
//!   "passwordHash": "<64 uppercase hex chars>",
//!   "encryptedFiles": ["/abs/path/report.pdf.enc", ...],
//!   "notes": ["/abs/path/notes/note-a1b2c3.txt.enc", ...]
//! }
//! ```
//!
//! Missing fields default to empty; unknown fields are ignored.  The
//! PascalCase names written by older releases are accepted on read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Password hash plus the paths of every tracked artifact.
///
/// Never holds plaintext, the password, or key material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VaultManifest {
    /// Hex digest of the master password; empty until first use.
    #[serde(alias = "PasswordHash")]
    pub password_hash: String,

    /// Encrypted files, in insertion order, without duplicates.
    #[serde(alias = "EncryptedFiles")]
    pub encrypted_files: Vec<String>,

    /// Encrypted notes, in insertion order, without duplicates.
    #[serde(alias = "Notes")]
    pub notes: Vec<String>,
}

/// Read the manifest at `path`.
///
/// A missing or blank file yields an empty manifest.  Anything that does
/// not parse is `ManifestCorrupt`; the file is left as it is.
pub fn read_manifest(path: &Path) -> Result<VaultManifest> {
    if !path.exists() {
        return Ok(VaultManifest::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => VaultError::ManifestCorrupt {
            path: path.to_path_buf(),
            reason: "not valid UTF-8".into(),
        },
        _ => VaultError::Io(e),
    })?;

    if contents.trim().is_empty() {
        return Ok(VaultManifest::default());
    }

    serde_json::from_str(&contents).map_err(|e| VaultError::ManifestCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write the manifest to `path` **atomically**.
///
/// The document goes to a temp file in the same directory which is then
/// renamed over the target, so readers never see a half-written manifest.
pub fn write_manifest(path: &Path, manifest: &VaultManifest) -> Result<()> {
    let mut json = serde_json::to_string_pretty(manifest)
        .map_err(|e| VaultError::SerializationError(format!("manifest: {e}")))?;
    json.push('\n');

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, json.as_bytes())?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}
