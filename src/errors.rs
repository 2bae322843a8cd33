use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in TheVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Refusing to overwrite the input file {0}")]
    OutputIsInput(PathBuf),

    // --- Manifest errors ---
    #[error("Vault manifest at {path} is corrupt: {reason}")]
    ManifestCorrupt { path: PathBuf, reason: String },

    #[error("Wrong password")]
    WrongPassword,

    #[error("New password is the same as the current one")]
    PasswordUnchanged,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for TheVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
