//! Password-based key material for file encryption.
//!
//! The key is SHA-256 of the UTF-8 password and the IV is its first
//! 16 bytes.  Reusing one IV for every file under a password is a known
//! weakness of this legacy format; `IvMode::Random` avoids it at the cost
//! of a format change (see `encryption`).

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Length of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the AES-CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// A key/IV pair derived from a password.
///
/// The bytes are wiped from memory when the value is dropped.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl DerivedKey {
    /// Derive the key and IV from `password`.
    ///
    /// The same password always yields the same pair, which is what lets a
    /// file encrypted in one run be decrypted in a later one.
    pub fn from_password(password: &str) -> Self {
        let mut digest = Sha256::digest(password.as_bytes());

        // Fill in place so no stray copies of the key are left on the stack.
        let mut derived = Self {
            key: [0u8; KEY_LEN],
            iv: [0u8; IV_LEN],
        };
        derived.key.copy_from_slice(&digest);
        derived.iv.copy_from_slice(&digest[..IV_LEN]);

        digest.as_mut_slice().zeroize();
        derived
    }

    /// Build a key from explicit bytes (known-answer tests).
    #[cfg(test)]
    pub(crate) fn from_parts(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Raw key bytes.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// The password-derived IV (a prefix of the key).
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}
