//! One-way password hashing for the vault manifest.
//!
//! The stored digest is uppercase hex of SHA-256 over a fixed
//! domain-separation prefix followed by the UTF-8 password.  The prefix
//! keeps the stored digest distinct from the file encryption key, which is
//! the bare SHA-256 of the password (see `keys`).

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Prefix hashed in front of every password.
const HASH_DOMAIN: &[u8] = b"thevault/password-hash/v1\0";

/// Hashing and verification of the master password.
///
/// Implementations must be total: every string, including the empty
/// string, hashes to a well-defined digest.
pub trait HashService {
    /// Hash `password` into the digest string stored in the manifest.
    fn hash_password(&self, password: &str) -> String;

    /// Returns `true` iff `hash_password(password)` matches `stored_hash`.
    fn verify_password(&self, password: &str, stored_hash: &str) -> bool;
}

/// SHA-256 based `HashService` used by the vault.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256HashService;

impl HashService for Sha256HashService {
    fn hash_password(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(HASH_DOMAIN);
        hasher.update(password.as_bytes());
        hex::encode_upper(hasher.finalize())
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let actual = self.hash_password(password);
        let expected = stored_hash.trim().to_ascii_uppercase();

        // Lengths are public (always 64 hex chars), the bytes are not.
        actual.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}
