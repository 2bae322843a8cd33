//! Streaming AES-256-CBC encryption with PKCS#7 padding.
//!
//! Artifacts carry no header or magic number.  Layout of an encrypted
//! stream:
//!
//! ```text
//! IvMode::Derived  [ ciphertext ]
//! IvMode::Random   [ 16-byte IV | ciphertext ]
//! ```
//!
//! Data is processed in `CHUNK_SIZE` pieces so memory use does not grow
//! with the size of the input.

use std::io::{self, ErrorKind, Read, Write};

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::keys::{DerivedKey, IV_LEN};
use crate::errors::{Result, VaultError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Amount of plaintext read per step (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Where the CBC initialization vector comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IvMode {
    /// IV is the first 16 bytes of the password-derived key.  Every file
    /// under one password shares it.  This is the legacy artifact format.
    #[default]
    Derived,
    /// A fresh random IV is generated per file and written in front of
    /// the ciphertext.
    Random,
}

/// Encrypt everything from `reader` into `writer`.
///
/// Returns the number of bytes written, including a random IV prefix.
pub fn encrypt_stream<R: Read, W: Write>(
    key: &DerivedKey,
    mode: IvMode,
    mut reader: R,
    mut writer: W,
) -> Result<u64> {
    let mut written = 0u64;
    let iv = match mode {
        IvMode::Derived => Zeroizing::new(*key.iv()),
        IvMode::Random => {
            let mut iv = Zeroizing::new([0u8; IV_LEN]);
            rand::rng().fill_bytes(iv.as_mut_slice());
            writer.write_all(iv.as_slice())?;
            written += IV_LEN as u64;
            iv
        }
    };

    let mut cipher = Aes256CbcEnc::new_from_slices(key.key(), iv.as_slice())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // One spare block so the final padded block always fits.
    let mut buf = Zeroizing::new(vec![0u8; CHUNK_SIZE + BLOCK_LEN]);
    let mut filled = 0;

    loop {
        let n = read_some(&mut reader, &mut buf[filled..CHUNK_SIZE])?;
        if n == 0 {
            break;
        }
        filled += n;

        let whole = filled - filled % BLOCK_LEN;
        for block in buf[..whole].chunks_exact_mut(BLOCK_LEN) {
            cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        writer.write_all(&buf[..whole])?;
        written += whole as u64;

        buf.copy_within(whole..filled, 0);
        filled -= whole;
    }

    let tail = cipher
        .encrypt_padded_mut::<Pkcs7>(&mut buf[..], filled)
        .map_err(|_| VaultError::EncryptionFailed("padding does not fit the buffer".into()))?;
    writer.write_all(tail)?;
    written += tail.len() as u64;

    writer.flush()?;
    Ok(written)
}

/// Decrypt everything from `reader` into `writer`.
///
/// Fails with `DecryptionFailed` when the ciphertext is not a whole number
/// of blocks or the final block's padding is invalid.  A wrong key whose
/// output happens to end in valid padding is not detected.
///
/// Returns the number of plaintext bytes written.
pub fn decrypt_stream<R: Read, W: Write>(
    key: &DerivedKey,
    mode: IvMode,
    mut reader: R,
    mut writer: W,
) -> Result<u64> {
    let iv = match mode {
        IvMode::Derived => Zeroizing::new(*key.iv()),
        IvMode::Random => {
            let mut iv = Zeroizing::new([0u8; IV_LEN]);
            reader.read_exact(iv.as_mut_slice()).map_err(|e| {
                if e.kind() == ErrorKind::UnexpectedEof {
                    VaultError::DecryptionFailed
                } else {
                    VaultError::Io(e)
                }
            })?;
            iv
        }
    };

    let mut cipher = Aes256CbcDec::new_from_slices(key.key(), iv.as_slice())
        .map_err(|_| VaultError::DecryptionFailed)?;

    let mut buf = Zeroizing::new(vec![0u8; CHUNK_SIZE + BLOCK_LEN]);
    let mut filled = 0;
    let mut written = 0u64;

    loop {
        let n = read_some(&mut reader, &mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled <= BLOCK_LEN {
            continue;
        }

        // Hold back the last block; its padding can only be removed at EOF.
        let ready = (filled - 1) / BLOCK_LEN * BLOCK_LEN;
        for block in buf[..ready].chunks_exact_mut(BLOCK_LEN) {
            cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        writer.write_all(&buf[..ready])?;
        written += ready as u64;

        buf.copy_within(ready..filled, 0);
        filled -= ready;
    }

    if filled != BLOCK_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let tail = cipher
        .decrypt_padded_mut::<Pkcs7>(&mut buf[..BLOCK_LEN])
        .map_err(|_| VaultError::DecryptionFailed)?;
    writer.write_all(tail)?;
    written += tail.len() as u64;

    writer.flush()?;
    Ok(written)
}

/// `Read::read` that retries on `Interrupted`.
fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encrypt_bytes(key: &DerivedKey, mode: IvMode, plaintext: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encrypt_stream(key, mode, plaintext, &mut out).unwrap();
        out
    }

    fn decrypt_bytes(key: &DerivedKey, mode: IvMode, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        decrypt_stream(key, mode, ciphertext, &mut out)?;
        Ok(out)
    }

    /// Hands out at most `step` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn roundtrip_across_block_and_chunk_boundaries() {
        let key = DerivedKey::from_password("boundaries");
        for len in [
            0,
            1,
            15,
            16,
            17,
            CHUNK_SIZE - 1,
            CHUNK_SIZE,
            CHUNK_SIZE + 1,
            3 * CHUNK_SIZE + 5,
        ] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let ciphertext = encrypt_bytes(&key, IvMode::Derived, &plaintext);
            assert_eq!(ciphertext.len(), (len / BLOCK_LEN + 1) * BLOCK_LEN, "len {len}");
            let recovered = decrypt_bytes(&key, IvMode::Derived, &ciphertext).unwrap();
            assert_eq!(recovered, plaintext, "len {len}");
        }
    }

    #[test]
    fn matches_nist_cbc_aes256_vector() {
        // NIST SP 800-38A, F.2.5 CBC-AES256.Encrypt, first block.
        let key: [u8; 32] = hex::decode(
            "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        )
        .unwrap()
        .try_into()
        .unwrap();
        let iv: [u8; 16] = hex::decode("000102030405060708090a0b0c0d0e0f")
            .unwrap()
            .try_into()
            .unwrap();
        let plaintext = hex::decode("6bc1bee22e409f96e93d7e117393172a").unwrap();

        let key = DerivedKey::from_parts(key, iv);
        let ciphertext = encrypt_bytes(&key, IvMode::Derived, &plaintext);

        assert_eq!(ciphertext.len(), 32, "full padding block appended");
        assert_eq!(
            hex::encode(&ciphertext[..16]),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6"
        );
    }

    #[test]
    fn small_reads_produce_same_ciphertext() {
        let key = DerivedKey::from_password("trickle");
        let plaintext: Vec<u8> = (0..1000u32).map(|i| (i * 7) as u8).collect();

        let expected = encrypt_bytes(&key, IvMode::Derived, &plaintext);
        let mut trickled = Vec::new();
        encrypt_stream(
            &key,
            IvMode::Derived,
            Trickle {
                data: &plaintext,
                step: 7,
            },
            &mut trickled,
        )
        .unwrap();
        assert_eq!(trickled, expected);

        let mut recovered = Vec::new();
        decrypt_stream(
            &key,
            IvMode::Derived,
            Trickle {
                data: &expected,
                step: 5,
            },
            &mut recovered,
        )
        .unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn derived_mode_is_deterministic() {
        let key = DerivedKey::from_password("same");
        let a = encrypt_bytes(&key, IvMode::Derived, b"hello vault");
        let b = encrypt_bytes(&key, IvMode::Derived, b"hello vault");
        assert_eq!(a, b);
    }

    #[test]
    fn random_mode_prefixes_iv_and_varies() {
        let key = DerivedKey::from_password("random");
        let a = encrypt_bytes(&key, IvMode::Random, b"hello vault");
        let b = encrypt_bytes(&key, IvMode::Random, b"hello vault");

        assert_eq!(a.len(), IV_LEN + BLOCK_LEN);
        assert_ne!(a, b);
        assert_eq!(decrypt_bytes(&key, IvMode::Random, &a).unwrap(), b"hello vault");
        assert_eq!(decrypt_bytes(&key, IvMode::Random, &b).unwrap(), b"hello vault");
    }

    #[test]
    fn wrong_key_fails_or_garbles() {
        let right = DerivedKey::from_password("right");
        let wrong = DerivedKey::from_password("wrong");
        let plaintext = b"the quick brown fox jumps over the lazy dog";

        let ciphertext = encrypt_bytes(&right, IvMode::Derived, plaintext);
        match decrypt_bytes(&wrong, IvMode::Derived, &ciphertext) {
            Err(VaultError::DecryptionFailed) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(garbage) => assert_ne!(garbage, plaintext),
        }
    }

    #[test]
    fn empty_ciphertext_fails() {
        let key = DerivedKey::from_password("empty");
        assert!(matches!(
            decrypt_bytes(&key, IvMode::Derived, &[]),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let key = DerivedKey::from_password("truncated");
        let ciphertext = encrypt_bytes(&key, IvMode::Derived, &[0x42; 40]);
        assert!(matches!(
            decrypt_bytes(&key, IvMode::Derived, &ciphertext[..ciphertext.len() - 3]),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn random_mode_short_input_fails() {
        let key = DerivedKey::from_password("short");
        assert!(matches!(
            decrypt_bytes(&key, IvMode::Random, &[0u8; 10]),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn iv_mode_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: IvMode,
        }
        let w: Wrapper = toml::from_str("mode = \"random\"").unwrap();
        assert_eq!(w.mode, IvMode::Random);
        let w: Wrapper = toml::from_str("mode = \"derived\"").unwrap();
        assert_eq!(w.mode, IvMode::Derived);
    }
}
