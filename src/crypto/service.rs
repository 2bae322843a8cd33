//! File-level encryption bound to one password.
//!
//! `EncryptionService` resolves where an artifact goes, then streams the
//! input file through `encryption::{encrypt_stream, decrypt_stream}`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::encryption::{decrypt_stream, encrypt_stream, IvMode};
use super::keys::DerivedKey;
use crate::errors::{Result, VaultError};

/// Suffix appended to encrypted artifacts when no name is given.
pub const DEFAULT_ENCRYPTED_SUFFIX: &str = ".enc";

/// Parameters for one encrypt or decrypt call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOperationRequest {
    /// File to read.  Must exist.
    pub input_path: PathBuf,
    /// Output directory.  Defaults to the input file's directory.
    pub output_dir: Option<PathBuf>,
    /// Output file name.  Defaults to a name derived from the input.
    pub output_file_name: Option<String>,
}

impl FileOperationRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = Some(name.into());
        self
    }
}

/// Encrypts and decrypts files with a key derived from one password.
#[derive(Debug)]
pub struct EncryptionService {
    key: DerivedKey,
    iv_mode: IvMode,
    suffix: String,
}

impl EncryptionService {
    /// Bind a service to `password` using the legacy derived-IV format.
    pub fn new(password: &str) -> Self {
        Self::with_options(password, IvMode::default(), DEFAULT_ENCRYPTED_SUFFIX)
    }

    /// Bind a service to `password` with an explicit IV mode and suffix.
    pub fn with_options(password: &str, iv_mode: IvMode, suffix: &str) -> Self {
        Self {
            key: DerivedKey::from_password(password),
            iv_mode,
            suffix: suffix.to_string(),
        }
    }

    pub fn iv_mode(&self) -> IvMode {
        self.iv_mode
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Encrypt `request.input_path` and return the path written.
    ///
    /// The output is created or overwritten; the input is left as is.
    /// If streaming fails the partially written output is removed.
    pub fn encrypt_file(&self, request: &FileOperationRequest) -> Result<PathBuf> {
        let file_name = input_file_name(&request.input_path)?;
        let output_name = match &request.output_file_name {
            Some(name) => name.clone(),
            None => format!("{file_name}{}", self.suffix),
        };
        let output = resolve_output_path(request, &output_name)?;

        debug!(input = %request.input_path.display(), output = %output.display(), "encrypting file");
        self.transform(&request.input_path, &output, |reader, writer| {
            encrypt_stream(&self.key, self.iv_mode, reader, writer)
        })?;

        Ok(output)
    }

    /// Decrypt `request.input_path` and return the path written.
    ///
    /// Without an explicit name the encrypted suffix is stripped from the
    /// input's name; a name without the suffix is used unchanged.
    pub fn decrypt_file(&self, request: &FileOperationRequest) -> Result<PathBuf> {
        let file_name = input_file_name(&request.input_path)?;
        let output_name = match &request.output_file_name {
            Some(name) => name.clone(),
            None => self.strip_suffix(&file_name).to_string(),
        };
        let output = resolve_output_path(request, &output_name)?;

        debug!(input = %request.input_path.display(), output = %output.display(), "decrypting file");
        self.transform(&request.input_path, &output, |reader, writer| {
            decrypt_stream(&self.key, self.iv_mode, reader, writer)
        })?;

        Ok(output)
    }

    /// Decrypt a file straight into memory.
    pub fn decrypt_to_vec(&self, input: &Path) -> Result<Vec<u8>> {
        let reader = open_input(input)?;
        let mut plaintext = Vec::new();
        decrypt_stream(&self.key, self.iv_mode, BufReader::new(reader), &mut plaintext)?;
        Ok(plaintext)
    }

    fn strip_suffix<'a>(&self, file_name: &'a str) -> &'a str {
        match file_name.strip_suffix(self.suffix.as_str()) {
            Some(stem) if !stem.is_empty() => stem,
            _ => file_name,
        }
    }

    fn transform<F>(&self, input: &Path, output: &Path, f: F) -> Result<()>
    where
        F: FnOnce(BufReader<File>, BufWriter<File>) -> Result<u64>,
    {
        let reader = open_input(input)?;

        // Opening the output truncates it, which would destroy the input
        // before it is read.
        if is_same_file(input, output)? {
            return Err(VaultError::OutputIsInput(output.to_path_buf()));
        }

        let writer = File::create(output)?;
        match f(BufReader::new(reader), BufWriter::new(writer)) {
            Ok(bytes) => {
                debug!(bytes, output = %output.display(), "stream complete");
                Ok(())
            }
            Err(e) => {
                // A partial artifact is never usable.
                if let Err(rm) = fs::remove_file(output) {
                    warn!(output = %output.display(), error = %rm, "could not remove partial output");
                }
                Err(e)
            }
        }
    }
}

/// Open an input file, mapping a missing file to `InputNotFound`.
fn open_input(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(VaultError::InputNotFound(path.to_path_buf()));
    }
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => VaultError::InputNotFound(path.to_path_buf()),
        _ => VaultError::Io(e),
    })
}

/// Base name of an existing input file.
fn input_file_name(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(VaultError::InputNotFound(path.to_path_buf()));
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| VaultError::InputNotFound(path.to_path_buf()))
}

/// Pick the output directory (explicit, else the input's directory, else
/// the working directory), create it, and join `file_name` onto it.
fn resolve_output_path(request: &FileOperationRequest, file_name: &str) -> Result<PathBuf> {
    let dir = match &request.output_dir {
        Some(dir) => dir.clone(),
        None => match request.input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::current_dir()?,
        },
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "created output directory");
    }

    Ok(dir.join(file_name))
}

fn is_same_file(a: &Path, b: &Path) -> Result<bool> {
    if !b.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}
