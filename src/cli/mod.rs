//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{AuthOutcome, Vault, VaultRepository};

/// Minimum length for newly chosen passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable read before any interactive password prompt.
pub const PASSWORD_ENV: &str = "THEVAULT_PASSWORD";

/// Environment variable holding the replacement for `change-password`.
pub const NEW_PASSWORD_ENV: &str = "THEVAULT_NEW_PASSWORD";

/// TheVault CLI: password-protected file and note encryption.
#[derive(Parser)]
#[command(
    name = "thevault",
    about = "Password-protected local vault for files and notes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding vault.json (default: from .thevault.toml, else the current directory)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt a file and track it in the vault
    AddFile {
        /// File to encrypt
        path: String,
        /// Directory for the encrypted file (default: next to the input)
        #[arg(short, long)]
        output_dir: Option<String>,
        /// Name of the encrypted file (default: <input>.enc)
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Decrypt a file
    Decrypt {
        /// Encrypted file
        path: String,
        /// Directory for the decrypted file (default: next to the input)
        #[arg(short, long)]
        output_dir: Option<String>,
        /// Name of the decrypted file (default: input without its suffix)
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// List tracked encrypted files
    List,

    /// Encrypt a text note and track it in the vault
    AddNote {
        /// Note text (omit to read stdin or prompt)
        text: Option<String>,
        /// Directory for the note (default: the configured notes directory)
        #[arg(short, long)]
        output_dir: Option<String>,
        /// Name of the encrypted note
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Decrypt and show every tracked note
    Notes,

    /// Show counts and artifacts missing from disk
    Stats,

    /// Change the master password
    ChangePassword,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `THEVAULT_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(PASSWORD_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (first use of a vault).
///
/// Also respects `THEVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    match password_from_env(PASSWORD_ENV) {
        Some(pw) => check_length(pw),
        None => prompt_confirmed_password(),
    }
}

/// Prompt for the password that replaces the current one.
///
/// Scripted callers supply it in `THEVAULT_NEW_PASSWORD`; when only
/// `THEVAULT_PASSWORD` is set there is no way to tell the two apart, so
/// this fails instead of prompting.
pub fn prompt_replacement_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env(NEW_PASSWORD_ENV) {
        return check_length(pw);
    }
    if password_from_env(PASSWORD_ENV).is_some() {
        return Err(VaultError::CommandFailed(format!(
            "{PASSWORD_ENV} holds the current password; set {NEW_PASSWORD_ENV} to choose the new one"
        )));
    }
    prompt_confirmed_password()
}

fn prompt_confirmed_password() -> Result<Zeroizing<String>> {
    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose vault password")
                .with_confirmation(
                    "Confirm vault password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

fn check_length(pw: Zeroizing<String>) -> Result<Zeroizing<String>> {
    if pw.chars().count() < MIN_PASSWORD_LEN {
        return Err(VaultError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(pw)
}

fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Resolve the vault directory: `--vault-dir` wins over `.thevault.toml`.
pub fn vault_dir(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.vault_dir {
        Some(dir) => crate::config::settings::resolve_dir(&cwd, dir),
        None => settings.vault_dir(&cwd),
    })
}

/// Load settings, open the repository and authenticate.
///
/// A vault with no stored password asks for a new one (with
/// confirmation); otherwise the existing password is requested.
pub fn open_vault(cli: &Cli) -> Result<Vault> {
    let settings = Settings::load(&std::env::current_dir()?)?;
    let dir = vault_dir(cli, &settings)?;
    let repo = VaultRepository::open(&dir)?;

    let password = if repo.password_exists() {
        prompt_password()?
    } else {
        output::info("No master password set for this vault yet.");
        prompt_new_password()?
    };

    let (vault, outcome) = Vault::authenticate(repo, &password, settings.session_options(&dir))?;
    if outcome == AuthOutcome::Created {
        output::success(&format!(
            "Master password saved to {}",
            vault.repository().path().display()
        ));
    }
    Ok(vault)
}
