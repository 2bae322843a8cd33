//! `thevault change-password` — replace the master password.
//!
//! Only the stored hash changes.  Artifacts already on disk stay
//! encrypted under the password that created them.
//!
//! Non-interactive use: `THEVAULT_PASSWORD` is the current password and
//! `THEVAULT_NEW_PASSWORD` the replacement.

use crate::cli::output;
use crate::cli::{open_vault, prompt_replacement_password, Cli};
use crate::errors::Result;

/// Execute the `change-password` command.
pub fn execute(cli: &Cli) -> Result<()> {
    output::info("Enter your current vault password.");
    let mut vault = open_vault(cli)?;

    output::info("Choose your new vault password.");
    let new_password = prompt_replacement_password()?;

    vault.change_password(&new_password)?;

    output::success("Master password changed");

    let existing = vault.encrypted_files().len() + vault.notes().len();
    if existing > 0 {
        output::warning(&format!(
            "{existing} existing artifact(s) still need the old password to decrypt"
        ));
    }

    Ok(())
}
