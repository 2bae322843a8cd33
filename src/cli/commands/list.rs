//! `thevault list` — display tracked encrypted files in a table.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let files = vault.encrypted_files();

    output::info(&format!("{} encrypted file(s)", files.len()));
    output::print_files_table(files);

    Ok(())
}
