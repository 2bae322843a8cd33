//! `thevault stats` — counts of tracked artifacts and any missing from disk.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `stats` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let stats = vault.stats();

    output::info(&format!("Vault: {}", vault.repository().path().display()));
    output::print_stats(&stats);

    Ok(())
}
