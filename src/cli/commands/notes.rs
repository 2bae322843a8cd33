//! `thevault notes` — decrypt and print every tracked note.
//!
//! A note that cannot be read is reported and skipped; the rest are
//! still shown.

use console::style;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `notes` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let notes = vault.notes();

    if notes.is_empty() {
        output::info("No notes in this vault yet.");
        output::tip("Run `thevault add-note <TEXT>` to add one.");
        return Ok(());
    }

    let mut failed = 0usize;
    for path in notes {
        match vault.read_note(path) {
            Ok(text) => {
                println!("{}", style(path).bold());
                println!("{text}");
                println!();
            }
            Err(e) => {
                failed += 1;
                output::warning(&format!("{path}: {e}"));
            }
        }
    }

    if failed > 0 {
        output::info(&format!(
            "{} of {} note(s) could not be read",
            failed,
            notes.len()
        ));
    }

    Ok(())
}
