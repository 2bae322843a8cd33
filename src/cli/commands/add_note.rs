//! `thevault add-note` — encrypt a short text note and track it.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `add-note` command.
pub fn execute(
    cli: &Cli,
    text: Option<&str>,
    output_dir: Option<&str>,
    name: Option<&str>,
) -> Result<()> {
    // Determine the note text from one of three sources.
    let note = if let Some(t) = text {
        // Source 1: Inline text on the command line.
        output::warning("Note provided on command line — it may appear in shell history.");
        Zeroizing::new(t.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input.
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim_end().to_string())
    } else {
        // Source 3: Interactive prompt.
        Zeroizing::new(
            dialoguer::Input::<String>::new()
                .with_prompt("Note")
                .interact_text()
                .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?,
        )
    };

    let mut vault = open_vault(cli)?;
    let artifact = vault.add_note(&note, output_dir.map(Path::new), name)?;

    output::success(&format!(
        "Note saved to {} ({} tracked)",
        artifact.display(),
        vault.notes().len()
    ));
    output::tip("Read it back with `thevault notes`.");

    Ok(())
}
