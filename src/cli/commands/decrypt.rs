//! `thevault decrypt` — decrypt a file produced by `add-file` or `add-note`.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

use super::file_request;

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, path: &str, output_dir: Option<&str>, name: Option<&str>) -> Result<()> {
    let request = file_request(path, output_dir, name);
    let vault = open_vault(cli)?;

    let plain = vault.decrypt(&request)?;

    output::success(&format!("Decrypted {} -> {}", path, plain.display()));
    Ok(())
}
