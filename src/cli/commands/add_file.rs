//! `thevault add-file` — encrypt a file and track the artifact.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

use super::file_request;

/// Execute the `add-file` command.
pub fn execute(cli: &Cli, path: &str, output_dir: Option<&str>, name: Option<&str>) -> Result<()> {
    let request = file_request(path, output_dir, name);
    let mut vault = open_vault(cli)?;

    let artifact = vault.encrypt(&request)?;

    output::success(&format!(
        "Encrypted {} -> {} ({} tracked)",
        path,
        artifact.display(),
        vault.encrypted_files().len()
    ));
    output::tip("The original file was left in place; delete it if you no longer need it.");

    Ok(())
}
