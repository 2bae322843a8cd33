//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::VaultStats;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of tracked files (Name, Location, On disk).
pub fn print_files_table(paths: &[String]) {
    if paths.is_empty() {
        info("No encrypted files in this vault yet.");
        tip("Run `thevault add-file <PATH>` to encrypt your first file.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Location", "On disk"]);

    for p in paths {
        let path = Path::new(p);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.clone());
        let location = path
            .parent()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        let on_disk = if path.exists() { "yes" } else { "missing" };
        table.add_row(vec![name, location, on_disk.to_string()]);
    }

    println!("{table}");
}

/// Print the statistics table, the location of every tracked artifact,
/// and a warning for each one missing from disk.
pub fn print_stats(stats: &VaultStats) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Tracked", "Missing"]);
    table.add_row(vec![
        "Encrypted files".to_string(),
        stats.encrypted_files.to_string(),
        stats.missing_files.len().to_string(),
    ]);
    table.add_row(vec![
        "Notes".to_string(),
        stats.notes.to_string(),
        stats.missing_notes.len().to_string(),
    ]);
    println!("{table}");

    print_locations("Encrypted files", &stats.file_paths);
    print_locations("Notes", &stats.note_paths);

    for p in stats.missing_files.iter().chain(&stats.missing_notes) {
        warning(&format!("Missing on disk: {p}"));
    }
}

fn print_locations(heading: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    println!();
    println!("{}", style(heading).bold());
    for p in paths {
        println!("  {p}");
    }
}
