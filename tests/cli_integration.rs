//! Integration tests for the TheVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The password is supplied through `THEVAULT_PASSWORD` so no test
//! ever reaches an interactive prompt.

use std::fs;

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "correct-horse";

/// Helper: get a Command pointing at the thevault binary.
fn thevault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("thevault").expect("binary should exist")
}

/// Helper: a command running inside `tmp` with the vault in `tmp/vault`.
fn in_vault(tmp: &TempDir, password: &str) -> Command {
    let mut cmd = thevault();
    cmd.current_dir(tmp.path())
        .env("THEVAULT_PASSWORD", password)
        .env_remove("THEVAULT_LOG")
        .env_remove("THEVAULT_NEW_PASSWORD")
        .args(["--vault-dir", "vault"]);
    cmd
}

// ---------------------------------------------------------------------------
// Help and completions
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    thevault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Password-protected local vault"))
        .stdout(predicate::str::contains("add-file"))
        .stdout(predicate::str::contains("decrypt"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add-note"))
        .stdout(predicate::str::contains("notes"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("change-password"));
}

#[test]
fn no_args_shows_help() {
    thevault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn completions_for_bash() {
    thevault()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("thevault"));
}

#[test]
fn completions_for_unknown_shell_fails() {
    thevault()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'csh'"));
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn add_file_then_decrypt_restores_contents() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("secret.txt"), "launch codes").unwrap();

    in_vault(&tmp, PASSWORD)
        .args(["add-file", "secret.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("secret.txt.enc"));

    assert!(tmp.path().join("secret.txt.enc").is_file());
    fs::remove_file(tmp.path().join("secret.txt")).unwrap();

    in_vault(&tmp, PASSWORD)
        .args(["decrypt", "secret.txt.enc"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(tmp.path().join("secret.txt")).unwrap(),
        "launch codes"
    );
}

#[test]
fn add_file_records_absolute_path_in_manifest() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "a").unwrap();

    in_vault(&tmp, PASSWORD)
        .args(["add-file", "a.txt", "-o", "out", "-n", "renamed.bin"])
        .assert()
        .success();

    let raw = fs::read_to_string(tmp.path().join("vault").join("vault.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let tracked = manifest["encryptedFiles"][0].as_str().unwrap();

    assert!(std::path::Path::new(tracked).is_absolute());
    assert!(tracked.ends_with("renamed.bin"));
    assert!(tmp.path().join("out").join("renamed.bin").is_file());
    assert_eq!(manifest["passwordHash"].as_str().unwrap().len(), 64);
}

#[test]
fn list_shows_tracked_files() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("report.pdf"), "%PDF").unwrap();

    in_vault(&tmp, PASSWORD)
        .args(["add-file", "report.pdf"])
        .assert()
        .success();

    in_vault(&tmp, PASSWORD)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("report.pdf.enc"));
}

#[test]
fn add_file_missing_input_fails() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp, PASSWORD)
        .args(["add-file", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[test]
fn add_note_then_notes_prints_text() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp, PASSWORD)
        .args(["add-note", "buy milk"])
        .assert()
        .success();

    assert!(tmp.path().join("vault").join("notes").is_dir());

    in_vault(&tmp, PASSWORD)
        .arg("notes")
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"));
}

#[test]
fn add_note_reads_piped_stdin() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp, PASSWORD)
        .arg("add-note")
        .write_stdin("from a pipe\n")
        .assert()
        .success();

    in_vault(&tmp, PASSWORD)
        .arg("notes")
        .assert()
        .success()
        .stdout(predicate::str::contains("from a pipe"));
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_is_rejected() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp, PASSWORD).arg("stats").assert().success();

    in_vault(&tmp, "not-the-password")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password"));
}

#[test]
fn change_password_reads_new_password_from_its_own_variable() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp, PASSWORD).arg("stats").assert().success();

    in_vault(&tmp, PASSWORD)
        .env("THEVAULT_NEW_PASSWORD", "battery-staple")
        .arg("change-password")
        .assert()
        .success()
        .stdout(predicate::str::contains("Master password changed"));

    in_vault(&tmp, PASSWORD).arg("list").assert().failure();
    in_vault(&tmp, "battery-staple").arg("list").assert().success();
}

#[test]
fn change_password_without_new_variable_fails() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp, PASSWORD).arg("stats").assert().success();

    in_vault(&tmp, PASSWORD)
        .env_remove("THEVAULT_NEW_PASSWORD")
        .arg("change-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("THEVAULT_NEW_PASSWORD"));

    in_vault(&tmp, PASSWORD).arg("list").assert().success();
}

#[test]
fn change_password_to_current_password_fails() {
    let tmp = TempDir::new().unwrap();
    in_vault(&tmp, PASSWORD).arg("stats").assert().success();

    in_vault(&tmp, PASSWORD)
        .env("THEVAULT_NEW_PASSWORD", PASSWORD)
        .arg("change-password")
        .assert()
        .failure()
        .stderr(predicate::str::contains("same as the current"));
}

#[test]
fn short_first_password_is_rejected() {
    let tmp = TempDir::new().unwrap();

    in_vault(&tmp, "short")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));

    assert!(!tmp.path().join("vault").join("vault.json").exists());
}

#[test]
fn corrupt_manifest_fails_loudly() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("vault")).unwrap();
    fs::write(tmp.path().join("vault").join("vault.json"), "{ broken").unwrap();

    in_vault(&tmp, PASSWORD)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));

    assert_eq!(
        fs::read_to_string(tmp.path().join("vault").join("vault.json")).unwrap(),
        "{ broken"
    );
}

// ---------------------------------------------------------------------------
// Stats and config
// ---------------------------------------------------------------------------

#[test]
fn stats_reports_locations_and_missing_artifacts() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("gone.txt"), "x").unwrap();
    fs::write(tmp.path().join("kept.txt"), "y").unwrap();

    for file in ["gone.txt", "kept.txt"] {
        in_vault(&tmp, PASSWORD)
            .args(["add-file", file])
            .assert()
            .success();
    }
    in_vault(&tmp, PASSWORD)
        .args(["add-note", "hello", "-n", "hello.enc"])
        .assert()
        .success();
    fs::remove_file(tmp.path().join("gone.txt.enc")).unwrap();

    in_vault(&tmp, PASSWORD)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted files"))
        .stdout(predicate::str::contains("kept.txt.enc"))
        .stdout(predicate::str::contains("Notes"))
        .stdout(predicate::str::contains("hello.enc"))
        .stderr(predicate::str::contains("gone.txt.enc"));
}

#[test]
fn config_file_sets_vault_dir_and_suffix() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".thevault.toml"),
        "vault_dir = \"private\"\nencrypted_suffix = \".locked\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("doc.txt"), "doc").unwrap();

    thevault()
        .current_dir(tmp.path())
        .env("THEVAULT_PASSWORD", PASSWORD)
        .args(["add-file", "doc.txt"])
        .assert()
        .success();

    assert!(tmp.path().join("doc.txt.locked").is_file());
    assert!(tmp.path().join("private").join("vault.json").is_file());
}
