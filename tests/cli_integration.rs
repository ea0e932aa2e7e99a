//! Integration tests for the TxVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! password comes from `TXVAULT_PASSWORD` and secrets are piped on stdin,
//! so nothing here needs a terminal.  `HOME` points at a temp dir so the
//! settings bootstrap never touches the real one.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the txvault binary, isolated in `home`.
fn txvault(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("txvault").expect("binary should exist");
    cmd.env("HOME", home.path())
        .env("TXVAULT_PASSWORD", "hunter2")
        .env_remove("RUST_LOG");
    cmd
}

fn db(home: &TempDir) -> String {
    home.child("db.bin").path().to_str().unwrap().to_string()
}

fn add(home: &TempDir, title: &str, secret: &str) {
    txvault(home)
        .args(["-f", &db(home), "add", "--yes", "--title", title])
        .write_stdin(format!("{secret}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(title));
}

#[test]
fn help_flag_shows_usage() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("append-only transaction log"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("change"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn version_flag_shows_version() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("txvault"));
}

#[test]
fn no_args_shows_help() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn aes_and_des_are_mutually_exclusive() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .args(["--aes", "--des", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn list_on_missing_file_is_empty() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .args(["-f", &db(&home), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries"));

    home.child("db.bin").assert(predicate::path::exists());
}

#[test]
fn default_settings_are_bootstrapped() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .args(["-f", &db(&home), "list"])
        .assert()
        .success();

    home.child(".config/txvault/settings.toml")
        .assert(predicate::str::contains("cipher = \"auto\""));
}

#[test]
fn explicit_missing_config_is_not_created() {
    let home = TempDir::new().unwrap();
    let config = home.child("custom.toml");
    txvault(&home)
        .args(["-c", config.path().to_str().unwrap(), "-f", &db(&home), "list"])
        .assert()
        .success();

    config.assert(predicate::path::missing());
}

#[test]
fn add_list_view_delete() {
    let home = TempDir::new().unwrap();
    add(&home, "email", "p@ss");
    add(&home, "bank", "1234");

    txvault(&home)
        .args(["-f", &db(&home), "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"email\""))
        .stdout(predicate::str::contains("\"secret\": \"1234\""));

    txvault(&home)
        .args(["-f", &db(&home), "view", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bank"))
        .stdout(predicate::str::contains("1234"));

    txvault(&home)
        .args(["-f", &db(&home), "delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 remaining"));

    txvault(&home)
        .args(["-f", &db(&home), "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email").not())
        .stdout(predicate::str::contains("bank"));

    txvault(&home)
        .args(["-f", &db(&home), "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 transaction(s)"));
}

#[test]
fn change_title_by_number() {
    let home = TempDir::new().unwrap();
    add(&home, "email", "p@ss");

    txvault(&home)
        .args(["-f", &db(&home), "change", "1", "--title", "mail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mail"));

    txvault(&home)
        .args(["-f", &db(&home), "view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mail"))
        .stdout(predicate::str::contains("p@ss"));
}

#[test]
fn change_requires_a_field() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .args(["-f", &db(&home), "change", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn view_missing_entry_fails() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .args(["-f", &db(&home), "view", "no-such-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn wrong_password_fails() {
    let home = TempDir::new().unwrap();
    add(&home, "email", "p@ss");

    txvault(&home)
        .env("TXVAULT_PASSWORD", "not-it")
        .args(["-f", &db(&home), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong password"));
}

#[test]
fn unsupported_tag_fails() {
    let home = TempDir::new().unwrap();
    home.child("db.bin").write_binary(&[0x42; 33]).unwrap();

    txvault(&home)
        .args(["-f", &db(&home), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0x42"));
}

#[test]
fn des_flag_writes_des_tag() {
    let home = TempDir::new().unwrap();
    txvault(&home)
        .args(["--des", "-f", &db(&home), "add", "--yes", "--title", "t"])
        .write_stdin("s\n")
        .assert()
        .success();

    let raw = std::fs::read(home.child("db.bin").path()).unwrap();
    assert_eq!(raw[0], 0x00);

    txvault(&home)
        .args(["--aes", "-f", &db(&home), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cipher mismatch"));
}
