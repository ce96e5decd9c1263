use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("cookbook")
        .env("COOKBOOK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    assert!(!dir.path().join("logs").exists());
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("cookbook")
        .env("COOKBOOK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("[identity]"));
    assert!(contents.contains("# api_key ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("cookbook")
        .env("COOKBOOK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_show_masks_api_key() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("cookbook")
        .env("COOKBOOK_HOME", dir.path())
        .env("COOKBOOK_API_KEY", "AIzaSyD-very-secret-api-key")
        .env("COOKBOOK_IDENTITY_URL", "http://127.0.0.1:1")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url = \"http://127.0.0.1:1\""))
        .stdout(predicate::str::contains("AIzaSyD-very..."))
        .stdout(predicate::str::contains("very-secret-api-key").not());
}

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("cookbook")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("watch"));
}
