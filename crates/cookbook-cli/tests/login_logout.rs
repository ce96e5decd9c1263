//! Integration tests for login, signup, status, logout and watch against a
//! mock identity service.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Identity URL for commands that must not reach the network.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

fn cookbook(home: &TempDir, identity_url: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cookbook");
    cmd.env("COOKBOOK_HOME", home.path())
        .env("COOKBOOK_API_KEY", "test-key")
        .env("COOKBOOK_IDENTITY_URL", identity_url)
        .env_remove("COOKBOOK_PASSWORD");
    cmd
}

fn write_session(home: &TempDir, expiration: &str) {
    let record = json!({
        "email": "saved@x.com",
        "id": "uid-saved",
        "token": "saved-token-0123456789abcdef",
        "tokenExpirationDate": expiration,
    });
    fs::write(
        home.path().join("session.json"),
        serde_json::to_string(&record).unwrap(),
    )
    .unwrap();
}

async fn mount_success(server: &MockServer, endpoint: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{endpoint}")))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "email": "e@x.com",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "idToken": "id-token-0123456789abcdef",
            "email": "e@x.com",
            "localId": "uid-1",
            "expiresIn": "3600",
            "registered": true
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_success(&server, "verifyPassword").await;

    cookbook(&home, &server.uri())
        .args(["login", "--email", "e@x.com", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as e@x.com"))
        .stdout(predicate::str::contains("min left"));

    let raw = fs::read_to_string(home.path().join("session.json")).unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["email"], "e@x.com");
    assert_eq!(record["id"], "uid-1");
    assert_eq!(record["token"], "id-token-0123456789abcdef");
    assert!(record["tokenExpirationDate"].as_str().unwrap().ends_with('Z'));
    assert!(home.path().join("logs").join("cookbook.log").exists());
}

#[tokio::test]
async fn test_login_reads_password_from_stdin() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verifyPassword"))
        .and(body_partial_json(json!({ "password": "from-stdin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "idToken": "t",
            "email": "e@x.com",
            "localId": "uid-1",
            "expiresIn": "3600"
        })))
        .expect(1)
        .mount(&server)
        .await;

    cookbook(&home, &server.uri())
        .args(["login", "--email", "e@x.com"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();
}

#[tokio::test]
async fn test_signup_uses_signup_endpoint() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_success(&server, "signupNewUser").await;

    cookbook(&home, &server.uri())
        .args(["signup", "--email", "e@x.com", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed up as e@x.com"));

    assert!(home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_login_wrong_password_reports_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verifyPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_PASSWORD", "errors": [] }
        })))
        .mount(&server)
        .await;

    cookbook(&home, &server.uri())
        .args(["login", "--email", "e@x.com", "--password", "bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("This password is not correct."));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_signup_existing_email_reports_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signupNewUser"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "EMAIL_EXISTS" }
        })))
        .mount(&server)
        .await;

    cookbook(&home, &server.uri())
        .args(["signup", "--email", "e@x.com", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("This email exists already"));
}

#[tokio::test]
async fn test_server_error_reports_generic_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    cookbook(&home, &server.uri())
        .args(["login", "--email", "e@x.com", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("An unknown error occurred!"));
}

#[test]
fn test_missing_api_key_reports_generic_message() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("cookbook")
        .env("COOKBOOK_HOME", home.path())
        .env_remove("COOKBOOK_API_KEY")
        .args(["login", "--email", "e@x.com", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("An unknown error occurred!"));
}

#[test]
fn test_status_shows_stored_session() {
    let home = tempdir().unwrap();
    write_session(&home, "2999-01-01T00:00:00.000Z");

    cookbook(&home, UNREACHABLE_URL)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as saved@x.com"))
        .stdout(predicate::str::contains("User ID: uid-saved"))
        .stdout(predicate::str::contains("Token: saved-token-..."))
        .stdout(predicate::str::contains("0123456789abcdef").not());
}

#[test]
fn test_status_without_session() {
    let home = tempdir().unwrap();

    cookbook(&home, UNREACHABLE_URL)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_status_reports_expired_session() {
    let home = tempdir().unwrap();
    write_session(&home, "2020-01-01T00:00:00.000Z");

    cookbook(&home, UNREACHABLE_URL)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as saved@x.com"))
        .stdout(predicate::str::contains("expired at 2020-01-01T00:00:00+00:00"));

    // Reporting never ends the session.
    assert!(home.path().join("session.json").exists());
}

#[test]
fn test_logout_removes_session() {
    let home = tempdir().unwrap();
    write_session(&home, "2999-01-01T00:00:00.000Z");

    cookbook(&home, UNREACHABLE_URL)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!home.path().join("session.json").exists());

    cookbook(&home, UNREACHABLE_URL)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stored session."));
}

#[test]
fn test_watch_logs_out_expired_session() {
    let home = tempdir().unwrap();
    write_session(&home, "2020-01-01T00:00:00.000Z");

    cookbook(&home, UNREACHABLE_URL)
        .arg("watch")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("Watching session for saved@x.com"))
        .stdout(predicate::str::contains("Session expired; logged out."));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_watch_without_session() {
    let home = tempdir().unwrap();

    cookbook(&home, UNREACHABLE_URL)
        .arg("watch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}
