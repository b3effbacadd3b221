//! Drives the `vk` binary through login, sync, list, unlock, lock and logout against fixture
//! server responses.

use std::{fs, num::NonZeroU32, path::Path, process::Output};

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use vaultkeep_crypto::{Kdf, KeyEncryptable, MasterKey, SymmetricCryptoKey};

mod common;
use common::vk;

const USER_ID: &str = "0b3e7c52-6f0a-4c1e-8d34-5e2b9a71c0de";
const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "P";
const GITHUB_ID: &str = "3f1a6d2e-9b7c-4e1f-a2d3-4b5c6d7e8f90";
const BANK_ID: &str = "7c0e9b1a-2d3f-4a5b-8c6d-e7f8091a2b3c";

struct Fixture {
    dir: TempDir,
    data_dir: std::path::PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let user_key = SymmetricCryptoKey::generate();
        let kdf = Kdf::PBKDF2 {
            iterations: NonZeroU32::new(5000).unwrap(),
        };
        let master_key = MasterKey::derive(PASSWORD, EMAIL, &kdf).unwrap();

        let claims = json!({
            "exp": 4_102_444_800u64,
            "sub": USER_ID,
            "email": EMAIL,
            "email_verified": true,
        });
        let access_token = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        );

        let enc = |s: &str| s.encrypt_with_key(&user_key).unwrap().to_string();

        write_json(
            dir.path(),
            "prelogin.json",
            json!({ "kdf": 0, "kdfIterations": 5000 }),
        );
        write_json(
            dir.path(),
            "identity.json",
            json!({
                "access_token": access_token,
                "expires_in": 3600,
                "refresh_token": "refresh",
                "token_type": "Bearer",
                "Key": master_key.encrypt_user_key(&user_key).unwrap().to_string(),
                "Kdf": 0,
                "KdfIterations": 5000,
            }),
        );
        write_json(
            dir.path(),
            "sync.json",
            json!({
                "ciphers": [
                    {
                        "id": GITHUB_ID,
                        "type": 1,
                        "name": enc("GitHub"),
                        "notes": enc("work account"),
                        "login": {
                            "username": enc("octocat"),
                            "password": enc("hunter2"),
                            "uris": [{ "uri": enc("https://github.com"), "match": null }],
                        },
                    },
                    {
                        "id": BANK_ID,
                        "type": 2,
                        "name": enc("Bank"),
                        "secureNote": { "type": 0 },
                    },
                    {
                        "id": "11111111-2222-4333-8444-555555555555",
                        "type": 2,
                        "name": "2.broken",
                    },
                ],
            }),
        );

        Self { dir, data_dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn run(&self, args: &[&str]) -> Output {
        vk(&self.data_dir)
            .env("VK_TEST_PASSWORD", PASSWORD)
            .args(args)
            .output()
            .expect("Failed to execute vk command")
    }

    fn login(&self) -> String {
        let output = self.run(&[
            "login",
            "--email",
            EMAIL,
            "--prelogin",
            &self.path("prelogin.json"),
            "--identity",
            &self.path("identity.json"),
            "--passwordenv",
            "VK_TEST_PASSWORD",
            "--raw",
        ]);
        assert_success(&output);
        stdout(&output).trim().to_owned()
    }
}

fn write_json(dir: &Path, name: &str, value: Value) {
    fs::write(dir.join(name), value.to_string()).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Command should exit successfully: {}",
        stderr(output)
    );
}

fn assert_failure(output: &Output, message: &str) {
    assert!(!output.status.success(), "Command should fail");
    assert!(
        stderr(output).contains(message),
        "Error should contain '{}': {}",
        message,
        stderr(output)
    );
}

fn json_output(output: &Output) -> Value {
    assert_success(output);
    serde_json::from_str(&stdout(output)).unwrap()
}

#[test]
fn test_login_sync_and_read_items() {
    let fixture = Fixture::new();

    let token = fixture.login();
    assert_eq!(STANDARD.decode(&token).unwrap().len(), 64);

    let output = fixture.run(&["sync", "--file", &fixture.path("sync.json")]);
    assert_success(&output);
    assert!(stdout(&output).contains("3 items stored"));

    // The broken record is skipped.
    let items = json_output(&fixture.run(&["list", "items", "--session", &token]));
    let names: Vec<_> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Bank", "GitHub"]);

    let items = json_output(&fixture.run(&[
        "list", "items", "--search", "octo", "--session", &token,
    ]));
    assert_eq!(items.as_array().unwrap().len(), 1);

    let item = json_output(&fixture.run(&["get", "item", GITHUB_ID, "--session", &token]));
    assert_eq!(item["name"], "GitHub");
    assert_eq!(item["notes"], "work account");
    assert_eq!(item["login"]["password"], "hunter2");

    let output = fixture.run(&[
        "get",
        "item",
        "00000000-0000-0000-0000-000000000000",
        "--session",
        &token,
    ]);
    assert_failure(&output, "Item does not exist");

    let status = json_output(&fixture.run(&["status", "--session", &token]));
    assert_eq!(status["status"], "unlocked");
    assert_eq!(status["userEmail"], EMAIL);
    assert_eq!(status["userId"], USER_ID);
}

#[test]
fn test_session_from_environment() {
    let fixture = Fixture::new();
    let token = fixture.login();

    let output = vk(&fixture.data_dir)
        .env("VK_SESSION", &token)
        .args(["status"])
        .output()
        .unwrap();
    assert_eq!(json_output(&output)["status"], "unlocked");
}

#[test]
fn test_unlock_invalidates_previous_session() {
    let fixture = Fixture::new();
    let first = fixture.login();

    let output = fixture.run(&["lock"]);
    assert_success(&output);

    let output = fixture.run(&["unlock", "--passwordenv", "VK_TEST_PASSWORD", "--raw"]);
    assert_success(&output);
    let second = stdout(&output).trim().to_owned();
    assert_ne!(first, second);

    let output = fixture.run(&["list", "items", "--session", &first]);
    assert_failure(&output, "session expired");

    let output = fixture.run(&["list", "items", "--session", &second]);
    assert_success(&output);

    let status = json_output(&fixture.run(&["status", "--session", &first]));
    assert_eq!(status["status"], "locked");
}

#[test]
fn test_unlock_with_wrong_password() {
    let fixture = Fixture::new();
    fixture.login();

    let output = vk(&fixture.data_dir)
        .env("VK_TEST_PASSWORD", "not the password")
        .args(["unlock", "--passwordenv", "VK_TEST_PASSWORD"])
        .output()
        .unwrap();
    assert_failure(&output, "incorrect password");
}

#[test]
fn test_login_with_wrong_password() {
    let fixture = Fixture::new();
    let password_file = fixture.dir.path().join("password.txt");
    fs::write(&password_file, "wrong\nsecond line\n").unwrap();

    let output = fixture.run(&[
        "login",
        "--email",
        EMAIL,
        "--prelogin",
        &fixture.path("prelogin.json"),
        "--identity",
        &fixture.path("identity.json"),
        "--passwordfile",
        &password_file.display().to_string(),
    ]);
    assert_failure(&output, "incorrect password");

    let status = json_output(&fixture.run(&["status"]));
    assert_eq!(status["status"], "unauthenticated");
}

#[test]
fn test_login_rejects_kdf_mismatch() {
    let fixture = Fixture::new();
    write_json(
        fixture.dir.path(),
        "prelogin.json",
        json!({ "kdf": 0, "kdfIterations": 600000 }),
    );

    let output = fixture.run(&[
        "login",
        "--email",
        EMAIL,
        "--prelogin",
        &fixture.path("prelogin.json"),
        "--identity",
        &fixture.path("identity.json"),
        "--passwordenv",
        "VK_TEST_PASSWORD",
    ]);
    assert_failure(&output, "do not match");
}

#[test]
fn test_locked_vault_requires_session() {
    let fixture = Fixture::new();
    fixture.login();

    let output = fixture.run(&["list", "items"]);
    assert_failure(&output, "Vault is locked");

    let status = json_output(&fixture.run(&["status"]));
    assert_eq!(status["status"], "locked");
}

#[test]
fn test_logout_erases_account() {
    let fixture = Fixture::new();
    let token = fixture.login();
    assert_success(&fixture.run(&["sync", "--file", &fixture.path("sync.json")]));

    let output = fixture.run(&["logout"]);
    assert_success(&output);

    let status = json_output(&fixture.run(&["status", "--session", &token]));
    assert_eq!(status["status"], "unauthenticated");

    let output = fixture.run(&["list", "items", "--session", &token]);
    assert_failure(&output, "not logged in");

    let data = fs::read_to_string(fixture.data_dir.join("data.json")).unwrap();
    assert!(!data.contains(USER_ID), "Nothing of the account should remain: {data}");
}

#[test]
fn test_commands_require_login() {
    let fixture = Fixture::new();

    for args in [
        vec!["unlock", "--passwordenv", "VK_TEST_PASSWORD"],
        vec!["logout"],
        vec!["list", "items"],
    ] {
        let output = fixture.run(&args);
        assert_failure(&output, "not logged in");
    }
}

#[test]
fn test_encode() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let mut child = vk(dir.path())
        .arg("encode")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"hello").unwrap();
    let output = child.wait_with_output().unwrap();

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "aGVsbG8=");
}

#[test]
fn test_quiet_suppresses_output() {
    let fixture = Fixture::new();

    let output = fixture.run(&["status", "--quiet"]);
    assert_success(&output);
    assert!(stdout(&output).is_empty());
}
