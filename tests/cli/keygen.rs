//! Tests for `keyferry keygen` against the real ssh-keygen.

use crate::skip_without_ssh_keygen;
use crate::support::*;

#[test]
fn test_keygen_creates_and_reuses_key() {
    skip_without_ssh_keygen!();
    let t = Test::new();
    let dir = t.mkdir("ssh");

    let output = t
        .cmd()
        .args(["keygen", "--json", "--dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert_success(&output);
    let first: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(first["key"]["algorithm"], "ssh-ed25519");
    assert!(dir.join("id_ed25519").exists());
    assert!(dir.join("id_ed25519.pub").exists());

    let output = t
        .cmd()
        .args(["keygen", "--json", "--dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert_success(&output);
    let second: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(first["key"]["material"], second["key"]["material"]);
}

#[test]
fn test_keygen_rsa_naming() {
    skip_without_ssh_keygen!();
    let t = Test::new();
    let dir = t.mkdir("ssh");

    let output = t
        .cmd()
        .args(["keygen", "--type", "rsa", "--dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "ssh-rsa");
    assert!(dir.join("id_rsa.pub").exists());
}

#[test]
fn test_keygen_leaves_orphaned_private_key_alone() {
    let t = Test::new();
    let dir = t.mkdir("ssh");
    let private = t.write("ssh/id_ed25519", "PRIVATE");

    let output = t
        .cmd()
        .args(["keygen", "--dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "id_ed25519.pub");
    assert_eq!(std::fs::read_to_string(private).unwrap(), "PRIVATE");
}

#[test]
fn test_publish_own_key() {
    skip_without_ssh_keygen!();
    let t = Test::new();
    let dir = t.mkdir("ssh");

    let output = t
        .cmd()
        .args(["publish", "pgbackup@backup01", "--dir"])
        .arg(&dir)
        .output()
        .unwrap();
    assert_success(&output);
    assert_published(&t, "pgbackup@backup01", "ssh-ed25519");
}
