//! Tests for `keyferry parse` and `keyferry key-path`.

use crate::support::*;

#[test]
fn test_parse_plain_line() {
    let t = Test::new();

    let output = t.parse(ED25519_LINE);
    assert_success(&output);
    assert_stdout_contains(&output, "ssh-ed25519");
    assert_stdout_contains(&output, "postgres@psql01");
}

#[test]
fn test_parse_json_splits_options() {
    let t = Test::new();

    let output = t.parse_json(OPTIONS_LINE);
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["algorithm"], "ssh-ed25519");
    assert_eq!(
        parsed["options"],
        r#"no-agent-forwarding,command="/usr/bin/pgbackrest ssh-proxy""#
    );
    assert_eq!(parsed["comment"], "postgres@psql01");
}

#[test]
fn test_parse_security_key() {
    let t = Test::new();

    let output = t.parse_json(SK_LINE);
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["algorithm"], "sk-ssh-ed25519@openssh.com");
    assert!(parsed.get("options").is_none());
}

#[test]
fn test_parse_file_joins_lines() {
    let t = Test::new();
    let path = t.write(
        "wrapped.pub",
        "ssh-ed25519\n  AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl\n\npostgres@psql01\n",
    );

    let output = t
        .cmd()
        .args(["parse", "--json", "--file"])
        .arg(&path)
        .output()
        .unwrap();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["comment"], "postgres@psql01");
}

#[test]
fn test_parse_stdin() {
    let t = Test::new();

    let output = t
        .cmd()
        .arg("parse")
        .write_stdin(format!("{}\n", ED25519_LINE))
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "ssh-ed25519");
}

#[test]
fn test_parse_garbage_fails() {
    let t = Test::new();

    let output = t.parse(GARBAGE_LINE);
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed key line");
}

#[test]
fn test_key_path_naming() {
    let t = Test::new();

    t.cmd()
        .args(["key-path", "--dir", "/var/lib/pgbackrest/.ssh", "--type", "ecdsa-sk"])
        .assert()
        .success()
        .stdout(predicates::str::diff("/var/lib/pgbackrest/.ssh/id_ecdsa_sk.pub\n"));

    t.cmd()
        .args(["key-path", "--dir", "/var/lib/pgbackrest/.ssh", "--private"])
        .assert()
        .success()
        .stdout(predicates::str::diff("/var/lib/pgbackrest/.ssh/id_ed25519\n"));
}
