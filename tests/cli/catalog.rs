//! Tests for `keyferry publish`, `lookup` and `catalog` commands.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_lookup_before_publish_is_not_an_error() {
    let t = Test::new();

    let output = t.lookup("pgbackup@backup01");
    assert_success(&output);
    assert_stdout_contains(&output, "not yet published");
}

#[test]
fn test_publish_path_then_lookup() {
    let t = Test::new();
    let key = t.write("keys/host.pub", ED25519_LINE);

    assert_success(&t.publish_path("host@psql01", &key));
    assert_published(&t, "host@psql01", &key.display().to_string());
}

#[test]
fn test_publish_relative_path_fails() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["publish", "host@psql01", "--path", "keys/host.pub"])
        .output()
        .unwrap();
    assert_failure(&output);
}

#[test]
fn test_publish_invalid_identifier_fails() {
    let t = Test::new();
    let key = t.write("keys/host.pub", ED25519_LINE);

    assert_failure(&t.publish_path("no-at-sign", &key));
}

#[test]
fn test_catalog_list_and_json() {
    let t = Test::new();
    t.publish_path("host@psql01", &t.write("keys/a.pub", ED25519_LINE));
    t.publish_path("host@psql02", &t.write("keys/b.pub", ED25519_LINE));

    let output = t.catalog_list();
    assert_success(&output);
    assert_stdout_contains(&output, "host@psql01");
    assert_stdout_contains(&output, "host@psql02");

    let output = t.catalog_list_json();
    assert_success(&output);
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["count"], 2);
}

#[test]
fn test_catalog_rm() {
    let t = Test::new();
    t.publish_path("host@psql01", &t.write("keys/a.pub", ED25519_LINE));

    let output = t.catalog_rm("host@psql01");
    assert_success(&output);
    assert_stdout_contains(&output, "removed");

    assert_stdout_contains(&t.lookup("host@psql01"), "not yet published");
}

#[test]
fn test_catalog_dump_and_load() {
    let t = Test::new();
    let flat = t.write(
        "exported_keys.ini",
        &format!(
            "# exported keys\npgbackup@backup01 = {}\npostgres@psql01={}\n",
            BACKUP_LINE, ED25519_LINE
        ),
    );

    t.cmd()
        .args(["catalog", "load"])
        .arg(&flat)
        .assert()
        .success()
        .stdout(predicate::str::contains("loaded 2 entries"));

    t.cmd()
        .args(["catalog", "dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("pgbackup@backup01 = {}", BACKUP_LINE)))
        .stdout(predicate::str::contains(format!("postgres@psql01 = {}", ED25519_LINE)));
}

#[test]
fn test_catalog_flag_overrides_env() {
    let t = Test::new();
    let other = t.mkdir("other-catalog");
    let key = t.write("keys/a.pub", ED25519_LINE);

    t.cmd()
        .args(["publish", "host@psql01", "--path"])
        .arg(&key)
        .arg("--catalog")
        .arg(&other)
        .assert()
        .success();

    assert!(other.join("host@psql01").exists());
    assert!(!t.catalog().join("host@psql01").exists());
}
