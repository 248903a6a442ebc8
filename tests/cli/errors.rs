//! Error reporting and exit codes.

use crate::support::*;

#[test]
fn test_missing_config_hints_at_flag() {
    let t = Test::new();

    let output = t.pass(&t.path("nope/keyferry.toml"));
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found");
    assert_stderr_contains(&output, "KEYFERRY_CONFIG");
}

#[test]
fn test_invalid_config_is_rejected() {
    let t = Test::new();
    let config = t.write(
        "keyferry.toml",
        "[host]\ncluster = \"psql 01\"\n",
    );

    let output = t.pass(&config);
    assert_failure(&output);
    assert_stderr_contains(&output, "host.cluster");
}

#[test]
fn test_config_from_env() {
    let t = Test::new();
    let config = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");

    let output = t
        .cmd()
        .env("KEYFERRY_CONFIG", &config)
        .arg("pass")
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn test_unusable_catalog_location() {
    let t = Test::new();
    let not_a_dir = t.write("catalog-file", "");

    let output = t
        .cmd()
        .env("KEYFERRY_CATALOG", &not_a_dir)
        .args(["catalog", "list"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "catalog unavailable");
}

#[test]
fn test_keygen_missing_directory() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["keygen", "--dir"])
        .arg(t.path("no-such-dir"))
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "path not found");
}
