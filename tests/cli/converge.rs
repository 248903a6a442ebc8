//! End-to-end tests for `keyferry pass`, `render` and `converge`.

use crate::support::*;

#[test]
fn test_first_pass_publishes_but_trusts_nothing() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");

    let output = t.pass(&db);
    assert_success(&output);
    assert_stdout_contains(&output, "postgres@psql01");

    assert_published(&t, "postgres@psql01", "psql01/postgres.pub");
    assert_eq!(t.read("psql01/authorized_keys"), "");
}

#[test]
fn test_two_hosts_trust_each_other_after_two_passes() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");

    // Pass one: db publishes, backup publishes and sees db.
    assert_success(&t.pass(&db));
    assert_success(&t.pass(&backup));
    assert_eq!(t.read("psql01/authorized_keys"), "");

    // Pass two: db sees backup.
    assert_success(&t.pass(&db));

    // Options and comments never cross over; only algorithm and material.
    assert_eq!(
        t.read("psql01/authorized_keys"),
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIBLNrNYNuAd8xVIvq4E2zK1tF8kZYbUmiX4m0pKxQ7cP keyferry:pgbackup@backup01\n"
    );

    let backup_auth = t.read("backup01/authorized_keys");
    assert!(backup_auth.contains("keyferry:postgres@psql01"), "{}", backup_auth);
}

#[test]
fn test_converge_reaches_fixpoint() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");

    let output = t.converge(&[&db, &backup]);
    assert_success(&output);
    assert_stdout_contains(&output, "converged after 3 passes");

    // Running again changes nothing.
    let output = t.converge(&[&db, &backup]);
    assert_success(&output);
    assert_stdout_contains(&output, "converged after 1 passes");
    assert_stdout_contains(&output, "up to date");
}

#[test]
fn test_hand_written_lines_survive() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");
    t.write("psql01/authorized_keys", "ssh-rsa AAAAB3NzaC1yc2E admin@laptop\n");

    assert_success(&t.converge(&[&db, &backup]));

    let db_auth = t.read("psql01/authorized_keys");
    assert!(db_auth.starts_with("ssh-rsa AAAAB3NzaC1yc2E admin@laptop\n"));
    assert!(db_auth.contains("keyferry:pgbackup@backup01"));
}

#[test]
fn test_retired_host_loses_trust() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");
    assert_success(&t.converge(&[&db, &backup]));
    assert!(t.read("psql01/authorized_keys").contains("pgbackup@backup01"));

    assert_success(&t.catalog_rm("pgbackup@backup01"));
    let output = t.pass(&db);
    assert_success(&output);
    assert_stdout_contains(&output, "removed");

    assert_eq!(t.read("psql01/authorized_keys"), "");
}

#[test]
fn test_render_is_a_dry_run() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");
    assert_success(&t.pass(&backup));

    let output = t.render(&db);
    assert_success(&output);
    assert_stdout_contains(&output, "keyferry:pgbackup@backup01");
    assert!(!t.path("psql01/authorized_keys").exists());
}

#[test]
fn test_missing_trust_directory_fails_apply() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let config = t.read("psql01/keyferry.toml").replace(
        &t.path("psql01/authorized_keys").display().to_string(),
        &t.path("missing/authorized_keys").display().to_string(),
    );
    std::fs::write(&db, config).unwrap();
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");
    assert_success(&t.pass(&backup));

    let output = t.pass(&db);
    assert_failure(&output);
    assert_stderr_contains(&output, "apply failed");
}

#[test]
fn test_retired_host_loses_trust_without_state_file() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");
    assert_success(&t.converge(&[&db, &backup]));
    assert!(t.read("psql01/authorized_keys").contains("pgbackup@backup01"));

    std::fs::remove_file(t.path("psql01/rendered.json")).unwrap();
    assert_success(&t.catalog_rm("pgbackup@backup01"));

    let output = t.pass(&db);
    assert_success(&output);
    assert_stdout_contains(&output, "removed");
    assert_eq!(t.read("psql01/authorized_keys"), "");
}

#[test]
fn test_converge_with_every_host_failing_reports_no_fixpoint() {
    let t = Test::new();
    let db = t.host("psql01", "postgres", ED25519_LINE, "pgbackup");
    let config = t.read("psql01/keyferry.toml").replace(
        &t.path("psql01/authorized_keys").display().to_string(),
        &t.path("missing/authorized_keys").display().to_string(),
    );
    std::fs::write(&db, config).unwrap();
    let backup = t.host("backup01", "pgbackup", BACKUP_LINE, "postgres");
    assert_success(&t.pass(&backup));

    let mut cmd = t.cmd();
    cmd.args(["converge", "--max-passes", "2", "--config"]).arg(&db);
    let output = cmd.output().unwrap();

    assert_failure(&output);
    assert_stdout_contains(&output, "no fixpoint after 2 passes");
    assert!(!stdout(&output).contains("converged"), "{}", stdout(&output));
    assert_stderr_contains(&output, "apply failed for psql01");
}
