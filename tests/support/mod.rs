//! Test support utilities for keyferry integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir (holding the catalog, host configs and
/// key files) and home dir. Child processes get paths through arguments and
/// env vars so tests can safely run in parallel.
pub struct Test {
    /// Temporary working directory
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Shared catalog directory of this environment.
    pub fn catalog(&self) -> PathBuf {
        self.dir.path().join("catalog")
    }

    /// Path under the working dir.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create a directory under the working dir.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir).expect("failed to create dir");
        dir
    }

    /// Write a file under the working dir, creating parents.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Read a file under the working dir, empty if missing.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap_or_default()
    }

    /// Write a host config for `cluster` that exports `role` from a pre-made
    /// key file and trusts `trusts` keys into `<cluster>/authorized_keys`.
    ///
    /// Using a key file export keeps the test independent of ssh-keygen.
    pub fn host(&self, cluster: &str, role: &str, key_line: &str, trusts: &str) -> PathBuf {
        let key = self.write(&format!("{}/{}.pub", cluster, role), key_line);
        let auth = self.path(&format!("{}/authorized_keys", cluster));
        let config = format!(
            r#"
[host]
cluster = "{cluster}"
catalog = "{catalog}"
state = "{state}"

[[export]]
role = "{role}"
path = "{key}"

[[authorize]]
user = "{role}"
role = "{trusts}"
target = "{auth}"
"#,
            cluster = cluster,
            catalog = self.catalog().display(),
            state = self.path(&format!("{}/rendered.json", cluster)).display(),
            role = role,
            key = key.display(),
            trusts = trusts,
            auth = auth.display(),
        );
        self.write(&format!("{}/keyferry.toml", cluster), &config)
    }
}
