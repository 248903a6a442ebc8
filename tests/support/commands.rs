//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::path::Path;
use std::process::Output;

impl Test {
    /// Create a keyferry command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - KEYFERRY_CATALOG pointing at the test catalog
    /// - Current directory set to the test working directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("keyferry").expect("failed to find keyferry binary");
        cmd.env("HOME", self.home.path());
        cmd.env("KEYFERRY_CATALOG", self.catalog());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KEYFERRY_CONFIG");
        cmd.env_remove("KEYFERRY_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `keyferry parse LINE`.
    pub fn parse(&self, line: &str) -> Output {
        self.cmd()
            .args(["parse", line])
            .output()
            .expect("failed to run keyferry parse")
    }

    /// Shortcut for `keyferry parse LINE --json`.
    pub fn parse_json(&self, line: &str) -> Output {
        self.cmd()
            .args(["parse", line, "--json"])
            .output()
            .expect("failed to run keyferry parse --json")
    }

    /// Shortcut for `keyferry publish ID --path PATH`.
    pub fn publish_path(&self, id: &str, path: &Path) -> Output {
        self.cmd()
            .args(["publish", id, "--path"])
            .arg(path)
            .output()
            .expect("failed to run keyferry publish")
    }

    /// Shortcut for `keyferry lookup ID`.
    pub fn lookup(&self, id: &str) -> Output {
        self.cmd()
            .args(["lookup", id])
            .output()
            .expect("failed to run keyferry lookup")
    }

    /// Shortcut for `keyferry catalog list`.
    pub fn catalog_list(&self) -> Output {
        self.cmd()
            .args(["catalog", "list"])
            .output()
            .expect("failed to run keyferry catalog list")
    }

    /// Shortcut for `keyferry catalog list --json`.
    pub fn catalog_list_json(&self) -> Output {
        self.cmd()
            .args(["catalog", "list", "--json"])
            .output()
            .expect("failed to run keyferry catalog list --json")
    }

    /// Shortcut for `keyferry catalog rm ID`.
    pub fn catalog_rm(&self, id: &str) -> Output {
        self.cmd()
            .args(["catalog", "rm", id])
            .output()
            .expect("failed to run keyferry catalog rm")
    }

    /// Shortcut for `keyferry pass --config FILE`.
    pub fn pass(&self, config: &Path) -> Output {
        self.cmd()
            .arg("pass")
            .arg("--config")
            .arg(config)
            .output()
            .expect("failed to run keyferry pass")
    }

    /// Shortcut for `keyferry render --config FILE`.
    pub fn render(&self, config: &Path) -> Output {
        self.cmd()
            .arg("render")
            .arg("--config")
            .arg(config)
            .output()
            .expect("failed to run keyferry render")
    }

    /// Shortcut for `keyferry converge --config A --config B ...`.
    pub fn converge(&self, configs: &[&Path]) -> Output {
        let mut cmd = self.cmd();
        cmd.arg("converge");
        for config in configs {
            cmd.arg("--config").arg(config);
        }
        cmd.output().expect("failed to run keyferry converge")
    }
}
