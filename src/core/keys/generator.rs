//! Key pair generation through `ssh-keygen`.
//!
//! ## Requirements
//!
//! - `ssh-keygen` must be on `PATH`
//! - generating for another account requires `su` and root privileges

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace};

use super::Generator;
use crate::core::account;
use crate::core::domain::KeyFamily;
use crate::error::{KeyError, Result};

/// Generator backed by the OpenSSH `ssh-keygen` tool.
#[derive(Debug, Clone)]
pub struct SshKeygen {
    program: PathBuf,
}

impl SshKeygen {
    /// Use a specific `ssh-keygen` binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the program on `PATH`.
    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|e| {
            KeyError::GenerationFailed {
                command: self.program.display().to_string(),
                detail: format!("not found: {}", e),
            }
            .into()
        })
    }

    /// Argument vector for generating `private_key` without a passphrase.
    fn keygen_args(private_key: &Path, family: KeyFamily) -> Vec<String> {
        vec![
            "-q".to_string(),
            "-t".to_string(),
            family.as_str().to_string(),
            "-N".to_string(),
            String::new(),
            "-f".to_string(),
            private_key.display().to_string(),
        ]
    }

    /// Build the command, switching to `owner` with `su` when needed.
    fn command(
        program: &Path,
        owner: &str,
        private_key: &Path,
        family: KeyFamily,
    ) -> (Command, String) {
        let args = Self::keygen_args(private_key, family);
        let keygen_line = std::iter::once(program.display().to_string())
            .chain(args.iter().cloned())
            .map(|arg| shell_quote(&arg))
            .collect::<Vec<_>>()
            .join(" ");

        if account::is_current_user(owner) {
            let mut cmd = Command::new(program);
            cmd.args(&args);
            (cmd, keygen_line)
        } else {
            let mut cmd = Command::new("su");
            cmd.args(["-", owner, "-c", &keygen_line]);
            let described = format!("su - {} -c \"{}\"", owner, keygen_line);
            (cmd, described)
        }
    }
}

impl Default for SshKeygen {
    fn default() -> Self {
        Self::new("ssh-keygen")
    }
}

impl Generator for SshKeygen {
    fn generate(&self, owner: &str, private_key: &Path, family: KeyFamily) -> Result<()> {
        let program = self.locate()?;
        let (mut cmd, described) = Self::command(&program, owner, private_key, family);
        debug!(owner, command = %described, "running key generator");

        let output = cmd.output().map_err(|e| KeyError::GenerationFailed {
            command: described.clone(),
            detail: format!("failed to spawn: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KeyError::GenerationFailed {
                command: described,
                detail: format!("{}: {}", output.status, stderr.trim()),
            }
            .into());
        }

        trace!(path = %private_key.display(), "key pair generated");
        Ok(())
    }
}

/// Quote `arg` for a POSIX shell.
fn shell_quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '@' | ':'))
    {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
