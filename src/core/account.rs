//! Local account lookup.
//!
//! Resolves an account name to its home directory so key and trust file
//! defaults (`~user/.ssh/...`) can be computed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants;
use crate::core::types::AccountName;
use crate::error::{KeyError, Result};

/// A local account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    name: AccountName,
    home: PathBuf,
}

impl Account {
    /// Look up an account by name.
    ///
    /// The current user is resolved through its home directory (honouring
    /// `HOME`); other accounts are read from `/etc/passwd`.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::UnknownAccount` if the account does not exist.
    pub fn lookup(name: &str) -> Result<Self> {
        if is_current_user(name) {
            if let Some(home) = dirs::home_dir() {
                return Ok(Self {
                    name: name.to_string(),
                    home,
                });
            }
        }
        Self::lookup_in(name, Path::new(constants::PASSWD_FILE))
    }

    /// Look up an account in a passwd-format file.
    pub fn lookup_in(name: &str, passwd: &Path) -> Result<Self> {
        debug!(account = name, passwd = %passwd.display(), "looking up account");

        let contents = fs::read_to_string(passwd).map_err(|source| KeyError::ReadFailed {
            path: passwd.to_path_buf(),
            source,
        })?;

        contents
            .lines()
            .filter_map(parse_passwd_line)
            .find(|(user, _)| *user == name)
            .map(|(user, home)| Self {
                name: user.to_string(),
                home: PathBuf::from(home),
            })
            .ok_or_else(|| KeyError::UnknownAccount(name.to_string()).into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The account's `~/.ssh` directory.
    pub fn ssh_dir(&self) -> PathBuf {
        self.home.join(constants::SSH_DIR)
    }

    /// The account's `~/.ssh/authorized_keys` file.
    pub fn authorized_keys(&self) -> PathBuf {
        self.ssh_dir().join(constants::AUTHORIZED_KEYS_FILE)
    }
}

/// Whether `name` is the account this process runs as.
pub fn is_current_user(name: &str) -> bool {
    whoami::username() == name
}

/// `name:passwd:uid:gid:gecos:home:shell` → `(name, home)`.
fn parse_passwd_line(line: &str) -> Option<(&str, &str)> {
    if line.starts_with('#') {
        return None;
    }
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < 7 || fields[0].is_empty() {
        return None;
    }
    Some((fields[0], fields[5]))
}
