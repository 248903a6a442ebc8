//! Local key material.
//!
//! Ensures an account's key pair exists, generating it through a
//! [`Generator`] when missing, and reads the public half back as a
//! [`KeyRecord`].
//!
//! ## Adding a New Generator
//!
//! 1. Implement the `Generator` trait
//! 2. Add the implementation in a new file next to `generator.rs`
//! 3. Re-export from this module

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::account::Account;
use crate::core::domain::{key_path, read_key_file, KeyFamily, KeyRecord};
use crate::error::{KeyError, Result};

mod generator;

pub use generator::SshKeygen;

/// Key pair generator.
///
/// Abstracts the external tool so passes can be exercised without it.
pub trait Generator: Send + Sync {
    /// Create `private_key` and `private_key.pub` owned by `owner`.
    ///
    /// Implementations must not be called when `private_key` already exists.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::GenerationFailed` with the command and exit detail.
    fn generate(&self, owner: &str, private_key: &Path, family: KeyFamily) -> Result<()>;
}

/// Default generator (`ssh-keygen` on `PATH`).
pub fn default_generator() -> Box<dyn Generator> {
    Box::new(SshKeygen::default())
}

/// Where an account's key pair lives and which algorithm it uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Algorithm family; `ed25519` when unset.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub family: Option<KeyFamily>,
    /// Key directory; the owner's `~/.ssh` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl KeyConfig {
    pub fn new(family: KeyFamily, dir: Option<PathBuf>) -> Self {
        Self {
            family: Some(family),
            dir,
        }
    }

    pub fn family(&self) -> KeyFamily {
        self.family.unwrap_or_default()
    }

    /// Key directory for `owner`.
    pub fn directory(&self, owner: &str) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Account::lookup(owner)?.ssh_dir()),
        }
    }

    /// `directory/id_<family>.pub`
    pub fn public_key_path(&self, owner: &str) -> Result<PathBuf> {
        Ok(key_path(&self.directory(owner)?, self.family(), true))
    }

    /// `directory/id_<family>`
    pub fn private_key_path(&self, owner: &str) -> Result<PathBuf> {
        Ok(key_path(&self.directory(owner)?, self.family(), false))
    }
}

/// Ensures key pairs exist and reads them.
pub struct KeyStore<'a> {
    generator: &'a dyn Generator,
}

impl<'a> KeyStore<'a> {
    pub fn new(generator: &'a dyn Generator) -> Self {
        Self { generator }
    }

    /// Make sure `owner` has a key pair as described by `config` and return
    /// its public key.
    ///
    /// The generator runs only when the public key is missing, and never when
    /// the private key exists (an orphaned private key is left alone and the
    /// missing public key is reported).
    ///
    /// # Errors
    ///
    /// - `KeyError::PathNotFound` if the key directory or public key is missing
    /// - `KeyError::GenerationFailed` if the generator fails
    /// - `KeyError::MalformedKeyLine` if the public key cannot be parsed
    pub fn ensure_key(&self, owner: &str, config: &KeyConfig) -> Result<KeyRecord> {
        let dir = config.directory(owner)?;
        if !dir.is_dir() {
            return Err(KeyError::PathNotFound(dir).into());
        }

        let family = config.family();
        let public = key_path(&dir, family, true);
        let private = key_path(&dir, family, false);

        if public.exists() {
            debug!(path = %public.display(), "public key present");
        } else if private.exists() {
            warn!(
                path = %private.display(),
                "private key exists without public key, refusing to regenerate"
            );
        } else {
            info!(owner, %family, path = %private.display(), "generating key pair");
            self.generator.generate(owner, &private, family)?;
        }

        let record = KeyRecord::parse(&read_key_file(&public)?)?;
        debug!(owner, algorithm = %record.algorithm, "key loaded");
        Ok(record)
    }
}
