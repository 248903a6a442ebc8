//! Key algorithm families accepted by the key generator.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, KeyError};

/// Algorithm family passed to `ssh-keygen -t`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum KeyFamily {
    Rsa,
    Dsa,
    Ecdsa,
    #[value(name = "ecdsa-sk")]
    EcdsaSk,
    #[default]
    Ed25519,
    #[value(name = "ed25519-sk")]
    Ed25519Sk,
}

impl KeyFamily {
    /// Name as understood by `ssh-keygen -t`.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyFamily::Rsa => "rsa",
            KeyFamily::Dsa => "dsa",
            KeyFamily::Ecdsa => "ecdsa",
            KeyFamily::EcdsaSk => "ecdsa-sk",
            KeyFamily::Ed25519 => "ed25519",
            KeyFamily::Ed25519Sk => "ed25519-sk",
        }
    }

    /// Private key file name, e.g. `id_ecdsa_sk`.
    pub fn file_stem(&self) -> String {
        format!("id_{}", self.as_str().replace('-', "_"))
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "rsa" => Ok(KeyFamily::Rsa),
            "dsa" => Ok(KeyFamily::Dsa),
            "ecdsa" => Ok(KeyFamily::Ecdsa),
            "ecdsa-sk" => Ok(KeyFamily::EcdsaSk),
            "ed25519" => Ok(KeyFamily::Ed25519),
            "ed25519-sk" => Ok(KeyFamily::Ed25519Sk),
            other => Err(KeyError::UnknownFamily(other.to_string()).into()),
        }
    }
}

/// Path of a key file inside `dir`.
///
/// `public` selects the `.pub` half of the pair.
pub fn key_path(dir: &Path, family: KeyFamily, public: bool) -> PathBuf {
    let stem = family.file_stem();
    if public {
        dir.join(format!("{}.pub", stem))
    } else {
        dir.join(stem)
    }
}
