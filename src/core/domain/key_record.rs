//! OpenSSH public-key lines.
//!
//! Parses `[options] algorithm material [comment]` into a [`KeyRecord`] and
//! renders it back to a single line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::Material;
use crate::error::{Error, KeyError, Result};

/// Algorithm token prefixes recognised by the parser.
///
/// The `sk-` variants come first so that `sk-ssh-ed25519@openssh.com` is read
/// as one algorithm and not as options `sk-` followed by `ssh-ed25519...`.
pub const ALGORITHM_PREFIXES: &[&str] = &["sk-ecdsa-", "sk-ssh-", "ssh-", "ecdsa-"];

/// A parsed public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Algorithm token, e.g. `ssh-ed25519`.
    pub algorithm: String,
    /// Base64 key material. Never decoded.
    pub material: Material,
    /// authorized_keys restriction options preceding the algorithm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Free-form trailing comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl KeyRecord {
    /// Build a record without options or comment.
    pub fn new(algorithm: impl Into<String>, material: impl Into<Material>) -> Self {
        Self {
            algorithm: algorithm.into(),
            material: material.into(),
            options: None,
            comment: None,
        }
    }

    /// Parse a single logical key line.
    ///
    /// The algorithm token must start a whitespace-separated token outside any
    /// quoted option value and be followed by the key material. Everything before
    /// it is the options field; everything after the material is the comment.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::MalformedKeyLine` carrying the input if no
    /// well-formed `algorithm material [comment]` tail exists.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut in_quotes = false;
        let mut prev: Option<char> = None;

        for (offset, ch) in raw.char_indices() {
            // Algorithms only start a token outside quoted option values.
            if !in_quotes && prev.map_or(true, char::is_whitespace) {
                if let Some((algorithm, material, comment)) = parse_tail(&raw[offset..]) {
                    let options = raw[..offset].trim_end();
                    trace!(offset, algorithm, "matched key line");

                    return Ok(Self {
                        algorithm: algorithm.to_string(),
                        material: material.to_string(),
                        options: non_empty(options),
                        comment: non_empty(comment),
                    });
                }
            }

            if ch == '"' && prev != Some('\\') {
                in_quotes = !in_quotes;
            }
            prev = Some(ch);
        }

        Err(KeyError::MalformedKeyLine(raw.to_string()).into())
    }

    /// Parse the contents of a public-key file.
    ///
    /// Multi-line content is flattened with [`flatten_lines`] first.
    pub fn parse_text(text: &str) -> Result<Self> {
        Self::parse(&flatten_lines(text))
    }

    /// Whether the algorithm is one of the FIDO `sk-` variants.
    pub fn is_security_key(&self) -> bool {
        self.algorithm.starts_with("sk-")
    }
}

impl fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(options) = &self.options {
            write!(f, "{} ", options)?;
        }
        write!(f, "{} {}", self.algorithm, self.material)?;
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Flatten multi-line key file content into one logical line.
///
/// Each line is trimmed, blank lines are dropped and the remainder is joined
/// with a single space. Spacing inside a line is left untouched so quoted
/// option values survive.
pub fn flatten_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Match `algorithm <ws> material [<ws> comment]` at the start of `rest`.
fn parse_tail(rest: &str) -> Option<(&str, &str, &str)> {
    let prefix = ALGORITHM_PREFIXES
        .iter()
        .find(|prefix| rest.starts_with(*prefix))?;

    let (algorithm, after) = split_token(rest)?;
    if algorithm.len() <= prefix.len() || after.is_empty() {
        return None;
    }

    let (material, after) = split_token(after.trim_start())?;
    Some((algorithm, material, after.trim()))
}

/// Split off the leading run of non-whitespace characters.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some(s.split_at(end))
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
