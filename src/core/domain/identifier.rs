//! Catalog identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{ClusterId, Role};
use crate::error::{CatalogError, Error, Result};

/// Stable key of an export catalog entry: which role on which host exported it.
///
/// Rendered as `role@cluster`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogId {
    role: Role,
    cluster: ClusterId,
}

impl CatalogId {
    /// Create an identifier, validating both halves.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidIdentifier` if either half is empty or
    /// contains characters outside `[A-Za-z0-9_.-]`.
    pub fn new(role: &str, cluster: &str) -> Result<Self> {
        if !is_valid_component(role) || !is_valid_component(cluster) {
            return Err(CatalogError::InvalidIdentifier(format!("{}@{}", role, cluster)).into());
        }
        Ok(Self {
            role: role.to_string(),
            cluster: cluster.to_string(),
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }
}

/// Whether `s` is usable as one half of an identifier (and as a file name).
pub fn is_valid_component(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('.')
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.role, self.cluster)
    }
}

impl FromStr for CatalogId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (role, cluster) = s
            .split_once('@')
            .ok_or_else(|| CatalogError::InvalidIdentifier(s.to_string()))?;
        Self::new(role, cluster)
    }
}

impl TryFrom<String> for CatalogId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CatalogId> for String {
    fn from(id: CatalogId) -> Self {
        id.to_string()
    }
}
