//! Shared export catalog.
//!
//! Every host publishes its public keys under its own identifiers and reads
//! everybody else's. Writes are partitioned by identifier, so backends only
//! need atomic overwrite of a single entry; there is no cross-entry locking.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Catalog` trait
//! 2. Add the implementation in a new file (e.g., `sql.rs`, `s3.rs`)
//! 3. Re-export from this module

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::domain::{CatalogId, ExportValue};
use crate::error::{CatalogError, Result};

mod fs;
mod memory;

pub use fs::Directory;
pub use memory::Memory;

/// Point-in-time view of the whole catalog.
pub type Snapshot = BTreeMap<CatalogId, ExportValue>;

/// Overwrite-by-key store of exported keys.
pub trait Catalog: Send + Sync {
    /// Replace the entry for `id` with `value`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the store cannot be written.
    fn publish(&self, id: &CatalogId, value: &ExportValue) -> Result<()>;

    /// Current value for `id`, `None` if nothing has been published yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the store cannot be read.
    fn lookup(&self, id: &CatalogId) -> Result<Option<ExportValue>>;

    /// All entries currently visible.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the store cannot be read.
    fn snapshot(&self) -> Result<Snapshot>;

    /// Delete the entry for `id`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the store cannot be written.
    fn remove(&self, id: &CatalogId) -> Result<bool>;
}

/// Open the default (directory) catalog at `root`.
pub fn open(root: impl AsRef<Path>) -> Directory {
    Directory::new(root.as_ref())
}

/// Render a snapshot as flat `id = value` lines.
pub fn to_flat(snapshot: &Snapshot) -> String {
    snapshot
        .iter()
        .map(|(id, value)| format!("{} = {}\n", id, value))
        .collect()
}

/// Parse flat `id = value` lines.
///
/// Blank lines, `#`/`;` comments and `[section]` headers are skipped.
///
/// # Errors
///
/// Returns `CatalogError::InvalidIdentifier` or `CatalogError::InvalidValue`
/// for the first bad line.
pub fn from_flat(text: &str) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(['#', ';', '[']) {
            continue;
        }
        let (id, value) = line
            .split_once('=')
            .ok_or_else(|| CatalogError::InvalidIdentifier(line.to_string()))?;
        let id: CatalogId = id.trim().parse()?;
        let value = ExportValue::from_line(&id.to_string(), value)?;
        snapshot.insert(id, value);
    }

    Ok(snapshot)
}
