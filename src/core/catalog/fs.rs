//! Directory-backed catalog.
//!
//! Each identifier is one file named `role@cluster` holding the persisted
//! single-line value. Publishing writes a temporary file and renames it over
//! the entry, so readers see either the old or the new value and writers for
//! different identifiers never touch the same file.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use super::{Catalog, Snapshot};
use crate::core::domain::{CatalogId, ExportValue};
use crate::error::{CatalogError, Error, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Catalog stored as one file per identifier under a shared directory.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, id: &CatalogId) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn unavailable(&self, source: std::io::Error) -> Error {
        CatalogError::Unavailable {
            location: self.root.clone(),
            source,
        }
        .into()
    }
}

impl Catalog for Directory {
    fn publish(&self, id: &CatalogId, value: &ExportValue) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| self.unavailable(e))?;

        let entry = self.entry_path(id);
        let temp = self.root.join(format!(
            ".{}.{}.{}.tmp",
            id,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&temp, format!("{}\n", value)).map_err(|e| self.unavailable(e))?;
        if let Err(e) = fs::rename(&temp, &entry) {
            let _ = fs::remove_file(&temp);
            return Err(self.unavailable(e));
        }

        debug!(%id, path = %entry.display(), "published");
        Ok(())
    }

    fn lookup(&self, id: &CatalogId) -> Result<Option<ExportValue>> {
        match fs::read_to_string(self.entry_path(id)) {
            Ok(contents) => Ok(Some(ExportValue::from_line(&id.to_string(), &contents)?)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!(path = %self.root.display(), "catalog not created yet");
                return Ok(snapshot);
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| self.unavailable(e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            let id: CatalogId = match name.parse() {
                Ok(id) => id,
                Err(_) => {
                    warn!(file = %name, "ignoring non-catalog file");
                    continue;
                }
            };

            let contents = match fs::read_to_string(entry.path()) {
                Ok(contents) => contents,
                // Removed between listing and reading.
                Err(e) if e.kind() == IoErrorKind::NotFound => continue,
                Err(e) => return Err(self.unavailable(e)),
            };

            match ExportValue::from_line(&name, &contents) {
                Ok(value) => {
                    snapshot.insert(id, value);
                }
                Err(e) => warn!(%id, error = %e, "skipping corrupt catalog entry"),
            }
        }

        debug!(entries = snapshot.len(), "catalog snapshot taken");
        Ok(snapshot)
    }

    fn remove(&self, id: &CatalogId) -> Result<bool> {
        match fs::remove_file(self.entry_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.unavailable(e)),
        }
    }
}
