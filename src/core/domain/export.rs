//! Values stored in the export catalog.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::key_record::{flatten_lines, KeyRecord};
use crate::error::{CatalogError, KeyError, Result};

/// What a host exported for one catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportValue {
    /// A parsed public key.
    Record(KeyRecord),
    /// Path to a public-key file, read when a consumer needs it.
    Path(PathBuf),
}

impl ExportValue {
    /// Parse the persisted single-line form.
    ///
    /// Absolute paths become [`ExportValue::Path`]; anything else must be a
    /// well-formed key line.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidValue` naming `id` if the line is neither.
    pub fn from_line(id: &str, line: &str) -> Result<Self> {
        let line = line.trim();
        if line.starts_with('/') {
            return Ok(ExportValue::Path(PathBuf::from(line)));
        }
        KeyRecord::parse(line)
            .map(ExportValue::Record)
            .map_err(|e| {
                CatalogError::InvalidValue {
                    id: id.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// The key record, reading and parsing the file for path values.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::PathNotFound` if a referenced file is missing, or
    /// `KeyError::MalformedKeyLine` if it does not hold a key.
    pub fn resolve(&self) -> Result<KeyRecord> {
        match self {
            ExportValue::Record(record) => Ok(record.clone()),
            ExportValue::Path(path) => {
                debug!(path = %path.display(), "resolving exported key path");
                KeyRecord::parse(&read_key_file(path)?)
            }
        }
    }
}

impl fmt::Display for ExportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportValue::Record(record) => write!(f, "{}", record),
            ExportValue::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<KeyRecord> for ExportValue {
    fn from(record: KeyRecord) -> Self {
        ExportValue::Record(record)
    }
}

/// Read a public-key file as one flattened line.
///
/// # Errors
///
/// Returns `KeyError::PathNotFound` if the file does not exist and
/// `KeyError::ReadFailed` for any other read error.
pub fn read_key_file(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(flatten_lines(&contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KeyError::PathNotFound(path.to_path_buf()).into())
        }
        Err(source) => Err(KeyError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}
