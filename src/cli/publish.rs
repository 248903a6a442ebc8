//! Publish command - put one key into the catalog.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::output;
use crate::core::catalog::{self, Catalog};
use crate::core::domain::{CatalogId, ExportValue, KeyFamily};
use crate::core::keys::{default_generator, KeyConfig, KeyStore};
use crate::error::{ConfigError, Result};

/// Publish `id` from an account key or a key file reference.
pub fn execute(
    id: &CatalogId,
    user: Option<String>,
    family: KeyFamily,
    dir: Option<PathBuf>,
    path: Option<PathBuf>,
    location: &Path,
) -> Result<()> {
    let value = match path {
        Some(path) => {
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "path",
                    reason: format!("'{}' is not absolute", path.display()),
                }
                .into());
            }
            ExportValue::Path(path)
        }
        None => {
            let owner = user.unwrap_or_else(whoami::username);
            let generator = default_generator();
            let record = KeyStore::new(generator.as_ref()).ensure_key(&owner, &KeyConfig::new(family, dir))?;
            ExportValue::Record(record)
        }
    };

    info!(%id, catalog = %location.display(), "publishing");
    catalog::open(location).publish(id, &value)?;
    output::success(&format!("published {}", output::id(id)));

    if let ExportValue::Path(path) = &value {
        if let Err(e) = value.resolve() {
            output::warn(&format!("{} is not readable yet: {}", path.display(), e));
        }
    }
    Ok(())
}
