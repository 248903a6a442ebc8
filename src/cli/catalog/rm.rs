//! Catalog rm command - retire an identifier.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::catalog::{self, Catalog};
use crate::core::domain::CatalogId;
use crate::error::Result;

/// Remove `id` from the catalog.
pub fn execute(location: &Path, id: &CatalogId) -> Result<()> {
    info!(%id, "retiring catalog entry");
    if catalog::open(location).remove(id)? {
        output::success(&format!("removed {}", output::id(id)));
    } else {
        output::warn(&format!("{} not yet published", output::id(id)));
    }
    Ok(())
}
