//! Lookup command.

use std::path::Path;

use crate::cli::output;
use crate::core::catalog::{self, Catalog};
use crate::core::domain::CatalogId;
use crate::error::Result;

/// Print the current entry for `id`.
pub fn execute(id: &CatalogId, location: &Path) -> Result<()> {
    match catalog::open(location).lookup(id)? {
        Some(value) => output::data(&value.to_string()),
        None => output::warn(&format!("{} not yet published", output::id(id))),
    }
    Ok(())
}
