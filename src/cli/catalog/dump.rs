//! Catalog dump command.

use std::path::Path;

use crate::core::catalog::{self, Catalog};
use crate::error::Result;

/// Print the catalog in flat `id = value` form.
pub fn execute(location: &Path) -> Result<()> {
    let snapshot = catalog::open(location).snapshot()?;
    print!("{}", catalog::to_flat(&snapshot));
    Ok(())
}
