//! Catalog load command - publish entries from a flat file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::output;
use crate::core::catalog::{self, Catalog};
use crate::error::Result;

/// Publish every entry of the flat file at `file`.
pub fn execute(location: &Path, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file)?;
    let entries = catalog::from_flat(&text)?;

    let target = catalog::open(location);
    for (id, value) in &entries {
        debug!(%id, "loading entry");
        target.publish(id, value)?;
    }

    output::success(&format!("loaded {} entries", output::count(entries.len())));
    Ok(())
}
