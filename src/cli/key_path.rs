//! Key path command.

use std::path::Path;

use crate::cli::output;
use crate::core::domain::{key_path, KeyFamily};
use crate::error::Result;

/// Print the public (or private) key path for `family` in `dir`.
pub fn execute(dir: &Path, family: KeyFamily, private: bool) -> Result<()> {
    output::data(&key_path(dir, family, !private).display().to_string());
    Ok(())
}
