//! Keygen command - ensure an account has a key pair.

use std::path::PathBuf;

use tracing::info;

use crate::cli::output;
use crate::core::domain::KeyFamily;
use crate::core::keys::{default_generator, KeyConfig, KeyStore};
use crate::error::Result;

/// Ensure `user` (default: current user) has a key pair and print its public key.
pub fn execute(user: Option<String>, family: KeyFamily, dir: Option<PathBuf>, json: bool) -> Result<()> {
    let owner = user.unwrap_or_else(whoami::username);
    info!(owner = %owner, family = %family, "ensuring key pair");

    let config = KeyConfig::new(family, dir);
    let generator = default_generator();
    let record = KeyStore::new(generator.as_ref()).ensure_key(&owner, &config)?;
    let public = config.public_key_path(&owner)?;

    if json {
        let result = serde_json::json!({
            "user": owner,
            "path": public,
            "key": record,
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else {
        output::success(&format!("{} key for {}", family, owner));
        output::kv("path:", output::path(public.display()));
        output::data(&record.to_string());
    }
    Ok(())
}
