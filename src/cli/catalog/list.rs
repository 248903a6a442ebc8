//! Catalog list command.

use std::path::Path;

use crate::cli::output;
use crate::core::catalog::{self, Catalog};
use crate::core::domain::ExportValue;
use crate::error::Result;

/// List catalog entries.
pub fn execute(location: &Path, json: bool) -> Result<()> {
    let snapshot = catalog::open(location).snapshot()?;

    if json {
        let entries: Vec<_> = snapshot
            .iter()
            .map(|(id, value)| {
                serde_json::json!({
                    "id": id,
                    "value": value.to_string(),
                })
            })
            .collect();

        let result = serde_json::json!({
            "entries": entries,
            "count": snapshot.len()
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if snapshot.is_empty() {
        output::dimmed("catalog is empty");
    } else {
        output::section(&format!("{} catalog entries", output::count(snapshot.len())));
        for (id, value) in &snapshot {
            let summary = match value {
                ExportValue::Record(record) => record.algorithm.clone(),
                ExportValue::Path(path) => output::path(path.display()),
            };
            output::kv(&id.to_string(), summary);
        }
    }

    Ok(())
}
