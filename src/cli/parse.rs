//! Parse command - split a public-key line into its parts.

use std::io::Read;
use std::path::PathBuf;

use crate::cli::output;
use crate::core::domain::{flatten_lines, read_key_file, KeyRecord};
use crate::error::Result;

/// Parse a key from `line`, `file`, or stdin.
pub fn execute(line: Option<String>, file: Option<PathBuf>, json: bool) -> Result<()> {
    let raw = match (line, file) {
        (Some(line), _) => line,
        (None, Some(file)) => read_key_file(&file)?,
        (None, None) => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            flatten_lines(&input)
        }
    };

    let record = KeyRecord::parse(&raw)?;

    if json {
        output::data(&serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    output::kv("algorithm:", &record.algorithm);
    output::kv("material: ", &record.material);
    if let Some(options) = &record.options {
        output::kv("options:  ", options);
    }
    if let Some(comment) = &record.comment {
        output::kv("comment:  ", comment);
    }
    Ok(())
}
