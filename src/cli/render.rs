//! Render command - show what a pass would write, without writing it.

use crate::cli::output;
use crate::core::catalog::{self, Catalog};
use crate::core::config::Config;
use crate::core::distributor::{render, resolve_snapshot, Selectors};
use crate::core::domain::TrustArtifact;
use crate::core::state::RenderState;
use crate::error::Result;

/// Render trust artifacts for the host described by `config`.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let snapshot = catalog::open(&config.host.catalog).snapshot()?;
    let resolved = resolve_snapshot(&snapshot);
    let selectors = Selectors::from_config(config)?;
    let previous = RenderState::load(&config.host.state)?.with_markers(selectors.targets())?;
    let plan = render(&resolved, &selectors, &previous);

    if json {
        output::data(&serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if plan.artifacts.is_empty() {
        output::dimmed("nothing to render");
    }

    for target in plan.targets() {
        output::section(&output::path(target.display()));
        for artifact in plan.artifacts.iter().filter(|a| a.target() == target) {
            match artifact {
                TrustArtifact::Absent { source, .. } => {
                    output::list_item(&format!("remove {}", output::id(source)))
                }
                _ => {
                    if let Some(line) = artifact.line() {
                        output::list_item(&line);
                    }
                }
            }
        }
    }

    for id in &resolved.pending {
        output::warn(&format!("{} is published but not readable yet", output::id(id)));
    }
    Ok(())
}
