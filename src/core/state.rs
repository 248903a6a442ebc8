//! Render state.
//!
//! Remembers which `(source, target)` pairs the previous pass rendered so the
//! next render can emit removal markers for entries that disappeared. The
//! markers already present in trust files count as rendered too (see
//! [`RenderState::with_markers`]), so a lost state file or an interrupted pass
//! never leaves a grant behind.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::apply::managed_sources;
use crate::core::domain::{CatalogId, RenderPlan};
use crate::error::Result;

/// One previously rendered trust entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RenderedEntry {
    pub source: CatalogId,
    pub target: PathBuf,
}

/// What the last pass rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderState {
    #[serde(default)]
    pub entries: BTreeSet<RenderedEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_at: Option<DateTime<Utc>>,
}

impl RenderState {
    /// Load state from `path`; a missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no render state yet");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persist state to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), entries = self.entries.len(), "render state saved");
        Ok(())
    }

    pub fn contains(&self, source: &CatalogId, target: &Path) -> bool {
        self.entries.iter().any(|e| &e.source == source && e.target == target)
    }

    /// This state plus an entry for every managed line found in `targets`.
    ///
    /// # Errors
    ///
    /// Returns `ApplyError::ReadFailed` if a target exists but cannot be read.
    pub fn with_markers<'p>(&self, targets: impl IntoIterator<Item = &'p Path>) -> Result<Self> {
        let mut state = self.clone();
        for target in targets {
            for source in managed_sources(target)? {
                let entry = RenderedEntry {
                    source,
                    target: target.to_path_buf(),
                };
                if state.entries.insert(entry) {
                    debug!(path = %target.display(), "adopted managed line missing from render state");
                }
            }
        }
        Ok(state)
    }

    /// State after applying `plan`.
    ///
    /// Entries of `previous` whose source is still `pending` (in the catalog
    /// but not resolvable this pass) are carried over so they are neither
    /// forgotten nor removed.
    pub fn next(plan: &RenderPlan, previous: &RenderState, pending: &BTreeSet<CatalogId>) -> Self {
        let mut entries: BTreeSet<RenderedEntry> = plan
            .present()
            .map(|a| RenderedEntry {
                source: a.source().clone(),
                target: a.target().to_path_buf(),
            })
            .collect();

        entries.extend(
            previous
                .entries
                .iter()
                .filter(|e| pending.contains(&e.source))
                .cloned(),
        );

        Self {
            entries,
            digest: Some(plan.digest()),
            rendered_at: Some(Utc::now()),
        }
    }

    /// State after `plan` was applied to `applied` only.
    ///
    /// Applied targets take their entries from the plan; every other target
    /// keeps what `previous` had. The digest is not advanced, so the next pass
    /// still counts as a change.
    pub fn next_partial(
        plan: &RenderPlan,
        previous: &RenderState,
        pending: &BTreeSet<CatalogId>,
        applied: &[PathBuf],
    ) -> Self {
        let full = Self::next(plan, previous, pending);
        let is_applied = |target: &Path| applied.iter().any(|a| a == target);

        let entries = full
            .entries
            .into_iter()
            .filter(|e| is_applied(&e.target))
            .chain(
                previous
                    .entries
                    .iter()
                    .filter(|e| !is_applied(&e.target))
                    .cloned(),
            )
            .collect();

        Self {
            entries,
            digest: previous.digest.clone(),
            rendered_at: full.rendered_at,
        }
    }
}
