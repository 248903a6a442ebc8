//! Reconciliation passes.
//!
//! One pass on one host: ensure and publish its own keys, then consume the
//! catalog into its trust files. Hosts only see each other's keys once they
//! have published, so a fleet needs at least two passes; [`Orchestrator::converge`]
//! repeats passes until nothing changes.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::apply::apply;
use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::constants;
use crate::core::distributor::{render, resolve_snapshot, Selectors};
use crate::core::domain::{CatalogId, ExportValue};
use crate::core::keys::{Generator, KeyStore};
use crate::core::state::RenderState;
use crate::error::{ApplyError, Error, ErrorKind, PassError, Result, Stage};

/// A host taking part in reconciliation: its config and what it rendered last.
#[derive(Debug, Clone)]
pub struct Host {
    pub config: Config,
    pub state: RenderState,
}

impl Host {
    /// Host with no render history.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: RenderState::default(),
        }
    }

    /// Host with render history loaded from its state file.
    pub fn open(config: Config) -> Result<Self> {
        let state = RenderState::load(&config.host.state)?;
        Ok(Self { config, state })
    }

    /// Save render history to the state file.
    pub fn persist(&self) -> Result<()> {
        self.state.save(&self.config.host.state)
    }

    pub fn cluster(&self) -> &str {
        &self.config.host.cluster
    }
}

/// Result of one pass on one host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub cluster: String,
    /// Identifiers whose catalog entry was (re)written.
    pub published: Vec<CatalogId>,
    /// Trust lines currently rendered.
    pub rendered: usize,
    /// Trust lines removed from files.
    pub removed: usize,
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Digest of the rendered artifact set.
    pub digest: String,
    /// Whether anything visible to other hosts or on disk changed.
    pub changed: bool,
}

/// Outcome of [`Orchestrator::converge`].
#[derive(Debug, Default)]
pub struct Convergence {
    /// Rounds run (one pass per host each).
    pub passes: usize,
    /// Whether at least one host ran and the last round changed nothing.
    pub fixpoint: bool,
    /// Reports of the last round, one per successful host.
    pub reports: Vec<PassReport>,
    /// Hosts that failed in the last round.
    pub failures: Vec<PassError>,
}

/// Drives passes against a shared catalog.
pub struct Orchestrator<'a> {
    catalog: &'a dyn Catalog,
    generator: &'a dyn Generator,
    max_passes: usize,
}

fn key_stage(err: &Error) -> Stage {
    match err.kind() {
        ErrorKind::MalformedKeyLine => Stage::Parse,
        _ => Stage::Generate,
    }
}

impl<'a> Orchestrator<'a> {
    pub fn new(catalog: &'a dyn Catalog, generator: &'a dyn Generator) -> Self {
        Self {
            catalog,
            generator,
            max_passes: constants::MAX_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Publish this host's exports. Unchanged entries are not rewritten.
    fn publish_exports(&self, config: &Config) -> std::result::Result<Vec<CatalogId>, PassError> {
        let keys = KeyStore::new(self.generator);
        let mut published = Vec::new();

        for export in &config.exports {
            let id = config
                .export_id(export)
                .map_err(|e| PassError::new(Stage::Publish, config.host.cluster.as_str(), e))?;

            let value = match &export.path {
                Some(path) => ExportValue::Path(path.clone()),
                None => keys
                    .ensure_key(export.owner(), &export.key)
                    .map(ExportValue::Record)
                    .map_err(|e| PassError::new(key_stage(&e), id.to_string(), e))?,
            };

            let current = match self.catalog.lookup(&id) {
                Ok(current) => current,
                Err(e) if e.kind() == ErrorKind::CatalogUnavailable => {
                    return Err(PassError::new(Stage::Publish, id.to_string(), e))
                }
                Err(e) => {
                    warn!(%id, error = %e, "replacing unreadable catalog entry");
                    None
                }
            };

            if current.as_ref() == Some(&value) {
                debug!(%id, "catalog entry up to date");
                continue;
            }

            self.catalog
                .publish(&id, &value)
                .map_err(|e| PassError::new(Stage::Publish, id.to_string(), e))?;
            info!(%id, "published");
            published.push(id);
        }

        Ok(published)
    }

    /// Run one reconciliation pass for `host`.
    ///
    /// On success `host.state` holds what was rendered. If only some trust
    /// files could be written, `host.state` records those and the error lists
    /// them; any earlier failure leaves it untouched.
    pub fn pass(&self, host: &mut Host) -> std::result::Result<PassReport, PassError> {
        let cluster = host.config.host.cluster.clone();
        debug!(%cluster, "starting pass");

        let published = self.publish_exports(&host.config)?;

        let snapshot = self
            .catalog
            .snapshot()
            .map_err(|e| PassError::new(Stage::Resolve, cluster.as_str(), e))?;
        let resolved = resolve_snapshot(&snapshot);

        let selectors = Selectors::from_config(&host.config)
            .map_err(|e| PassError::new(Stage::Render, cluster.as_str(), e))?;
        let previous = host
            .state
            .with_markers(selectors.targets())
            .map_err(|e| PassError::new(Stage::Render, cluster.as_str(), e))?;
        let plan = render(&resolved, &selectors, &previous);
        let digest = plan.digest();

        let applied = match apply(&plan) {
            Ok(applied) => applied,
            Err(Error::Apply(ApplyError::Partial {
                applied,
                written,
                source,
            })) => {
                host.state = RenderState::next_partial(&plan, &previous, &resolved.pending, &applied);
                return Err(PassError::new(Stage::Apply, cluster.as_str(), *source).with_written(written));
            }
            Err(e) => return Err(PassError::new(Stage::Apply, cluster.as_str(), e)),
        };

        let next = RenderState::next(&plan, &previous, &resolved.pending);
        let changed = !published.is_empty()
            || applied.changed()
            || host.state.digest.as_deref() != Some(digest.as_str())
            || host.state.entries != next.entries;
        host.state = next;

        let report = PassReport {
            cluster,
            published,
            rendered: plan.present().count(),
            removed: applied.removed,
            written: applied.written,
            digest,
            changed,
        };
        debug!(
            cluster = %report.cluster,
            published = report.published.len(),
            rendered = report.rendered,
            changed = report.changed,
            "pass complete"
        );
        Ok(report)
    }

    /// Run passes over all `hosts` until a round changes nothing or the pass
    /// limit is hit. A failing host is recorded and the others carry on; a
    /// round in which every host failed is never a fixpoint.
    pub fn converge(&self, hosts: &mut [Host]) -> Convergence {
        let mut convergence = Convergence::default();

        while convergence.passes < self.max_passes {
            convergence.passes += 1;
            convergence.reports.clear();
            convergence.failures.clear();

            for host in hosts.iter_mut() {
                match self.pass(host) {
                    Ok(report) => convergence.reports.push(report),
                    Err(e) => {
                        warn!(cluster = %host.cluster(), error = %e, "pass failed");
                        convergence.failures.push(e);
                    }
                }
            }

            if !convergence.reports.is_empty() && convergence.reports.iter().all(|r| !r.changed) {
                convergence.fixpoint = true;
                break;
            }
        }

        if convergence.fixpoint {
            info!(passes = convergence.passes, "converged");
        } else {
            warn!(passes = convergence.passes, "pass limit reached before fixpoint");
        }
        convergence
    }
}
