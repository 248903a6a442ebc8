//! Trust distribution.
//!
//! Projects the catalog onto this host's trust files. Rendering is pure: the
//! snapshot is resolved beforehand ([`resolve_snapshot`]) and applying the
//! result to disk is left to [`crate::core::apply`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::account::Account;
use crate::core::catalog::Snapshot;
use crate::core::config::Config;
use crate::core::domain::key_record::ALGORITHM_PREFIXES;
use crate::core::domain::{CatalogId, KeyRecord, RenderPlan, TrustArtifact};
use crate::core::state::RenderState;
use crate::core::types::{AccountName, ClusterId, Role};
use crate::error::Result;

/// Catalog entries with their key records loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub records: BTreeMap<CatalogId, KeyRecord>,
    /// Entries present in the catalog whose key could not be read yet.
    pub pending: BTreeSet<CatalogId>,
}

/// Resolve every snapshot entry, reading path references from disk.
///
/// Entries that fail to resolve are reported as pending rather than failing
/// the whole pass: their producer has not converged yet.
pub fn resolve_snapshot(snapshot: &Snapshot) -> Resolved {
    let mut resolved = Resolved::default();

    for (id, value) in snapshot {
        match value.resolve() {
            Ok(record) => {
                resolved.records.insert(id.clone(), record);
            }
            Err(e) => {
                warn!(%id, error = %e, "catalog entry not resolvable yet");
                resolved.pending.insert(id.clone());
            }
        }
    }

    resolved
}

/// Rule rendering authorized_keys entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeSelector {
    pub user: AccountName,
    pub role: Role,
    pub clusters: Vec<ClusterId>,
    pub target: PathBuf,
}

/// Rule rendering known_hosts entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownHostsSelector {
    pub role: Role,
    pub clusters: Vec<ClusterId>,
    pub target: PathBuf,
    pub host_pattern: String,
}

/// Local selection of catalog entries, with target files resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    pub authorize: Vec<AuthorizeSelector>,
    pub known_hosts: Vec<KnownHostsSelector>,
}

impl Selectors {
    /// Build selectors from config, resolving default authorized_keys paths
    /// through the account database.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::UnknownAccount` if a rule without `target` names an
    /// account that does not exist.
    pub fn from_config(config: &Config) -> Result<Self> {
        let authorize = config
            .authorize
            .iter()
            .map(|rule| {
                let target = match &rule.target {
                    Some(target) => target.clone(),
                    None => Account::lookup(&rule.user)?.authorized_keys(),
                };
                Ok(AuthorizeSelector {
                    user: rule.user.clone(),
                    role: rule.role.clone(),
                    clusters: rule.clusters.clone(),
                    target,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let known_hosts = config
            .known_hosts
            .iter()
            .map(|rule| KnownHostsSelector {
                role: rule.role.clone(),
                clusters: rule.clusters.clone(),
                target: rule.target.clone(),
                host_pattern: rule.host_pattern.clone(),
            })
            .collect();

        Ok(Self {
            authorize,
            known_hosts,
        })
    }

    /// Every trust file these selectors write, sorted.
    pub fn targets(&self) -> BTreeSet<&Path> {
        self.authorize
            .iter()
            .map(|rule| rule.target.as_path())
            .chain(self.known_hosts.iter().map(|rule| rule.target.as_path()))
            .collect()
    }
}

fn selects(role: &str, clusters: &[ClusterId], id: &CatalogId) -> bool {
    id.role() == role && (clusters.is_empty() || clusters.iter().any(|c| c == id.cluster()))
}

fn expand_pattern(template: &str, id: &CatalogId) -> String {
    template
        .replace("{cluster}", id.cluster())
        .replace("{role}", id.role())
}

fn is_trustable(record: &KeyRecord) -> bool {
    ALGORITHM_PREFIXES
        .iter()
        .any(|prefix| record.algorithm.starts_with(prefix))
}

/// Render trust artifacts for the current catalog.
///
/// Options and comments of the source keys are dropped; only the algorithm
/// and material cross the trust boundary. Every `(source, target)` pair of
/// `previous` that is not rendered again gets an [`TrustArtifact::Absent`]
/// marker, unless its source is still pending.
pub fn render(resolved: &Resolved, selectors: &Selectors, previous: &RenderState) -> RenderPlan {
    let mut present = Vec::new();

    for (id, record) in &resolved.records {
        if !is_trustable(record) {
            debug!(%id, algorithm = %record.algorithm, "skipping unsupported algorithm");
            continue;
        }

        for rule in &selectors.authorize {
            if selects(&rule.role, &rule.clusters, id) {
                present.push(TrustArtifact::AuthorizedKey {
                    source: id.clone(),
                    user: rule.user.clone(),
                    target: rule.target.clone(),
                    algorithm: record.algorithm.clone(),
                    material: record.material.clone(),
                });
            }
        }

        for rule in &selectors.known_hosts {
            if selects(&rule.role, &rule.clusters, id) {
                present.push(TrustArtifact::KnownHost {
                    source: id.clone(),
                    target: rule.target.clone(),
                    host_pattern: expand_pattern(&rule.host_pattern, id),
                    algorithm: record.algorithm.clone(),
                    material: record.material.clone(),
                });
            }
        }
    }

    present.sort();
    present.dedup();

    let mut absent: Vec<TrustArtifact> = previous
        .entries
        .iter()
        .filter(|e| !resolved.pending.contains(&e.source))
        .filter(|e| {
            !present
                .iter()
                .any(|a| a.source() == &e.source && a.target() == e.target)
        })
        .map(|e| TrustArtifact::Absent {
            source: e.source.clone(),
            target: e.target.clone(),
        })
        .collect();
    absent.sort();

    debug!(
        present = present.len(),
        absent = absent.len(),
        pending = resolved.pending.len(),
        "rendered trust artifacts"
    );

    present.extend(absent);
    RenderPlan { artifacts: present }
}
