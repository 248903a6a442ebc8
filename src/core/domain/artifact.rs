//! Trust artifacts rendered from the catalog.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::CatalogId;
use crate::core::constants;
use crate::core::types::{AccountName, Material};

/// One rendered trust entry, or a marker that a previous entry must go.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrustArtifact {
    /// A line in `user`'s authorized_keys file.
    AuthorizedKey {
        source: CatalogId,
        user: AccountName,
        target: PathBuf,
        algorithm: String,
        material: Material,
    },
    /// A line in a known_hosts file.
    KnownHost {
        source: CatalogId,
        target: PathBuf,
        host_pattern: String,
        algorithm: String,
        material: Material,
    },
    /// `source` was rendered into `target` before and is gone from the catalog.
    Absent { source: CatalogId, target: PathBuf },
}

impl TrustArtifact {
    /// Catalog identifier this artifact was derived from.
    pub fn source(&self) -> &CatalogId {
        match self {
            TrustArtifact::AuthorizedKey { source, .. }
            | TrustArtifact::KnownHost { source, .. }
            | TrustArtifact::Absent { source, .. } => source,
        }
    }

    /// File the artifact belongs to.
    pub fn target(&self) -> &Path {
        match self {
            TrustArtifact::AuthorizedKey { target, .. }
            | TrustArtifact::KnownHost { target, .. }
            | TrustArtifact::Absent { target, .. } => target,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TrustArtifact::Absent { .. })
    }

    /// The managed line written to the target file, `None` for absent markers.
    pub fn line(&self) -> Option<String> {
        match self {
            TrustArtifact::AuthorizedKey {
                source,
                algorithm,
                material,
                ..
            } => Some(format!(
                "{} {} {}",
                algorithm,
                material,
                managed_marker(source)
            )),
            TrustArtifact::KnownHost {
                source,
                host_pattern,
                algorithm,
                material,
                ..
            } => Some(format!(
                "{} {} {} {}",
                host_pattern,
                algorithm,
                material,
                managed_marker(source)
            )),
            TrustArtifact::Absent { .. } => None,
        }
    }
}

/// Trailing comment that tags a line as managed for `id`.
pub fn managed_marker(id: &CatalogId) -> String {
    format!("{}{}", constants::MANAGED_MARKER, id)
}

/// Output of one render: present artifacts followed by absent markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub artifacts: Vec<TrustArtifact>,
}

impl RenderPlan {
    /// Artifacts that should exist after applying.
    pub fn present(&self) -> impl Iterator<Item = &TrustArtifact> {
        self.artifacts.iter().filter(|a| !a.is_absent())
    }

    /// Markers for entries that must be removed.
    pub fn absent(&self) -> impl Iterator<Item = &TrustArtifact> {
        self.artifacts.iter().filter(|a| a.is_absent())
    }

    /// Distinct target files touched by this plan.
    pub fn targets(&self) -> Vec<&Path> {
        let mut targets: Vec<&Path> = self.artifacts.iter().map(TrustArtifact::target).collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// SHA-256 over the present artifacts, used to detect a fixpoint.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for artifact in self.present() {
            hasher.update(artifact.target().to_string_lossy().as_bytes());
            hasher.update(b"\0");
            if let Some(line) = artifact.line() {
                hasher.update(line.as_bytes());
            }
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}
