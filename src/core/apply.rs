//! Applying a render plan to trust files.
//!
//! Only lines ending in a `keyferry:<id>` marker are ever touched. For each
//! target file, managed lines of every source named in the plan are dropped
//! and the freshly rendered lines appended; everything else in the file,
//! including managed lines of sources the plan does not mention, is kept
//! as-is.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::constants;
use crate::core::domain::{CatalogId, RenderPlan, TrustArtifact};
use crate::error::{ApplyError, Result};

/// Outcome of applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Files whose contents changed.
    pub written: Vec<PathBuf>,
    /// Managed lines added.
    pub added: usize,
    /// Managed lines removed.
    pub removed: usize,
}

impl ApplyReport {
    pub fn changed(&self) -> bool {
        !self.written.is_empty()
    }
}

/// Source identifier of a managed line, if it carries a marker.
pub fn managed_source(line: &str) -> Option<CatalogId> {
    line.split_whitespace()
        .last()?
        .strip_prefix(constants::MANAGED_MARKER)?
        .parse()
        .ok()
}

/// Sources of the managed lines currently in `target`; none if it is missing.
pub fn managed_sources(target: &Path) -> Result<BTreeSet<CatalogId>> {
    match fs::read_to_string(target) {
        Ok(contents) => Ok(contents.lines().filter_map(managed_source).collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeSet::new()),
        Err(e) => Err(ApplyError::ReadFailed {
            path: target.to_path_buf(),
            source: e,
        }
        .into()),
    }
}

/// Write every target file of `plan`.
///
/// A target that cannot be written does not stop the others.
///
/// # Errors
///
/// Returns `ApplyError::Partial` carrying the first failure (for example
/// `ApplyError::MissingDirectory`; directories are never created here) and
/// the targets that were applied anyway.
pub fn apply(plan: &RenderPlan) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    let mut applied = Vec::new();
    let mut failure = None;

    for target in plan.targets() {
        let artifacts: Vec<&TrustArtifact> = plan
            .artifacts
            .iter()
            .filter(|a| a.target() == target)
            .collect();
        match apply_target(target, &artifacts, &mut report) {
            Ok(()) => applied.push(target.to_path_buf()),
            Err(e) => {
                warn!(path = %target.display(), error = %e, "trust file not applied");
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }

    if report.changed() {
        info!(
            files = report.written.len(),
            added = report.added,
            removed = report.removed,
            "trust files updated"
        );
    }

    match failure {
        None => Ok(report),
        Some(source) => Err(ApplyError::Partial {
            applied,
            written: report.written,
            source: Box::new(source),
        }
        .into()),
    }
}

fn apply_target(target: &Path, artifacts: &[&TrustArtifact], report: &mut ApplyReport) -> Result<()> {
    let sources: BTreeSet<&CatalogId> = artifacts.iter().map(|a| a.source()).collect();
    let desired: Vec<String> = artifacts.iter().filter_map(|a| a.line()).collect();

    let existing = match fs::read_to_string(target) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(ApplyError::WriteFailed {
                path: target.to_path_buf(),
                source: e,
            }
            .into())
        }
    };

    if existing.is_none() && desired.is_empty() {
        return Ok(());
    }

    let mut kept = Vec::new();
    let mut dropped = Vec::new();
    for line in existing.as_deref().unwrap_or_default().lines() {
        match managed_source(line) {
            Some(id) if sources.contains(&id) => dropped.push(line),
            _ => kept.push(line),
        }
    }

    let removed = dropped.iter().filter(|l| !desired.iter().any(|d| d == *l)).count();
    let added = desired.iter().filter(|d| !dropped.contains(&d.as_str())).count();

    let mut contents: String = kept
        .iter()
        .copied()
        .chain(desired.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }

    if existing.as_deref() == Some(contents.as_str()) {
        debug!(path = %target.display(), "trust file unchanged");
        return Ok(());
    }

    write_target(target, &contents, existing.is_none())?;
    debug!(path = %target.display(), added, removed, "trust file written");

    report.written.push(target.to_path_buf());
    report.added += added;
    report.removed += removed;
    Ok(())
}

fn write_target(target: &Path, contents: &str, create: bool) -> Result<()> {
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if !parent.is_dir() {
        return Err(ApplyError::MissingDirectory(parent.to_path_buf()).into());
    }

    let write_failed = |source| ApplyError::WriteFailed {
        path: target.to_path_buf(),
        source,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    // Mode only applies when the file is created; existing files keep theirs.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(target).map_err(write_failed)?;
    file.write_all(contents.as_bytes()).map_err(write_failed)?;

    // New trust files belong to whoever owns the directory they live in.
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        if create {
            let dir = fs::metadata(parent).map_err(write_failed)?;
            if let Err(e) = std::os::unix::fs::chown(target, Some(dir.uid()), Some(dir.gid())) {
                debug!(path = %target.display(), error = %e, "could not hand trust file to directory owner");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = create;

    Ok(())
}
