//! Error types for keyferry operations.
//!
//! Each subsystem has its own error enum; they all fold into [`Error`] so
//! callers can propagate with `?` and still match on the specific cause.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a failure, independent of the subsystem that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A public-key line could not be parsed.
    MalformedKeyLine,
    /// A configured directory or file does not exist.
    PathNotFound,
    /// The external key generator failed or could not be run.
    GenerationFailed,
    /// The shared catalog could not be read or written.
    CatalogUnavailable,
    /// The host configuration is missing or invalid.
    Config,
    /// Any other I/O or serialization failure.
    Io,
}

/// Top-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Pass(#[from] PassError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Key(e) => e.kind(),
            Error::Catalog(CatalogError::Unavailable { .. }) => ErrorKind::CatalogUnavailable,
            Error::Catalog(CatalogError::InvalidValue { .. }) => ErrorKind::MalformedKeyLine,
            Error::Catalog(CatalogError::InvalidIdentifier(_)) => ErrorKind::Config,
            Error::Config(_) => ErrorKind::Config,
            Error::Apply(ApplyError::MissingDirectory(_)) => ErrorKind::PathNotFound,
            Error::Apply(ApplyError::WriteFailed { .. } | ApplyError::ReadFailed { .. }) => ErrorKind::Io,
            Error::Apply(ApplyError::Partial { source, .. }) => source.kind(),
            Error::Pass(e) => e.source.kind(),
            Error::Io(_) | Error::Json(_) => ErrorKind::Io,
        }
    }
}

/// Key parsing and key material errors.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("malformed key line: {0:?}")]
    MalformedKeyLine(String),

    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("key generation failed: `{command}`: {detail}")]
    GenerationFailed { command: String, detail: String },

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("unknown key type: {0} (expected rsa, dsa, ecdsa, ecdsa-sk, ed25519 or ed25519-sk)")]
    UnknownFamily(String),

    #[error("failed to read key file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KeyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeyError::MalformedKeyLine(_) => ErrorKind::MalformedKeyLine,
            KeyError::PathNotFound(_) => ErrorKind::PathNotFound,
            KeyError::GenerationFailed { .. } | KeyError::UnknownAccount(_) => {
                ErrorKind::GenerationFailed
            }
            KeyError::UnknownFamily(_) => ErrorKind::Config,
            KeyError::ReadFailed { .. } => ErrorKind::Io,
        }
    }
}

/// Shared catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable at {}: {source}", .location.display())]
    Unavailable {
        location: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog identifier: {0:?} (expected role@cluster)")]
    InvalidIdentifier(String),

    #[error("invalid catalog value for {id}: {reason}")]
    InvalidValue { id: String, reason: String },
}

/// Host configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors writing trust artifacts to disk.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("directory for trust file does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some targets could not be written; the others were.
    #[error("{source} ({} trust files applied)", .applied.len())]
    Partial {
        /// Targets now in sync with the plan.
        applied: Vec<PathBuf>,
        /// Targets whose contents changed.
        written: Vec<PathBuf>,
        #[source]
        source: Box<Error>,
    },
}

/// Stage of a reconciliation pass, used to report where a pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Parse,
    Publish,
    Resolve,
    Render,
    Apply,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Generate => "generate",
            Stage::Parse => "parse",
            Stage::Publish => "publish",
            Stage::Resolve => "resolve",
            Stage::Render => "render",
            Stage::Apply => "apply",
        };
        f.write_str(name)
    }
}

/// A failed reconciliation pass for one host.
#[derive(Debug, Error)]
#[error("{stage} failed for {id}: {source}")]
pub struct PassError {
    pub stage: Stage,
    /// Catalog identifier (or host cluster id) the failing stage was working on.
    pub id: String,
    #[source]
    pub source: Box<Error>,
    /// Trust files already written when the stage failed.
    pub written: Vec<PathBuf>,
}

impl PassError {
    pub fn new(stage: Stage, id: impl Into<String>, source: impl Into<Error>) -> Self {
        Self {
            stage,
            id: id.into(),
            source: Box::new(source.into()),
            written: Vec::new(),
        }
    }

    pub fn with_written(mut self, written: Vec<PathBuf>) -> Self {
        self.written = written;
        self
    }
}

pub type Result<T> = std::result::Result<T, Error>;
