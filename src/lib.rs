//! Keyferry - SSH trust bootstrap for database and backup hosts.
//!
//! Every host publishes its public keys into a shared catalog under
//! `role@cluster` identifiers and renders the entries it trusts into
//! `authorized_keys` and `known_hosts`.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── parse         # Parse public-key lines
//! │   ├── keygen        # Ensure a key pair exists
//! │   ├── publish       # Publish / look up catalog entries
//! │   ├── catalog       # Inspect and maintain the catalog
//! │   ├── render        # Dry-run trust rendering
//! │   ├── pass          # One reconciliation pass
//! │   ├── converge      # Passes until fixpoint
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── domain/       # KeyRecord, CatalogId, ExportValue, TrustArtifact
//!     ├── keys/         # KeyStore and the Generator trait
//!     │   └── generator # ssh-keygen implementation
//!     ├── catalog/      # Catalog trait
//!     │   ├── memory    # In-process catalog
//!     │   └── fs        # Directory catalog
//!     ├── account       # Account home lookup
//!     ├── config        # keyferry.toml management
//!     ├── distributor   # Catalog → trust artifacts
//!     ├── apply         # Trust artifacts → files
//!     ├── state         # Previous render
//!     └── orchestrator  # Passes and convergence
//! ```
//!
//! # Features
//!
//! - Tolerant public-key line parsing (options, security keys, comments)
//! - Generate-if-missing key pairs, never overwriting private keys
//! - Lock-free shared catalog, one entry per identifier
//! - Managed lines only; hand-written trust entries are left alone
//! - Removal of trust for identifiers retired from the catalog

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::catalog::{Catalog, Directory, Memory, Snapshot};
pub use crate::core::domain::{CatalogId, ExportValue, KeyFamily, KeyRecord, RenderPlan, TrustArtifact};
pub use crate::core::orchestrator::{Convergence, Host, Orchestrator, PassReport};
pub use crate::error::{Error, ErrorKind, Result};
