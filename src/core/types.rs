//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A local account name (e.g., `postgres`, `pgbackup`).
pub type AccountName = String;

/// The role half of a catalog identifier (e.g., `pgbackup`, `host`).
pub type Role = String;

/// The host/cluster half of a catalog identifier (e.g., `psql01`).
pub type ClusterId = String;

/// Opaque base64 key material from a public-key line.
pub type Material = String;
