//! Constants used throughout keyferry.
//!
//! Centralizes default paths, file names and environment variable names.

/// Default host configuration file.
pub const CONFIG_FILE: &str = "/etc/keyferry/keyferry.toml";

/// Default location of the shared export catalog.
pub const CATALOG_DIR: &str = "/var/cache/keyferry/catalog";

/// Default location of the per-host render state.
pub const STATE_FILE: &str = "/var/lib/keyferry/rendered.json";

/// SSH directory relative to an account's home.
pub const SSH_DIR: &str = ".ssh";

/// Authorized keys file name inside the SSH directory.
pub const AUTHORIZED_KEYS_FILE: &str = "authorized_keys";

/// Account database consulted for accounts other than the current user.
pub const PASSWD_FILE: &str = "/etc/passwd";

/// Marker prefix appended to every line keyferry manages in a trust file.
///
/// The catalog identifier follows directly (`keyferry:pgbackup@backup01`).
pub const MANAGED_MARKER: &str = "keyferry:";

/// Upper bound on passes the orchestrator runs before giving up on a fixpoint.
pub const MAX_PASSES: usize = 10;

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV: &str = "KEYFERRY_CONFIG";

/// Environment variable overriding the catalog location.
pub const CATALOG_ENV: &str = "KEYFERRY_CATALOG";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "KEYFERRY_LOG";
