//! Host configuration file management.
//!
//! Handles reading and validating `keyferry.toml`: what this host exports to
//! the catalog and which catalog entries it trusts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::{is_valid_component, CatalogId};
use crate::core::keys::KeyConfig;
use crate::core::types::{AccountName, ClusterId, Role};
use crate::error::{ConfigError, Result};

/// Host configuration stored in `keyferry.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Identity of this host and where shared state lives.
    pub host: HostSection,
    /// Keys this host publishes.
    #[serde(default, rename = "export")]
    pub exports: Vec<Export>,
    /// authorized_keys rules.
    #[serde(default)]
    pub authorize: Vec<AuthorizeRule>,
    /// known_hosts rules.
    #[serde(default)]
    pub known_hosts: Vec<KnownHostsRule>,
}

/// `[host]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSection {
    /// Cluster (host) half of every identifier this host exports.
    pub cluster: ClusterId,
    /// Shared catalog directory.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Where the previous render is remembered.
    #[serde(default = "default_state")]
    pub state: PathBuf,
}

/// One `[[export]]` entry.
///
/// Either a user key (`user`, `type`, `dir`) that is generated if missing, or
/// an existing public-key file published by `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export {
    pub role: Role,
    /// Owning account; defaults to `role`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountName>,
    /// Publish this file instead of ensuring a user key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub key: KeyConfig,
}

impl Export {
    /// Account that owns the key.
    pub fn owner(&self) -> &str {
        self.user.as_deref().unwrap_or(&self.role)
    }
}

/// One `[[authorize]]` rule: let `role` keys log in as `user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeRule {
    pub user: AccountName,
    pub role: Role,
    /// Restrict to these clusters; empty means any.
    #[serde(default)]
    pub clusters: Vec<ClusterId>,
    /// authorized_keys file; `~user/.ssh/authorized_keys` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
}

/// One `[[known_hosts]]` rule: trust `role` keys as host keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownHostsRule {
    pub role: Role,
    #[serde(default)]
    pub clusters: Vec<ClusterId>,
    pub target: PathBuf,
    /// Host pattern template; `{cluster}` and `{role}` are substituted.
    #[serde(default = "default_host_pattern")]
    pub host_pattern: String,
}

fn default_catalog() -> PathBuf {
    PathBuf::from(constants::CATALOG_DIR)
}

fn default_state() -> PathBuf {
    PathBuf::from(constants::STATE_FILE)
}

fn default_host_pattern() -> String {
    "{cluster}".to_string()
}

impl Config {
    /// Minimal configuration for `cluster` with default locations.
    pub fn new(cluster: &str) -> Self {
        Self {
            host: HostSection {
                cluster: cluster.to_string(),
                catalog: default_catalog(),
                state: default_state(),
            },
            exports: Vec::new(),
            authorize: Vec::new(),
            known_hosts: Vec::new(),
        }
    }

    /// Load configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = Self::from_toml(&contents)?;

        debug!(
            cluster = %config.host.cluster,
            exports = config.exports.len(),
            authorize = config.authorize.len(),
            known_hosts = config.known_hosts.len(),
            "config loaded"
        );

        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Catalog identifier for an export of this host.
    pub fn export_id(&self, export: &Export) -> Result<CatalogId> {
        CatalogId::new(&export.role, &self.host.cluster)
    }

    /// Validate the configuration structure and contents
    ///
    /// Checks:
    /// - The cluster id and all roles are valid identifier components
    /// - No two exports share a role
    /// - Path exports carry no key options
    /// - Cluster filters are valid identifier components
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` or `ConfigError::MissingField` on validation failure.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.host.cluster.is_empty() {
            return Err(ConfigError::MissingField {
                field: "host.cluster",
            }
            .into());
        }
        check_component("host.cluster", &self.host.cluster)?;

        let mut roles: Vec<&str> = Vec::new();
        for export in &self.exports {
            check_component("export.role", &export.role)?;
            if roles.contains(&export.role.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "export.role",
                    reason: format!("role '{}' exported twice", export.role),
                }
                .into());
            }
            roles.push(&export.role);

            if export.path.is_some()
                && (export.user.is_some() || export.key.family.is_some() || export.key.dir.is_some())
            {
                return Err(ConfigError::InvalidValue {
                    field: "export.path",
                    reason: format!(
                        "export '{}' sets path together with user/type/dir",
                        export.role
                    ),
                }
                .into());
            }
            if let Some(path) = &export.path {
                if !path.is_absolute() {
                    return Err(ConfigError::InvalidValue {
                        field: "export.path",
                        reason: format!("'{}' is not absolute", path.display()),
                    }
                    .into());
                }
            }
        }

        for rule in &self.authorize {
            check_component("authorize.role", &rule.role)?;
            if rule.user.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "authorize.user",
                }
                .into());
            }
            for cluster in &rule.clusters {
                check_component("authorize.clusters", cluster)?;
            }
        }

        for rule in &self.known_hosts {
            check_component("known_hosts.role", &rule.role)?;
            for cluster in &rule.clusters {
                check_component("known_hosts.clusters", cluster)?;
            }
            if rule.host_pattern.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "known_hosts.host_pattern",
                }
                .into());
            }
        }

        Ok(())
    }
}

fn check_component(field: &'static str, value: &str) -> Result<()> {
    if !is_valid_component(value) {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{}' must be non-empty and use only A-Z, a-z, 0-9, '_', '.', '-'", value),
        }
        .into());
    }
    Ok(())
}
