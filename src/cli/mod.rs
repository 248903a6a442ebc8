//! Command-line interface.

pub mod catalog;
pub mod completions;
pub mod converge;
pub mod key_path;
pub mod keygen;
pub mod lookup;
pub mod output;
pub mod parse;
pub mod pass;
pub mod publish;
pub mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::domain::{CatalogId, KeyFamily};
use crate::error::Result;

/// Keyferry - SSH trust bootstrap for database and backup hosts.
#[derive(Parser)]
#[command(
    name = "keyferry",
    about = "Publish SSH public keys to a shared catalog and render trust from it",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Host configuration file location.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Host configuration file
    #[arg(long, env = constants::CONFIG_ENV, default_value = constants::CONFIG_FILE)]
    pub config: PathBuf,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        Config::load(&self.config)
    }
}

/// Catalog location for commands that work on the catalog directly.
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Shared catalog directory
    #[arg(long, global = true, env = constants::CATALOG_ENV, default_value = constants::CATALOG_DIR)]
    pub catalog: PathBuf,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Parse a public-key line into its parts
    Parse {
        /// Key line; read from stdin when neither LINE nor --file is given
        #[arg(conflicts_with = "file")]
        line: Option<String>,
        /// Read the key from a file (multi-line files are joined)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print where a key of the given type lives in a directory
    KeyPath {
        /// Key directory
        #[arg(long)]
        dir: PathBuf,
        /// Key type
        #[arg(long = "type", value_enum, default_value_t = KeyFamily::Ed25519)]
        family: KeyFamily,
        /// Print the private key path instead of the public one
        #[arg(long)]
        private: bool,
    },

    /// Make sure an account has a key pair, generating it if missing
    Keygen {
        /// Owning account (defaults to the current user)
        #[arg(long)]
        user: Option<String>,
        /// Key type
        #[arg(long = "type", value_enum, default_value_t = KeyFamily::Ed25519)]
        family: KeyFamily,
        /// Key directory (defaults to ~user/.ssh)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a key to the catalog under ID (role@cluster)
    Publish {
        /// Catalog identifier
        id: CatalogId,
        /// Publish this account's key (generated if missing)
        #[arg(long, conflicts_with = "path")]
        user: Option<String>,
        /// Key type
        #[arg(long = "type", value_enum, default_value_t = KeyFamily::Ed25519)]
        family: KeyFamily,
        /// Key directory (defaults to ~user/.ssh)
        #[arg(long, conflicts_with = "path")]
        dir: Option<PathBuf>,
        /// Publish a reference to an existing public-key file
        #[arg(long)]
        path: Option<PathBuf>,
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Show the catalog entry for ID
    Lookup {
        /// Catalog identifier
        id: CatalogId,
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Inspect and maintain the shared catalog
    Catalog {
        #[command(flatten)]
        catalog: CatalogArgs,
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Show the trust entries this host would render (no changes made)
    Render {
        #[command(flatten)]
        config: ConfigArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one reconciliation pass for this host
    Pass {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Run passes until nothing changes
    Converge {
        /// Host configuration files; all hosts share the first one's catalog
        #[arg(
            long = "config",
            env = constants::CONFIG_ENV,
            default_value = constants::CONFIG_FILE
        )]
        configs: Vec<PathBuf>,
        /// Give up after this many passes
        #[arg(long, default_value_t = constants::MAX_PASSES)]
        max_passes: usize,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub enum CatalogAction {
    /// List catalog entries
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Retire an entry; hosts drop its trust on their next pass
    Rm {
        /// Catalog identifier
        id: CatalogId,
    },

    /// Print the catalog as `id = value` lines
    Dump,

    /// Publish every `id = value` line of FILE
    Load {
        /// Flat catalog file
        file: PathBuf,
    },
}

/// Execute a command.
pub fn execute(command: Command) -> Result<()> {
    use Command::*;

    match command {
        Parse { line, file, json } => parse::execute(line, file, json),
        KeyPath {
            dir,
            family,
            private,
        } => key_path::execute(&dir, family, private),
        Keygen {
            user,
            family,
            dir,
            json,
        } => keygen::execute(user, family, dir, json),
        Publish {
            id,
            user,
            family,
            dir,
            path,
            catalog,
        } => publish::execute(&id, user, family, dir, path, &catalog.catalog),
        Lookup { id, catalog } => lookup::execute(&id, &catalog.catalog),
        Catalog {
            catalog: location,
            action,
        } => match action {
            CatalogAction::List { json } => catalog::list(&location.catalog, json),
            CatalogAction::Rm { id } => catalog::rm(&location.catalog, &id),
            CatalogAction::Dump => catalog::dump(&location.catalog),
            CatalogAction::Load { file } => catalog::load(&location.catalog, &file),
        },
        Render { config, json } => render::execute(&config.load()?, json),
        Pass { config } => pass::execute(config.load()?),
        Converge {
            configs,
            max_passes,
        } => converge::execute(&configs, max_passes),
        Completions { shell } => completions::execute(shell),
    }
}
