//! Keyferry - SSH trust bootstrap for database and backup hosts.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keyferry::cli::output;
use keyferry::cli::{execute, Cli};
use keyferry::core::constants;
use keyferry::error::{ConfigError, Error, ErrorKind};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("keyferry=debug")
        } else {
            EnvFilter::new("keyferry=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match (&e, e.kind()) {
            (Error::Config(ConfigError::NotFound(_)), _) => {
                Some("pass --config or set KEYFERRY_CONFIG")
            }
            (_, ErrorKind::GenerationFailed) => {
                Some("check that ssh-keygen is installed and the account exists")
            }
            (_, ErrorKind::CatalogUnavailable) => {
                Some("check the catalog directory (--catalog or KEYFERRY_CATALOG)")
            }
            (_, ErrorKind::PathNotFound) => Some("keyferry never creates key or trust directories"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
