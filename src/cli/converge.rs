//! Converge command - repeat passes until nothing changes.

use std::path::PathBuf;

use tracing::warn;

use crate::cli::output;
use crate::cli::pass::print_report;
use crate::core::catalog;
use crate::core::config::Config;
use crate::core::keys::default_generator;
use crate::core::orchestrator::{Host, Orchestrator};
use crate::error::{ConfigError, Error, Result};

/// Converge every host in `configs` against the first host's catalog.
pub fn execute(configs: &[PathBuf], max_passes: usize) -> Result<()> {
    let mut hosts = configs
        .iter()
        .map(|path| Config::load(path).and_then(Host::open))
        .collect::<Result<Vec<_>>>()?;

    let Some(first) = hosts.first() else {
        return Err(ConfigError::MissingField { field: "config" }.into());
    };
    let location = first.config.host.catalog.clone();
    for host in &hosts[1..] {
        if host.config.host.catalog != location {
            warn!(
                cluster = %host.cluster(),
                catalog = %host.config.host.catalog.display(),
                "host configures a different catalog, using {}",
                location.display()
            );
        }
    }

    let catalog = catalog::open(&location);
    let generator = default_generator();
    let result = Orchestrator::new(&catalog, generator.as_ref())
        .with_max_passes(max_passes)
        .converge(&mut hosts);

    for host in &hosts {
        host.persist()?;
    }

    for report in &result.reports {
        print_report(report);
    }

    if result.fixpoint {
        output::success(&format!("converged after {} passes", output::count(result.passes)));
    } else {
        output::warn(&format!("no fixpoint after {} passes", result.passes));
        output::hint("raise --max-passes or check the failing hosts");
    }

    let mut failures = result.failures.into_iter();
    let Some(first_failure) = failures.next() else {
        return Ok(());
    };
    for failure in failures {
        output::error(&failure.to_string());
    }
    Err(Error::Pass(first_failure))
}
