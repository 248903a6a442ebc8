//! Pass command - one reconciliation pass for this host.

use crate::cli::output;
use crate::core::catalog;
use crate::core::config::Config;
use crate::core::keys::default_generator;
use crate::core::orchestrator::{Host, Orchestrator, PassReport};
use crate::error::Result;

/// Run a pass and persist the render state.
pub fn execute(config: Config) -> Result<()> {
    let catalog = catalog::open(&config.host.catalog);
    let generator = default_generator();
    let orchestrator = Orchestrator::new(&catalog, generator.as_ref());

    let mut host = Host::open(config)?;
    let report = match orchestrator.pass(&mut host) {
        Ok(report) => report,
        Err(e) => {
            if !e.written.is_empty() {
                host.persist()?;
                for path in &e.written {
                    output::kv("wrote:    ", output::path(path.display()));
                }
            }
            return Err(e.into());
        }
    };
    host.persist()?;

    print_report(&report);
    Ok(())
}

pub(crate) fn print_report(report: &PassReport) {
    if !report.changed {
        output::success(&format!("{} up to date", report.cluster));
        return;
    }

    output::success(&format!("{} reconciled", report.cluster));
    for id in &report.published {
        output::kv("published:", output::id(id));
    }
    for path in &report.written {
        output::kv("wrote:    ", output::path(path.display()));
    }
    output::kv("trusted:  ", report.rendered);
    if report.removed > 0 {
        output::kv("removed:  ", report.removed);
    }
}
