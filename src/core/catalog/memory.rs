//! In-process catalog.

use std::sync::{PoisonError, RwLock};

use tracing::trace;

use super::{Catalog, Snapshot};
use crate::core::domain::{CatalogId, ExportValue};
use crate::error::Result;

/// Catalog held in memory, shared between hosts simulated in one process.
#[derive(Debug, Default)]
pub struct Memory {
    entries: RwLock<Snapshot>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Catalog for Memory {
    fn publish(&self, id: &CatalogId, value: &ExportValue) -> Result<()> {
        trace!(%id, "publishing to memory catalog");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), value.clone());
        Ok(())
    }

    fn lookup(&self, id: &CatalogId) -> Result<Option<ExportValue>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    fn snapshot(&self) -> Result<Snapshot> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn remove(&self, id: &CatalogId) -> Result<bool> {
        Ok(self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some())
    }
}
