//! Domain types.

mod artifact;
mod export;
mod family;
mod identifier;
pub mod key_record;

pub use artifact::{managed_marker, RenderPlan, TrustArtifact};
pub use export::{read_key_file, ExportValue};
pub use family::{key_path, KeyFamily};
pub use identifier::{is_valid_component, CatalogId};
pub use key_record::{flatten_lines, KeyRecord};
