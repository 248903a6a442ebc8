//! Catalog maintenance commands.
//!
//! List, retire, dump, and load catalog entries.

mod dump;
mod list;
mod load;
mod rm;

// Re-export command functions
pub use dump::execute as dump;
pub use list::execute as list;
pub use load::execute as load;
pub use rm::execute as rm;
