//! Read/write contract for the `sessions-index.json` file Claude Code keeps
//! in every workspace log directory.
//!
//! Only the entry fields the stitcher writes are modeled; everything else in
//! the file is carried through unchanged.

pub mod catalog;
pub mod error;

pub use catalog::{CATALOG_FILE, CatalogEntry, SessionCatalog};
pub use error::{Error, Result};
