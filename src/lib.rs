//! Song Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::{CatalogError, CatalogSettings, SongCatalog};
pub use catalog_store::{SongStore, SqliteSongStore};
pub use server::{make_app, run_server, RequestsLoggingLevel};
