mod models;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteSongStore;
pub use trait_def::{SongStore, StoreError, StoreResult};
pub use validation::{validate_song, validate_song_stats, ValidationError, ValidationResult};
