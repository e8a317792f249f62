mod error;
mod projection;
mod query;
mod service;

pub use error::{CatalogError, CatalogResult};
pub use projection::{SongDetails, SongDisplay};
pub use query::{
    build_page_request, parse_direction, parse_sort_field, CatalogSettings, SongQuery, SongSearch,
    DEFAULT_MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE,
};
pub use service::SongCatalog;
