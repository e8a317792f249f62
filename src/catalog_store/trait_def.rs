//! SongStore trait definition.
//!
//! Abstracts the record store so the catalog facade can be composed with any
//! backend at startup.

use super::models::{Page, PageRequest, Song, SongFilter, SongSort, SongStats};
use thiserror::Error;

/// Errors raised by song store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The primary key is already taken.
    #[error("Record with ISRC '{0}' already exists")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for song storage backends.
pub trait SongStore: Send + Sync {
    // =========================================================================
    // Point Lookups
    // =========================================================================

    /// Get a song by ISRC.
    fn find_by_isrc(&self, isrc: &str) -> StoreResult<Option<Song>>;

    /// Get the cross-platform statistics of a song, if any were recorded.
    fn find_stats(&self, isrc: &str) -> StoreResult<Option<SongStats>>;

    // =========================================================================
    // Paginated Scans
    // =========================================================================

    /// Get a page of songs ordered by popularity, most popular first.
    fn find_all_by_popularity(&self, page: PageRequest) -> StoreResult<Page<Song>> {
        self.find_filtered(page, SongSort::BY_POPULARITY_DESC, &SongFilter::default())
    }

    /// Get a page of songs matching `filter`, ordered by `sort`.
    ///
    /// Ties on the sort key are broken by ISRC ascending.
    fn find_filtered(
        &self,
        page: PageRequest,
        sort: SongSort,
        filter: &SongFilter,
    ) -> StoreResult<Page<Song>>;

    /// Number of songs in the store.
    fn count(&self) -> StoreResult<usize>;

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Insert a new song. Fails with `StoreError::DuplicateKey` if the ISRC
    /// is already present.
    fn insert(&self, song: &Song) -> StoreResult<Song>;

    /// Insert statistics for an existing song. Fails with
    /// `StoreError::DuplicateKey` if statistics are already present.
    fn insert_stats(&self, stats: &SongStats) -> StoreResult<SongStats>;
}
