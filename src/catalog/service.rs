//! Catalog facade.
//!
//! Sits between callers and the song store: validates input, classifies
//! empty and missing results, and turns storage errors into
//! `CatalogError::StorageFailure`.

use super::error::{CatalogError, CatalogResult};
use super::projection::{SongDetails, SongDisplay};
use super::query::{build_page_request, CatalogSettings, SongQuery, SongSearch};
use crate::catalog_store::{
    validate_song, validate_song_stats, Page, Song, SongFilter, SongSort, SongStats, SongStore,
    StoreError,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct SongCatalog {
    store: Arc<dyn SongStore>,
    settings: CatalogSettings,
}

fn storage_failure(operation: &str, err: StoreError) -> CatalogError {
    error!("Storage failure during {}: {:?}", operation, err);
    CatalogError::StorageFailure(format!("Storage failure during {}", operation))
}

impl SongCatalog {
    pub fn new(store: Arc<dyn SongStore>, settings: CatalogSettings) -> Self {
        SongCatalog { store, settings }
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// All songs, most popular first.
    pub fn list_all(&self, page: Option<i64>, size: Option<i64>) -> CatalogResult<Page<SongDisplay>> {
        let page_request = build_page_request(page, size, &self.settings)?;
        info!(
            "Listing songs, page {} size {}",
            page_request.page_index + 1,
            page_request.page_size
        );
        let songs = self
            .store
            .find_all_by_popularity(page_request)
            .map_err(|e| storage_failure("song listing", e))?;
        into_display_page(songs, "No songs found")
    }

    /// Filtered and sorted search.
    pub fn search(&self, query: &SongQuery) -> CatalogResult<Page<SongDisplay>> {
        let SongSearch {
            page_request,
            sort,
            filter,
        } = query.build(&self.settings)?;
        info!(
            "Searching songs, page {} size {} sort {} {}",
            page_request.page_index + 1,
            page_request.page_size,
            sort.field.attribute_name(),
            sort.direction.as_sql()
        );
        let songs = self
            .store
            .find_filtered(page_request, sort, &filter)
            .map_err(|e| storage_failure("song search", e))?;
        into_display_page(songs, "No songs match the given criteria")
    }

    /// Songs whose track name starts with `name`, most popular first.
    pub fn search_by_name_prefix(
        &self,
        name: &str,
        page: Option<i64>,
        size: Option<i64>,
    ) -> CatalogResult<Page<SongDisplay>> {
        let filter = SongFilter {
            track_name_prefix: name.trim().to_string(),
            ..Default::default()
        };
        self.search_by_name(name, filter, page, size)
    }

    /// Songs whose track name contains `name`, most popular first.
    pub fn search_by_name_substring(
        &self,
        name: &str,
        page: Option<i64>,
        size: Option<i64>,
    ) -> CatalogResult<Page<SongDisplay>> {
        let filter = SongFilter {
            track_name: name.trim().to_string(),
            ..Default::default()
        };
        self.search_by_name(name, filter, page, size)
    }

    fn search_by_name(
        &self,
        name: &str,
        filter: SongFilter,
        page: Option<i64>,
        size: Option<i64>,
    ) -> CatalogResult<Page<SongDisplay>> {
        let page_request = build_page_request(page, size, &self.settings)?;
        info!("Searching songs by name '{}'", name);
        let songs = self
            .store
            .find_filtered(page_request, SongSort::BY_POPULARITY_DESC, &filter)
            .map_err(|e| storage_failure("name search", e))?;
        into_display_page(songs, &format!("No songs found with name '{}'", name))
    }

    // =========================================================================
    // Single records
    // =========================================================================

    pub fn get_by_isrc(&self, isrc: &str) -> CatalogResult<SongDetails> {
        info!("Fetching song {}", isrc);
        match self.store.find_by_isrc(isrc) {
            Ok(Some(song)) => Ok(song.into()),
            Ok(None) => {
                warn!("Song {} not found", isrc);
                Err(CatalogError::NotFound(format!(
                    "Song with ISRC '{}' not found",
                    isrc
                )))
            }
            Err(e) => Err(storage_failure("song lookup", e)),
        }
    }

    pub fn create(&self, details: SongDetails) -> CatalogResult<SongDetails> {
        let song = Song::from(details);
        validate_song(&song).map_err(|e| CatalogError::InvalidSong(e.to_string()))?;
        info!("Creating song {}", song.isrc);

        let existing = self
            .store
            .find_by_isrc(&song.isrc)
            .map_err(|e| storage_failure("song creation", e))?;
        if existing.is_some() {
            return Err(already_exists(&song.isrc));
        }

        match self.store.insert(&song) {
            Ok(persisted) => Ok(persisted.into()),
            Err(StoreError::DuplicateKey(isrc)) => Err(already_exists(&isrc)),
            Err(e) => Err(storage_failure("song creation", e)),
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn get_song_stats(&self, isrc: &str) -> CatalogResult<SongStats> {
        info!("Fetching stats for song {}", isrc);
        self.require_song(isrc, "stats lookup")?;
        self.store
            .find_stats(isrc)
            .map_err(|e| storage_failure("stats lookup", e))?
            .ok_or_else(|| {
                warn!("No stats recorded for song {}", isrc);
                CatalogError::NotFound(format!("No stats recorded for song '{}'", isrc))
            })
    }

    pub fn create_song_stats(&self, isrc: &str, mut stats: SongStats) -> CatalogResult<SongStats> {
        stats.isrc = isrc.to_string();
        validate_song_stats(&stats).map_err(|e| CatalogError::InvalidSong(e.to_string()))?;
        info!("Recording stats for song {}", isrc);

        self.require_song(isrc, "stats creation")?;
        match self.store.insert_stats(&stats) {
            Ok(persisted) => Ok(persisted),
            Err(StoreError::DuplicateKey(isrc)) => Err(CatalogError::AlreadyExists(format!(
                "Stats for song '{}' already exist",
                isrc
            ))),
            Err(e) => Err(storage_failure("stats creation", e)),
        }
    }

    fn require_song(&self, isrc: &str, operation: &str) -> CatalogResult<()> {
        match self.store.find_by_isrc(isrc) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => {
                warn!("Song {} not found", isrc);
                Err(CatalogError::NotFound(format!(
                    "Song with ISRC '{}' not found",
                    isrc
                )))
            }
            Err(e) => Err(storage_failure(operation, e)),
        }
    }
}

fn already_exists(isrc: &str) -> CatalogError {
    warn!("Song {} already exists", isrc);
    CatalogError::AlreadyExists(format!("Song with ISRC '{}' already exists", isrc))
}

fn into_display_page(songs: Page<Song>, empty_message: &str) -> CatalogResult<Page<SongDisplay>> {
    if songs.is_empty() {
        warn!("{}", empty_message);
        return Err(CatalogError::EmptyResult(empty_message.to_string()));
    }
    Ok(songs.map(SongDisplay::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::{PageRequest, SqliteSongStore, StoreResult, TrackInfo};
    use anyhow::anyhow;
    use tempfile::TempDir;

    fn make_catalog() -> (TempDir, SongCatalog) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteSongStore::new(temp_dir.path().join("catalog.db"), 1).unwrap();
        (
            temp_dir,
            SongCatalog::new(Arc::new(store), CatalogSettings::default()),
        )
    }

    fn details(isrc: &str, name: &str, popularity: i32) -> SongDetails {
        SongDetails {
            isrc: isrc.to_string(),
            track_name: Some(name.to_string()),
            popularity: Some(popularity),
            ..Default::default()
        }
    }

    /// Store whose every call fails.
    struct BrokenStore;

    impl SongStore for BrokenStore {
        fn find_by_isrc(&self, _isrc: &str) -> StoreResult<Option<Song>> {
            Err(anyhow!("disk on fire").into())
        }

        fn find_stats(&self, _isrc: &str) -> StoreResult<Option<SongStats>> {
            Err(anyhow!("disk on fire").into())
        }

        fn find_filtered(
            &self,
            _page: PageRequest,
            _sort: SongSort,
            _filter: &SongFilter,
        ) -> StoreResult<Page<Song>> {
            Err(anyhow!("disk on fire").into())
        }

        fn count(&self) -> StoreResult<usize> {
            Err(anyhow!("disk on fire").into())
        }

        fn insert(&self, _song: &Song) -> StoreResult<Song> {
            Err(anyhow!("disk on fire").into())
        }

        fn insert_stats(&self, _stats: &SongStats) -> StoreResult<SongStats> {
            Err(anyhow!("disk on fire").into())
        }
    }

    /// Store that never sees an existing record but rejects every insert as a
    /// duplicate, like a concurrent writer winning the race.
    struct RacingStore;

    impl SongStore for RacingStore {
        fn find_by_isrc(&self, _isrc: &str) -> StoreResult<Option<Song>> {
            Ok(None)
        }

        fn find_stats(&self, _isrc: &str) -> StoreResult<Option<SongStats>> {
            Ok(None)
        }

        fn find_filtered(
            &self,
            page: PageRequest,
            _sort: SongSort,
            _filter: &SongFilter,
        ) -> StoreResult<Page<Song>> {
            Ok(Page::new(vec![], page, 0))
        }

        fn count(&self) -> StoreResult<usize> {
            Ok(0)
        }

        fn insert(&self, song: &Song) -> StoreResult<Song> {
            Err(StoreError::DuplicateKey(song.isrc.clone()))
        }

        fn insert_stats(&self, stats: &SongStats) -> StoreResult<SongStats> {
            Err(StoreError::DuplicateKey(stats.isrc.clone()))
        }
    }

    #[test]
    fn test_create_then_get() {
        let (_dir, catalog) = make_catalog();
        let created = catalog.create(details("A1", "Song", 40)).unwrap();
        assert_eq!(created, details("A1", "Song", 40));
        assert_eq!(catalog.get_by_isrc("A1").unwrap(), created);
    }

    #[test]
    fn test_create_duplicate_keeps_original() {
        let (_dir, catalog) = make_catalog();
        catalog.create(details("A1", "First", 40)).unwrap();
        let err = catalog.create(details("A1", "Second", 90)).unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyExists(_)));
        assert_eq!(
            catalog.get_by_isrc("A1").unwrap().track_name.as_deref(),
            Some("First")
        );
    }

    #[test]
    fn test_create_rejects_blank_isrc() {
        let (_dir, catalog) = make_catalog();
        let err = catalog.create(details("  ", "Blank", 1)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSong(_)));
    }

    #[test]
    fn test_duplicate_key_race_is_already_exists() {
        let catalog = SongCatalog::new(Arc::new(RacingStore), CatalogSettings::default());
        let err = catalog.create(details("A1", "Song", 40)).unwrap_err();
        assert!(matches!(err, CatalogError::AlreadyExists(_)));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_dir, catalog) = make_catalog();
        assert!(matches!(
            catalog.get_by_isrc("NOPE"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_catalog_listing_is_empty_result() {
        let (_dir, catalog) = make_catalog();
        assert!(matches!(
            catalog.list_all(None, None),
            Err(CatalogError::EmptyResult(_))
        ));
    }

    #[test]
    fn test_search_with_bad_sort_field_never_reaches_store() {
        let catalog = SongCatalog::new(Arc::new(BrokenStore), CatalogSettings::default());
        let query = SongQuery {
            sort_by: Some("nonsense".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            catalog.search(&query),
            Err(CatalogError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_storage_errors_are_translated() {
        let catalog = SongCatalog::new(Arc::new(BrokenStore), CatalogSettings::default());

        let results = [
            catalog.list_all(None, None).map(|_| ()),
            catalog.search(&SongQuery::default()).map(|_| ()),
            catalog.search_by_name_prefix("a", None, None).map(|_| ()),
            catalog.search_by_name_substring("a", None, None).map(|_| ()),
            catalog.get_by_isrc("A1").map(|_| ()),
            catalog.create(details("A1", "Song", 1)).map(|_| ()),
            catalog.get_song_stats("A1").map(|_| ()),
            catalog
                .create_song_stats("A1", SongStats::default())
                .map(|_| ()),
        ];
        for result in results {
            match result {
                Err(CatalogError::StorageFailure(message)) => {
                    assert!(!message.contains("disk on fire"))
                }
                other => panic!("Expected StorageFailure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_stats_lifecycle() {
        let (_dir, catalog) = make_catalog();

        let stats = SongStats {
            all_time_rank: Some(1),
            spotify_streams: Some(390_470_936),
            ..Default::default()
        };
        assert!(matches!(
            catalog.create_song_stats("A1", stats.clone()),
            Err(CatalogError::NotFound(_))
        ));

        catalog.create(details("A1", "Song", 10)).unwrap();
        assert!(matches!(
            catalog.get_song_stats("A1"),
            Err(CatalogError::NotFound(_))
        ));

        let created = catalog.create_song_stats("A1", stats).unwrap();
        assert_eq!(created.isrc, "A1");
        assert_eq!(catalog.get_song_stats("A1").unwrap(), created);

        assert!(matches!(
            catalog.create_song_stats("A1", SongStats::default()),
            Err(CatalogError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_name_searches_use_popularity_order() {
        let (_dir, catalog) = make_catalog();
        catalog.create(details("A", "Love Me Do", 20)).unwrap();
        catalog.create(details("B", "Lovesong", 80)).unwrap();

        let page = catalog.search_by_name_prefix("love", None, None).unwrap();
        let isrcs: Vec<_> = page.content.iter().map(|s| s.isrc.as_str()).collect();
        assert_eq!(isrcs, vec!["B", "A"]);
    }

    #[test]
    fn test_unused_track_fields_survive_creation() {
        let (_dir, catalog) = make_catalog();
        let song = Song {
            isrc: "Z9".to_string(),
            track: TrackInfo {
                preview_url: Some("https://p.scdn.co/mp3-preview/abc".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let created = catalog.create(song.clone().into()).unwrap();
        assert_eq!(Song::from(created), song);
    }
}
