//! SQLite-backed song store implementation.
//!
//! Writes go through a single connection, reads are spread over a small pool
//! of read-only connections. Paginated reads run the count and the page query
//! in one read transaction.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::{SongStore, StoreError, StoreResult};
use anyhow::{anyhow, Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, ErrorCode, OpenFlags, Row};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

const SONG_COLUMNS: &str = "isrc, track_name, track_uri, artist_uris, artist_names, \
     album_uri, album_name, album_artist_uris, album_artist_names, album_release_date, \
     album_image_url, disc_number, track_number, track_duration_ms, track_preview_url, \
     explicit, popularity, added_by, added_at, artist_genres, danceability, energy, \
     musical_key, loudness, mode, speechiness, acousticness, instrumentalness, liveness, \
     valence, tempo, time_signature, album_genres, label, copyrights";

const STATS_COLUMNS: &str = "isrc, track, album_name, artist, release_date, all_time_rank, \
     track_score, spotify_streams, spotify_playlist_count, spotify_playlist_reach, \
     spotify_popularity, youtube_views, youtube_likes, tiktok_posts, tiktok_likes, \
     tiktok_views, youtube_playlist_reach, apple_music_playlist_count, airplay_spins, \
     siriusxm_spins, deezer_playlist_count, deezer_playlist_reach, amazon_playlist_count, \
     pandora_streams, pandora_track_stations, soundcloud_streams, shazam_counts, \
     tidal_popularity, explicit_track";

/// Unicode-aware lowercase, SQLite's builtin LOWER only folds ASCII.
const LOWER_FN: &str = "catalog_lower";

/// SQLite-backed song store.
#[derive(Clone)]
pub struct SqliteSongStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

/// Creates the latest schema on an empty database, validates it otherwise.
fn ensure_schema(conn: &Connection) -> Result<()> {
    let latest_schema = CATALOG_VERSIONED_SCHEMAS
        .last()
        .ok_or_else(|| anyhow!("No catalog schema defined"))?;

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!(
            "Creating catalog db schema at version {}",
            latest_schema.version
        );
        return latest_schema.create(conn);
    }

    latest_schema
        .validate(conn)
        .context("Catalog database does not match the expected schema")
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|s| s.to_lowercase()))
        },
    )?;
    Ok(())
}

fn lock(conn: &Mutex<Connection>) -> StoreResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StoreError::Other(anyhow!("Catalog connection mutex poisoned")))
}

/// Escapes LIKE wildcards so caller patterns match literally.
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn map_insert_error(err: rusqlite::Error, isrc: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.code == ErrorCode::ConstraintViolation
            && (e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
        {
            return StoreError::DuplicateKey(isrc.to_string());
        }
    }
    StoreError::Database(err)
}

/// WHERE clause under construction, with positional values in order.
#[derive(Default)]
struct Predicates {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Predicates {
    fn from_filter(filter: &SongFilter) -> Self {
        let mut predicates = Predicates::default();
        predicates.contains("track_name", &filter.track_name);
        predicates.starts_with("track_name", &filter.track_name_prefix);
        predicates.contains("artist_names", &filter.artist_name);
        predicates.contains("album_name", &filter.album_name);
        predicates.starts_with("album_release_date", &filter.release_date_prefix);
        if filter.min_popularity > 0 {
            predicates.clauses.push("popularity >= ?".to_string());
            predicates
                .values
                .push(Value::Integer(filter.min_popularity.into()));
        }
        predicates
    }

    fn contains(&mut self, column: &str, pattern: &str) {
        if !pattern.is_empty() {
            self.like(column, format!("%{}%", escape_like(&pattern.to_lowercase())));
        }
    }

    fn starts_with(&mut self, column: &str, pattern: &str) {
        if !pattern.is_empty() {
            self.like(column, format!("{}%", escape_like(&pattern.to_lowercase())));
        }
    }

    fn like(&mut self, column: &str, pattern: String) {
        self.clauses
            .push(format!("{}({}) LIKE ? ESCAPE '\\'", LOWER_FN, column));
        self.values.push(Value::Text(pattern));
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

impl SqliteSongStore {
    /// Create a new SqliteSongStore.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file, created if missing
    /// * `read_pool_size` - Number of read-only connections (at least 1)
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path_ref))?;

        ensure_schema(&write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(&write_conn)?;

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .context("Failed to open catalog read connection")?;
            register_functions(&read_conn)?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteSongStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    // =========================================================================
    // Row Mapping
    // =========================================================================

    fn parse_song_row(row: &Row) -> rusqlite::Result<Song> {
        Ok(Song {
            isrc: row.get("isrc")?,
            track: TrackInfo {
                name: row.get("track_name")?,
                uri: row.get("track_uri")?,
                disc_number: row.get("disc_number")?,
                track_number: row.get("track_number")?,
                duration_ms: row.get("track_duration_ms")?,
                preview_url: row.get("track_preview_url")?,
                explicit: row.get("explicit")?,
                popularity: row.get("popularity")?,
            },
            artist: ArtistInfo {
                names: row.get("artist_names")?,
                uris: row.get("artist_uris")?,
                genres: row.get("artist_genres")?,
            },
            album: AlbumInfo {
                name: row.get("album_name")?,
                uri: row.get("album_uri")?,
                artist_names: row.get("album_artist_names")?,
                artist_uris: row.get("album_artist_uris")?,
                image_url: row.get("album_image_url")?,
                release_date: row.get("album_release_date")?,
                genres: row.get("album_genres")?,
                label: row.get("label")?,
                copyrights: row.get("copyrights")?,
            },
            provenance: Provenance {
                added_by: row.get("added_by")?,
                added_at: row.get("added_at")?,
            },
            audio_features: AudioFeatures {
                danceability: row.get("danceability")?,
                energy: row.get("energy")?,
                key: row.get("musical_key")?,
                loudness: row.get("loudness")?,
                mode: row.get("mode")?,
                speechiness: row.get("speechiness")?,
                acousticness: row.get("acousticness")?,
                instrumentalness: row.get("instrumentalness")?,
                liveness: row.get("liveness")?,
                valence: row.get("valence")?,
                tempo: row.get("tempo")?,
                time_signature: row.get("time_signature")?,
            },
        })
    }

    fn parse_stats_row(row: &Row) -> rusqlite::Result<SongStats> {
        Ok(SongStats {
            isrc: row.get("isrc")?,
            track: row.get("track")?,
            album_name: row.get("album_name")?,
            artist: row.get("artist")?,
            release_date: row.get("release_date")?,
            all_time_rank: row.get("all_time_rank")?,
            track_score: row.get("track_score")?,
            spotify_streams: row.get("spotify_streams")?,
            spotify_playlist_count: row.get("spotify_playlist_count")?,
            spotify_playlist_reach: row.get("spotify_playlist_reach")?,
            spotify_popularity: row.get("spotify_popularity")?,
            youtube_views: row.get("youtube_views")?,
            youtube_likes: row.get("youtube_likes")?,
            tiktok_posts: row.get("tiktok_posts")?,
            tiktok_likes: row.get("tiktok_likes")?,
            tiktok_views: row.get("tiktok_views")?,
            youtube_playlist_reach: row.get("youtube_playlist_reach")?,
            apple_music_playlist_count: row.get("apple_music_playlist_count")?,
            airplay_spins: row.get("airplay_spins")?,
            siriusxm_spins: row.get("siriusxm_spins")?,
            deezer_playlist_count: row.get("deezer_playlist_count")?,
            deezer_playlist_reach: row.get("deezer_playlist_reach")?,
            amazon_playlist_count: row.get("amazon_playlist_count")?,
            pandora_streams: row.get("pandora_streams")?,
            pandora_track_stations: row.get("pandora_track_stations")?,
            soundcloud_streams: row.get("soundcloud_streams")?,
            shazam_counts: row.get("shazam_counts")?,
            tidal_popularity: row.get("tidal_popularity")?,
            explicit_track: row.get("explicit_track")?,
        })
    }

    // =========================================================================
    // Internal Helpers (take a connection reference)
    // =========================================================================

    fn get_song_inner(conn: &Connection, isrc: &str) -> StoreResult<Option<Song>> {
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {} FROM songs WHERE isrc = ?1", SONG_COLUMNS))?;
        match stmt.query_row(params![isrc], Self::parse_song_row) {
            Ok(song) => Ok(Some(song)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_stats_inner(conn: &Connection, isrc: &str) -> StoreResult<Option<SongStats>> {
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM song_stats WHERE isrc = ?1",
            STATS_COLUMNS
        ))?;
        match stmt.query_row(params![isrc], Self::parse_stats_row) {
            Ok(stats) => Ok(Some(stats)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl SongStore for SqliteSongStore {
    fn find_by_isrc(&self, isrc: &str) -> StoreResult<Option<Song>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        Self::get_song_inner(&conn, isrc)
    }

    fn find_stats(&self, isrc: &str) -> StoreResult<Option<SongStats>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        Self::get_stats_inner(&conn, isrc)
    }

    fn find_filtered(
        &self,
        page: PageRequest,
        sort: SongSort,
        filter: &SongFilter,
    ) -> StoreResult<Page<Song>> {
        let predicates = Predicates::from_filter(filter);
        let where_clause = predicates.where_clause();

        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let tx = conn.unchecked_transaction()?;

        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM songs{}", where_clause),
            params_from_iter(predicates.values.iter()),
            |r| r.get(0),
        )?;

        // An offset past SQLite's integer range cannot hold any row.
        let songs = match page.offset() {
            Some(offset) => {
                let sql = format!(
                    "SELECT {} FROM songs{} ORDER BY {} {}, isrc ASC LIMIT ? OFFSET ?",
                    SONG_COLUMNS,
                    where_clause,
                    sort.field.column(),
                    sort.direction.as_sql()
                );
                let mut values = predicates.values.clone();
                values.push(Value::Integer(
                    i64::try_from(page.page_size).unwrap_or(i64::MAX),
                ));
                values.push(Value::Integer(offset));

                let mut stmt = tx.prepare(&sql)?;
                let rows =
                    stmt.query_map(params_from_iter(values.iter()), Self::parse_song_row)?;
                rows.collect::<Result<Vec<Song>, _>>()?
            }
            None => Vec::new(),
        };
        tx.commit()?;

        debug!(
            "Filtered scan returned {} of {} songs (page {}, size {}, unrestricted {})",
            songs.len(),
            total,
            page.page_index.saturating_add(1),
            page.page_size,
            filter.is_unrestricted()
        );
        Ok(Page::new(songs, page, total as usize))
    }

    fn count(&self) -> StoreResult<usize> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    fn insert(&self, song: &Song) -> StoreResult<Song> {
        let mut conn = lock(&self.write_conn)?;
        let tx = conn.transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO songs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, \
                 ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, \
                 ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35)",
                SONG_COLUMNS
            ),
            params![
                song.isrc,
                song.track.name,
                song.track.uri,
                song.artist.uris,
                song.artist.names,
                song.album.uri,
                song.album.name,
                song.album.artist_uris,
                song.album.artist_names,
                song.album.release_date,
                song.album.image_url,
                song.track.disc_number,
                song.track.track_number,
                song.track.duration_ms,
                song.track.preview_url,
                song.track.explicit,
                song.track.popularity,
                song.provenance.added_by,
                song.provenance.added_at,
                song.artist.genres,
                song.audio_features.danceability,
                song.audio_features.energy,
                song.audio_features.key,
                song.audio_features.loudness,
                song.audio_features.mode,
                song.audio_features.speechiness,
                song.audio_features.acousticness,
                song.audio_features.instrumentalness,
                song.audio_features.liveness,
                song.audio_features.valence,
                song.audio_features.tempo,
                song.audio_features.time_signature,
                song.album.genres,
                song.album.label,
                song.album.copyrights,
            ],
        )
        .map_err(|e| map_insert_error(e, &song.isrc))?;

        let persisted = Self::get_song_inner(&tx, &song.isrc)?.ok_or_else(|| {
            StoreError::Other(anyhow!("Song {} missing right after insert", song.isrc))
        })?;
        tx.commit()?;

        debug!("Inserted song {}", song.isrc);
        Ok(persisted)
    }

    fn insert_stats(&self, stats: &SongStats) -> StoreResult<SongStats> {
        let mut conn = lock(&self.write_conn)?;
        let tx = conn.transaction()?;

        tx.execute(
            &format!(
                "INSERT INTO song_stats ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, \
                 ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, \
                 ?26, ?27, ?28, ?29)",
                STATS_COLUMNS
            ),
            params![
                stats.isrc,
                stats.track,
                stats.album_name,
                stats.artist,
                stats.release_date,
                stats.all_time_rank,
                stats.track_score,
                stats.spotify_streams,
                stats.spotify_playlist_count,
                stats.spotify_playlist_reach,
                stats.spotify_popularity,
                stats.youtube_views,
                stats.youtube_likes,
                stats.tiktok_posts,
                stats.tiktok_likes,
                stats.tiktok_views,
                stats.youtube_playlist_reach,
                stats.apple_music_playlist_count,
                stats.airplay_spins,
                stats.siriusxm_spins,
                stats.deezer_playlist_count,
                stats.deezer_playlist_reach,
                stats.amazon_playlist_count,
                stats.pandora_streams,
                stats.pandora_track_stations,
                stats.soundcloud_streams,
                stats.shazam_counts,
                stats.tidal_popularity,
                stats.explicit_track,
            ],
        )
        .map_err(|e| map_insert_error(e, &stats.isrc))?;

        let persisted = Self::get_stats_inner(&tx, &stats.isrc)?.ok_or_else(|| {
            StoreError::Other(anyhow!("Stats for {} missing right after insert", stats.isrc))
        })?;
        tx.commit()?;

        debug!("Inserted stats for song {}", stats.isrc);
        Ok(persisted)
    }
}
