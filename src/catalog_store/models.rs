//! Catalog models for SQLite-backed storage.
//!
//! `Song` is the persisted record, grouped into value types by concern.
//! Multi-valued attributes (artist names, genres, ...) are kept as the
//! delimited strings found in the source dataset.

use serde::{Deserialize, Serialize};

// =============================================================================
// Song
// =============================================================================

/// Track identity and facts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackInfo {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub disc_number: Option<i32>,
    pub track_number: Option<i32>,
    pub duration_ms: Option<i64>,
    pub preview_url: Option<String>,
    pub explicit: Option<bool>,
    /// 0-100, not enforced.
    pub popularity: Option<i32>,
}

/// Artist identity. Names, URIs and genres are delimited strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArtistInfo {
    pub names: Option<String>,
    pub uris: Option<String>,
    pub genres: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlbumInfo {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub artist_names: Option<String>,
    pub artist_uris: Option<String>,
    pub image_url: Option<String>,
    /// '2023-05-15', '2023-05' or '2023'
    pub release_date: Option<String>,
    pub genres: Option<String>,
    pub label: Option<String>,
    pub copyrights: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Provenance {
    pub added_by: Option<String>,
    pub added_at: Option<String>,
}

/// Audio analysis scalars. Ranges are domain specific and not validated here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFeatures {
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i32>,
    pub loudness: Option<f64>,
    pub mode: Option<i32>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub time_signature: Option<i32>,
}

/// A song record, keyed by ISRC.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Song {
    pub isrc: String,
    pub track: TrackInfo,
    pub artist: ArtistInfo,
    pub album: AlbumInfo,
    pub provenance: Provenance,
    pub audio_features: AudioFeatures,
}

// =============================================================================
// Secondary dataset
// =============================================================================

/// Cross-platform ranking record, at most one per song.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStats {
    #[serde(default)]
    pub isrc: String,
    pub track: Option<String>,
    pub album_name: Option<String>,
    pub artist: Option<String>,
    pub release_date: Option<String>,
    pub all_time_rank: Option<i64>,
    pub track_score: Option<f64>,
    pub spotify_streams: Option<i64>,
    pub spotify_playlist_count: Option<i64>,
    pub spotify_playlist_reach: Option<i64>,
    pub spotify_popularity: Option<i32>,
    pub youtube_views: Option<i64>,
    pub youtube_likes: Option<i64>,
    pub tiktok_posts: Option<i64>,
    pub tiktok_likes: Option<i64>,
    pub tiktok_views: Option<i64>,
    pub youtube_playlist_reach: Option<i64>,
    pub apple_music_playlist_count: Option<i64>,
    pub airplay_spins: Option<i64>,
    pub siriusxm_spins: Option<i64>,
    pub deezer_playlist_count: Option<i64>,
    pub deezer_playlist_reach: Option<i64>,
    pub amazon_playlist_count: Option<i64>,
    pub pandora_streams: Option<i64>,
    pub pandora_track_stations: Option<i64>,
    pub soundcloud_streams: Option<i64>,
    pub shazam_counts: Option<i64>,
    pub tidal_popularity: Option<i64>,
    pub explicit_track: Option<bool>,
}

// =============================================================================
// Paging and ordering
// =============================================================================

/// A 0-based page request as executed by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Row offset of the first record. `None` when it does not fit in a
    /// SQLite integer.
    pub fn offset(&self) -> Option<i64> {
        let offset = self.page_index.checked_mul(self.page_size)?;
        i64::try_from(offset).ok()
    }
}

/// One page of a larger ordered result set.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        let total_pages = if request.page_size == 0 {
            0
        } else {
            total_elements.div_ceil(request.page_size)
        };
        Page {
            content,
            page: request.page_index.saturating_add(1),
            size: request.page_size,
            total_elements,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Sortable song attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Isrc,
    TrackName,
    ArtistNames,
    AlbumName,
    AlbumReleaseDate,
    Label,
    DiscNumber,
    TrackNumber,
    TrackDurationMs,
    Explicit,
    Popularity,
    AddedBy,
    AddedAt,
    Danceability,
    Energy,
    Key,
    Loudness,
    Mode,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
    TimeSignature,
}

impl SortField {
    pub const ALL: &'static [SortField] = &[
        SortField::Isrc,
        SortField::TrackName,
        SortField::ArtistNames,
        SortField::AlbumName,
        SortField::AlbumReleaseDate,
        SortField::Label,
        SortField::DiscNumber,
        SortField::TrackNumber,
        SortField::TrackDurationMs,
        SortField::Explicit,
        SortField::Popularity,
        SortField::AddedBy,
        SortField::AddedAt,
        SortField::Danceability,
        SortField::Energy,
        SortField::Key,
        SortField::Loudness,
        SortField::Mode,
        SortField::Speechiness,
        SortField::Acousticness,
        SortField::Instrumentalness,
        SortField::Liveness,
        SortField::Valence,
        SortField::Tempo,
        SortField::TimeSignature,
    ];

    /// Attribute name as exposed to callers.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            SortField::Isrc => "isrc",
            SortField::TrackName => "trackName",
            SortField::ArtistNames => "artistNames",
            SortField::AlbumName => "albumName",
            SortField::AlbumReleaseDate => "albumReleaseDate",
            SortField::Label => "label",
            SortField::DiscNumber => "discNumber",
            SortField::TrackNumber => "trackNumber",
            SortField::TrackDurationMs => "trackDurationMs",
            SortField::Explicit => "explicit",
            SortField::Popularity => "popularity",
            SortField::AddedBy => "addedBy",
            SortField::AddedAt => "addedAt",
            SortField::Danceability => "danceability",
            SortField::Energy => "energy",
            SortField::Key => "key",
            SortField::Loudness => "loudness",
            SortField::Mode => "mode",
            SortField::Speechiness => "speechiness",
            SortField::Acousticness => "acousticness",
            SortField::Instrumentalness => "instrumentalness",
            SortField::Liveness => "liveness",
            SortField::Valence => "valence",
            SortField::Tempo => "tempo",
            SortField::TimeSignature => "timeSignature",
        }
    }

    /// Column in the `songs` table.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Isrc => "isrc",
            SortField::TrackName => "track_name",
            SortField::ArtistNames => "artist_names",
            SortField::AlbumName => "album_name",
            SortField::AlbumReleaseDate => "album_release_date",
            SortField::Label => "label",
            SortField::DiscNumber => "disc_number",
            SortField::TrackNumber => "track_number",
            SortField::TrackDurationMs => "track_duration_ms",
            SortField::Explicit => "explicit",
            SortField::Popularity => "popularity",
            SortField::AddedBy => "added_by",
            SortField::AddedAt => "added_at",
            SortField::Danceability => "danceability",
            SortField::Energy => "energy",
            SortField::Key => "musical_key",
            SortField::Loudness => "loudness",
            SortField::Mode => "mode",
            SortField::Speechiness => "speechiness",
            SortField::Acousticness => "acousticness",
            SortField::Instrumentalness => "instrumentalness",
            SortField::Liveness => "liveness",
            SortField::Valence => "valence",
            SortField::Tempo => "tempo",
            SortField::TimeSignature => "time_signature",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SongSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SongSort {
    pub const BY_POPULARITY_DESC: SongSort = SongSort {
        field: SortField::Popularity,
        direction: SortDirection::Descending,
    };
}

/// Predicates for a filtered scan. Empty patterns and a zero minimum
/// popularity add no restriction. All predicates are combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongFilter {
    /// Case-insensitive substring of the track name.
    pub track_name: String,
    /// Case-insensitive prefix of the track name.
    pub track_name_prefix: String,
    /// Case-insensitive substring of the artist names.
    pub artist_name: String,
    /// Case-insensitive substring of the album name.
    pub album_name: String,
    /// Case-insensitive prefix of the album release date.
    pub release_date_prefix: String,
    /// Inclusive lower bound on popularity.
    pub min_popularity: i32,
}

impl SongFilter {
    pub fn is_unrestricted(&self) -> bool {
        self.track_name.is_empty()
            && self.track_name_prefix.is_empty()
            && self.artist_name.is_empty()
            && self.album_name.is_empty()
            && self.release_date_prefix.is_empty()
            && self.min_popularity <= 0
    }
}
