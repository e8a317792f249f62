//! SQLite schema definitions for the song catalog database.
//!
//! Songs are keyed by their ISRC. The cross-platform statistics table shares
//! the same key and references `songs`.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

/// Songs table - one row per recording
pub const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("isrc", &SqlType::Text, is_primary_key = true),
        sqlite_column!("track_name", &SqlType::Text),
        sqlite_column!("track_uri", &SqlType::Text),
        sqlite_column!("artist_uris", &SqlType::Text), // delimited
        sqlite_column!("artist_names", &SqlType::Text), // delimited
        sqlite_column!("album_uri", &SqlType::Text),
        sqlite_column!("album_name", &SqlType::Text),
        sqlite_column!("album_artist_uris", &SqlType::Text),
        sqlite_column!("album_artist_names", &SqlType::Text),
        sqlite_column!("album_release_date", &SqlType::Text), // '2023-05-15', '2023-05', '2023'
        sqlite_column!("album_image_url", &SqlType::Text),
        sqlite_column!("disc_number", &SqlType::Integer),
        sqlite_column!("track_number", &SqlType::Integer),
        sqlite_column!("track_duration_ms", &SqlType::Integer),
        sqlite_column!("track_preview_url", &SqlType::Text),
        sqlite_column!("explicit", &SqlType::Integer),
        sqlite_column!("popularity", &SqlType::Integer),
        sqlite_column!("added_by", &SqlType::Text),
        sqlite_column!("added_at", &SqlType::Text),
        sqlite_column!("artist_genres", &SqlType::Text),
        sqlite_column!("danceability", &SqlType::Real),
        sqlite_column!("energy", &SqlType::Real),
        sqlite_column!("musical_key", &SqlType::Integer),
        sqlite_column!("loudness", &SqlType::Real),
        sqlite_column!("mode", &SqlType::Integer),
        sqlite_column!("speechiness", &SqlType::Real),
        sqlite_column!("acousticness", &SqlType::Real),
        sqlite_column!("instrumentalness", &SqlType::Real),
        sqlite_column!("liveness", &SqlType::Real),
        sqlite_column!("valence", &SqlType::Real),
        sqlite_column!("tempo", &SqlType::Real),
        sqlite_column!("time_signature", &SqlType::Integer),
        sqlite_column!("album_genres", &SqlType::Text),
        sqlite_column!("label", &SqlType::Text),
        sqlite_column!("copyrights", &SqlType::Text),
    ],
    indices: &[
        ("idx_songs_popularity", "popularity"),
        ("idx_songs_track_name", "track_name"),
        ("idx_songs_release_date", "album_release_date"),
    ],
};

/// Cross-platform statistics, optional one-to-one with `songs`
pub const SONG_STATS_TABLE: Table = Table {
    name: "song_stats",
    columns: &[
        sqlite_column!(
            "isrc",
            &SqlType::Text,
            is_primary_key = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "songs",
                foreign_column: "isrc",
                on_delete: ForeignKeyOnChange::Cascade,
            })
        ),
        sqlite_column!("track", &SqlType::Text),
        sqlite_column!("album_name", &SqlType::Text),
        sqlite_column!("artist", &SqlType::Text),
        sqlite_column!("release_date", &SqlType::Text),
        sqlite_column!("all_time_rank", &SqlType::Integer),
        sqlite_column!("track_score", &SqlType::Real),
        sqlite_column!("spotify_streams", &SqlType::Integer),
        sqlite_column!("spotify_playlist_count", &SqlType::Integer),
        sqlite_column!("spotify_playlist_reach", &SqlType::Integer),
        sqlite_column!("spotify_popularity", &SqlType::Integer),
        sqlite_column!("youtube_views", &SqlType::Integer),
        sqlite_column!("youtube_likes", &SqlType::Integer),
        sqlite_column!("tiktok_posts", &SqlType::Integer),
        sqlite_column!("tiktok_likes", &SqlType::Integer),
        sqlite_column!("tiktok_views", &SqlType::Integer),
        sqlite_column!("youtube_playlist_reach", &SqlType::Integer),
        sqlite_column!("apple_music_playlist_count", &SqlType::Integer),
        sqlite_column!("airplay_spins", &SqlType::Integer),
        sqlite_column!("siriusxm_spins", &SqlType::Integer),
        sqlite_column!("deezer_playlist_count", &SqlType::Integer),
        sqlite_column!("deezer_playlist_reach", &SqlType::Integer),
        sqlite_column!("amazon_playlist_count", &SqlType::Integer),
        sqlite_column!("pandora_streams", &SqlType::Integer),
        sqlite_column!("pandora_track_stations", &SqlType::Integer),
        sqlite_column!("soundcloud_streams", &SqlType::Integer),
        sqlite_column!("shazam_counts", &SqlType::Integer),
        sqlite_column!("tidal_popularity", &SqlType::Integer),
        sqlite_column!("explicit_track", &SqlType::Integer),
    ],
    indices: &[("idx_song_stats_rank", "all_time_rank")],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONGS_TABLE, SONG_STATS_TABLE],
}];
