//! Test fixture creation for the catalog database

use super::constants::*;
use anyhow::Result;
use song_catalog_server::catalog_store::{
    AlbumInfo, ArtistInfo, Song, SongStats, SongStore, SqliteSongStore, TrackInfo,
};
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds a song with the attributes the tests filter and sort on.
pub fn song(
    isrc: &str,
    name: &str,
    popularity: Option<i32>,
    artist: &str,
    album: &str,
    release_date: &str,
) -> Song {
    Song {
        isrc: isrc.to_string(),
        track: TrackInfo {
            name: Some(name.to_string()),
            uri: Some(format!("spotify:track:{}", isrc.to_lowercase())),
            popularity,
            explicit: Some(false),
            ..Default::default()
        },
        artist: ArtistInfo {
            names: Some(artist.to_string()),
            ..Default::default()
        },
        album: AlbumInfo {
            name: Some(album.to_string()),
            release_date: Some(release_date.to_string()),
            image_url: Some(format!("https://img.example/{}.jpg", isrc)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates an empty catalog database.
/// Returns (temp_dir, catalog_db_path)
pub fn create_empty_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");
    SqliteSongStore::new(&catalog_db_path, 1)?;
    Ok((dir, catalog_db_path))
}

/// Creates a temporary catalog with 5 songs by 3 artists, and stats for the
/// first song.
/// Returns (temp_dir, catalog_db_path)
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let (dir, catalog_db_path) = create_empty_catalog()?;
    let store = SqliteSongStore::new(&catalog_db_path, 1)?;

    let songs = [
        song(SONG_1_ISRC, SONG_1_NAME, Some(90), BAND_NAME, FIRST_ALBUM, "2021-03-19"),
        song(SONG_2_ISRC, SONG_2_NAME, Some(50), JAZZ_NAME, JAZZ_ALBUM, "2008"),
        song(SONG_3_ISRC, SONG_3_NAME, Some(70), BAND_NAME, FIRST_ALBUM, "2021-03-19"),
        song(SONG_4_ISRC, SONG_4_NAME, Some(30), JAZZ_NAME, JAZZ_ALBUM, "1959-08-17"),
        song(SONG_5_ISRC, SONG_5_NAME, None, "Solo Artist", "Single", "2019-07"),
    ];
    for song in &songs {
        store.insert(song)?;
    }

    store.insert_stats(&SongStats {
        isrc: SONG_1_ISRC.to_string(),
        track: Some(SONG_1_NAME.to_string()),
        artist: Some(BAND_NAME.to_string()),
        all_time_rank: Some(1),
        track_score: Some(725.4),
        spotify_streams: Some(3_904_709_294),
        spotify_popularity: Some(90),
        explicit_track: Some(false),
        ..Default::default()
    })?;

    Ok((dir, catalog_db_path))
}
