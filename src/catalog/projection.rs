//! Output shapes of catalog records.
//!
//! `SongDisplay` is the compact listing shape. `SongDetails` is the flat,
//! attribute-preserving shape used for lookups and as the creation body.
//! Both conversions are total and never fail.

use crate::catalog_store::{
    AlbumInfo, ArtistInfo, AudioFeatures, Provenance, Song, TrackInfo,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDisplay {
    pub isrc: String,
    pub track_name: Option<String>,
    pub artist_names: Option<String>,
    pub artist_uris: Option<String>,
    pub album_name: Option<String>,
    pub album_uri: Option<String>,
    pub album_image_url: Option<String>,
}

impl From<Song> for SongDisplay {
    fn from(song: Song) -> Self {
        SongDisplay {
            isrc: song.isrc,
            track_name: song.track.name,
            artist_names: song.artist.names,
            artist_uris: song.artist.uris,
            album_name: song.album.name,
            album_uri: song.album.uri,
            album_image_url: song.album.image_url,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    #[serde(default)]
    pub isrc: String,
    pub track_uri: Option<String>,
    pub track_name: Option<String>,
    pub artist_uris: Option<String>,
    pub artist_names: Option<String>,
    pub album_uri: Option<String>,
    pub album_name: Option<String>,
    pub album_artist_uris: Option<String>,
    pub album_artist_names: Option<String>,
    pub album_release_date: Option<String>,
    pub album_image_url: Option<String>,
    pub disc_number: Option<i32>,
    pub track_number: Option<i32>,
    pub track_duration_ms: Option<i64>,
    pub track_preview_url: Option<String>,
    pub explicit: Option<bool>,
    pub popularity: Option<i32>,
    pub added_by: Option<String>,
    pub added_at: Option<String>,
    pub artist_genres: Option<String>,
    #[serde(flatten)]
    pub audio_features: AudioFeatures,
    pub album_genres: Option<String>,
    pub label: Option<String>,
    pub copyrights: Option<String>,
}

impl From<Song> for SongDetails {
    fn from(song: Song) -> Self {
        SongDetails {
            isrc: song.isrc,
            track_uri: song.track.uri,
            track_name: song.track.name,
            artist_uris: song.artist.uris,
            artist_names: song.artist.names,
            album_uri: song.album.uri,
            album_name: song.album.name,
            album_artist_uris: song.album.artist_uris,
            album_artist_names: song.album.artist_names,
            album_release_date: song.album.release_date,
            album_image_url: song.album.image_url,
            disc_number: song.track.disc_number,
            track_number: song.track.track_number,
            track_duration_ms: song.track.duration_ms,
            track_preview_url: song.track.preview_url,
            explicit: song.track.explicit,
            popularity: song.track.popularity,
            added_by: song.provenance.added_by,
            added_at: song.provenance.added_at,
            artist_genres: song.artist.genres,
            audio_features: song.audio_features,
            album_genres: song.album.genres,
            label: song.album.label,
            copyrights: song.album.copyrights,
        }
    }
}

impl From<SongDetails> for Song {
    fn from(details: SongDetails) -> Self {
        Song {
            isrc: details.isrc,
            track: TrackInfo {
                name: details.track_name,
                uri: details.track_uri,
                disc_number: details.disc_number,
                track_number: details.track_number,
                duration_ms: details.track_duration_ms,
                preview_url: details.track_preview_url,
                explicit: details.explicit,
                popularity: details.popularity,
            },
            artist: ArtistInfo {
                names: details.artist_names,
                uris: details.artist_uris,
                genres: details.artist_genres,
            },
            album: AlbumInfo {
                name: details.album_name,
                uri: details.album_uri,
                artist_names: details.album_artist_names,
                artist_uris: details.album_artist_uris,
                image_url: details.album_image_url,
                release_date: details.album_release_date,
                genres: details.album_genres,
                label: details.label,
                copyrights: details.copyrights,
            },
            provenance: Provenance {
                added_by: details.added_by,
                added_at: details.added_at,
            },
            audio_features: details.audio_features,
        }
    }
}
