//! Shared constants for integration tests
//!
//! When fixture data changes, update only this file.

// ============================================================================
// Test Catalog ISRCs
// ============================================================================

/// "In Love Again" by The Test Band, popularity 90
pub const SONG_1_ISRC: &str = "USTB12100001";
pub const SONG_1_NAME: &str = "In Love Again";

/// "Love Story" by Jazz Ensemble, popularity 50
pub const SONG_2_ISRC: &str = "USJE10800002";
pub const SONG_2_NAME: &str = "Love Story";

/// "Opening Track" by The Test Band, popularity 70
pub const SONG_3_ISRC: &str = "USTB12100003";
pub const SONG_3_NAME: &str = "Opening Track";

/// "Blue in Green" by Jazz Ensemble, popularity 30
pub const SONG_4_ISRC: &str = "USJE15900004";
pub const SONG_4_NAME: &str = "Blue in Green";

/// "Lovers Rock" by Solo Artist, unknown popularity
pub const SONG_5_ISRC: &str = "GBSA11900005";
pub const SONG_5_NAME: &str = "Lovers Rock";

pub const BAND_NAME: &str = "The Test Band";
pub const JAZZ_NAME: &str = "Jazz Ensemble";
pub const FIRST_ALBUM: &str = "First Album";
pub const JAZZ_ALBUM: &str = "Jazz Collection";

/// Number of songs in the test catalog
pub const SONG_COUNT: usize = 5;

// ============================================================================
// Timing
// ============================================================================

/// How long to wait for the server to start
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Default timeout for HTTP requests
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How often to poll the server while it starts
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
