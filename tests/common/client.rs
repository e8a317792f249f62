//! HTTP client for integration tests
//!
//! Wraps reqwest with one method per song route.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path_and_query: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path_and_query))
            .send()
            .await
            .expect("Request failed")
    }

    async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// GET /songs
    pub async fn list_songs(&self, query: &str) -> Response {
        self.get(&format!("/songs{}", query)).await
    }

    /// GET /song with search parameters
    pub async fn search_songs(&self, query: &str) -> Response {
        self.get(&format!("/song{}", query)).await
    }

    /// GET /songs/search
    pub async fn search_by_prefix(&self, name: &str) -> Response {
        self.get(&format!("/songs/search?songname={}", name)).await
    }

    /// GET /songs/search/including
    pub async fn search_by_substring(&self, name: &str) -> Response {
        self.get(&format!("/songs/search/including?songname={}", name))
            .await
    }

    /// GET /song/{isrc}
    pub async fn get_song(&self, isrc: &str) -> Response {
        self.get(&format!("/song/{}", isrc)).await
    }

    /// POST /song
    pub async fn create_song(&self, body: &Value) -> Response {
        self.post("/song", body).await
    }

    /// GET /song/{isrc}/stats
    pub async fn get_song_stats(&self, isrc: &str) -> Response {
        self.get(&format!("/song/{}/stats", isrc)).await
    }

    /// POST /song/{isrc}/stats
    pub async fn create_song_stats(&self, isrc: &str, body: &Value) -> Response {
        self.post(&format!("/song/{}/stats", isrc), body).await
    }
}
