//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per API endpoint. When routes or request
//! formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
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

    // ========================================================================
    // Artist Endpoints
    // ========================================================================

    /// GET /api/artists
    pub async fn get_artists(&self) -> Response {
        self.client
            .get(format!("{}/api/artists", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST /api/artists
    pub async fn post_artist(&self, name: &str) -> Response {
        self.client
            .post(format!("{}/api/artists", self.base_url))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST /api/artists with an arbitrary body
    pub async fn post_artist_raw(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/artists", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Genre Endpoints
    // ========================================================================

    /// GET /api/genres
    pub async fn get_genres(&self) -> Response {
        self.client
            .get(format!("{}/api/genres", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST /api/genres
    pub async fn post_genre(&self, name: &str) -> Response {
        self.client
            .post(format!("{}/api/genres", self.base_url))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Song Endpoints
    // ========================================================================

    /// GET /api/songs
    pub async fn get_songs(&self) -> Response {
        self.client
            .get(format!("{}/api/songs", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// GET /api/songs/{id}
    pub async fn get_song(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST /api/songs
    pub async fn post_song(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/songs", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// PUT /api/songs/{id}
    pub async fn put_song(&self, id: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}/api/songs/{}", self.base_url, id))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// DELETE /api/songs/{id}
    pub async fn delete_song(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/api/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Request failed")
    }

    /// GET /api/songs/report with query parameters
    pub async fn get_report(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/api/songs/report", self.base_url))
            .query(query)
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Playlist Endpoints
    // ========================================================================

    /// GET /api/playlists
    pub async fn get_playlists(&self) -> Response {
        self.client
            .get(format!("{}/api/playlists", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// GET /api/playlists/{id}
    pub async fn get_playlist(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/playlists/{}", self.base_url, id))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST /api/playlists
    pub async fn post_playlist(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/api/playlists", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// PUT /api/playlists/{id}
    pub async fn put_playlist(&self, id: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}/api/playlists/{}", self.base_url, id))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// DELETE /api/playlists/{id}
    pub async fn delete_playlist(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/api/playlists/{}", self.base_url, id))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST /api/playlists/{id}/songs
    pub async fn add_song_to_playlist(&self, playlist_id: &str, song_id: &str) -> Response {
        self.client
            .post(format!(
                "{}/api/playlists/{}/songs",
                self.base_url, playlist_id
            ))
            .json(&json!({ "songId": song_id }))
            .send()
            .await
            .expect("Request failed")
    }

    /// DELETE /api/playlists/{id}/songs/{song_id}
    pub async fn remove_song_from_playlist(&self, playlist_id: &str, song_id: &str) -> Response {
        self.client
            .delete(format!(
                "{}/api/playlists/{}/songs/{}",
                self.base_url, playlist_id, song_id
            ))
            .send()
            .await
            .expect("Request failed")
    }
}
