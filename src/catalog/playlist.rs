//! Playlist membership semantics.
//!
//! A song appears at most once in a playlist; adding a duplicate is a
//! conflict, removing an absent song is a successful no-op. Membership
//! comparison is exact-identifier equality.

use crate::catalog_store::{CatalogError, CatalogStore, ResolvedPlaylist};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct PlaylistMembership {
    store: Arc<dyn CatalogStore>,
}

impl PlaylistMembership {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        PlaylistMembership { store }
    }

    /// Append a song to the playlist, returning the resolved playlist.
    pub fn add_song(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<ResolvedPlaylist, CatalogError> {
        let playlist = self
            .store
            .get_playlist(playlist_id)?
            .ok_or(CatalogError::NotFound("Playlist"))?;
        if !self.store.song_exists(song_id)? {
            return Err(CatalogError::NotFound("Song"));
        }

        let entries = self.store.list_playlist_entries(&playlist.id)?;
        if entries.iter().any(|entry| entry.song_id == song_id) {
            return Err(CatalogError::Conflict(
                "Song already exists in playlist".to_string(),
            ));
        }

        self.store
            .insert_playlist_entry(&playlist.id, song_id, Utc::now().timestamp())?;

        self.store
            .get_playlist_resolved(&playlist.id)?
            .ok_or(CatalogError::NotFound("Playlist"))
    }

    /// Remove a song from the playlist. Succeeds even when the song was not
    /// a member.
    pub fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<(), CatalogError> {
        let playlist = self
            .store
            .get_playlist(playlist_id)?
            .ok_or(CatalogError::NotFound("Playlist"))?;
        self.store.delete_playlist_entry(&playlist.id, song_id)?;
        Ok(())
    }
}
