//! CatalogStore trait definition.
//!
//! Abstracts the persistent collections so the server and the catalog core
//! can be exercised against any backend in tests.

use super::models::{
    Artist, Genre, Playlist, PlaylistEntry, ReportStats, ResolvedPlaylist, ResolvedSong, Song,
    SongPredicate,
};
use super::CatalogError;

/// Trait for catalog storage backends.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Artists
    // =========================================================================

    /// List all artists, sorted by canonical name.
    fn list_artists(&self) -> Result<Vec<Artist>, CatalogError>;

    /// Get an artist by id.
    fn get_artist(&self, id: &str) -> Result<Option<Artist>, CatalogError>;

    /// Look up an artist by canonical (lower-cased, trimmed) name.
    fn find_artist_by_canonical_name(&self, name: &str)
        -> Result<Option<Artist>, CatalogError>;

    /// Insert a new artist. Fails with `Conflict` if the canonical name is
    /// already taken.
    fn insert_artist(&self, artist: &Artist) -> Result<(), CatalogError>;

    // =========================================================================
    // Genres
    // =========================================================================

    /// List all genres, sorted by name.
    fn list_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Get a genre by id.
    fn get_genre(&self, id: &str) -> Result<Option<Genre>, CatalogError>;

    /// Insert a new genre. Fails with `Conflict` on a duplicate name.
    fn insert_genre(&self, genre: &Genre) -> Result<(), CatalogError>;

    // =========================================================================
    // Songs
    // =========================================================================

    /// List all songs with artist and genre embedded, newest first.
    fn list_songs(&self) -> Result<Vec<ResolvedSong>, CatalogError>;

    /// Get one song with artist and genre embedded.
    fn get_song(&self, id: &str) -> Result<Option<ResolvedSong>, CatalogError>;

    /// Get one song as stored, with raw artist and genre ids.
    fn get_song_record(&self, id: &str) -> Result<Option<Song>, CatalogError>;

    /// Whether a song with this id exists.
    fn song_exists(&self, id: &str) -> Result<bool, CatalogError>;

    /// Insert a new song.
    fn insert_song(&self, song: &Song) -> Result<(), CatalogError>;

    /// Overwrite an existing song. Returns false if no song has this id.
    fn update_song(&self, song: &Song) -> Result<bool, CatalogError>;

    /// Delete a song by id. Returns false if no song had this id.
    fn delete_song(&self, id: &str) -> Result<bool, CatalogError>;

    // =========================================================================
    // Report Queries
    // =========================================================================

    /// Row-level query: matching songs with artist and genre embedded.
    fn query_songs(&self, predicate: &SongPredicate)
        -> Result<Vec<ResolvedSong>, CatalogError>;

    /// Grouped-aggregation query over the identical predicate.
    fn aggregate_songs(&self, predicate: &SongPredicate)
        -> Result<ReportStats, CatalogError>;

    // =========================================================================
    // Playlists
    // =========================================================================

    /// List all playlists with resolved entries.
    fn list_playlists(&self) -> Result<Vec<ResolvedPlaylist>, CatalogError>;

    /// Get a playlist without its entries.
    fn get_playlist(&self, id: &str) -> Result<Option<Playlist>, CatalogError>;

    /// Get a playlist with resolved entries.
    fn get_playlist_resolved(&self, id: &str)
        -> Result<Option<ResolvedPlaylist>, CatalogError>;

    /// Insert a new, empty playlist.
    fn insert_playlist(&self, playlist: &Playlist) -> Result<(), CatalogError>;

    /// Update a playlist's name and/or description. Returns false if the
    /// playlist does not exist.
    fn update_playlist(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool, CatalogError>;

    /// Delete a playlist and its entries. Returns false if it did not exist.
    fn delete_playlist(&self, id: &str) -> Result<bool, CatalogError>;

    // =========================================================================
    // Playlist Membership
    // =========================================================================

    /// List a playlist's entries in append order.
    fn list_playlist_entries(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, CatalogError>;

    /// Append a membership entry. Fails with `Conflict` if the song is
    /// already a member (the constraint backstops the membership check).
    fn insert_playlist_entry(
        &self,
        playlist_id: &str,
        song_id: &str,
        added_at: i64,
    ) -> Result<(), CatalogError>;

    /// Remove a membership entry. Returns false if the song was not a
    /// member; absence is not an error.
    fn delete_playlist_entry(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<bool, CatalogError>;
}
