//! SQLite schema definitions for the catalog database.
//!
//! Primary keys are integer rowids with unique 24-hex text ids for lookups.
//! `artists.name` stores the canonical lower-cased form and carries the
//! uniqueness constraint, so identity resolution does not depend on any
//! store-specific collation.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

/// Artists table - canonical names, unique under exact comparison because
/// they are always stored lower-cased.
const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_artists_id", "id")],
    unique_constraints: &[&["id"], &["name"]],
};

/// Genres table - names unique under exact-match comparison.
const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_genres_id", "id")],
    unique_constraints: &[&["id"], &["name"]],
};

/// Songs table. `artist_id`/`genre_id` are soft references: deleting an
/// artist or genre leaves them dangling.
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Integer, non_null = true), // seconds
        sqlite_column!("release_year", &SqlType::Integer, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("genre_id", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_songs_id", "id"),
        ("idx_songs_artist", "artist_id"),
        ("idx_songs_genre", "genre_id"),
        ("idx_songs_release_year", "release_year"),
    ],
    unique_constraints: &[&["id"]],
};

/// Playlists table.
const PLAYLISTS_TABLE: Table = Table {
    name: "playlists",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text),
    ],
    indices: &[("idx_playlists_id", "id")],
    unique_constraints: &[&["id"]],
};

/// Playlist membership entries. Rowid order is append order; the unique
/// constraint backstops the at-most-one-membership-per-song invariant.
const PLAYLIST_ENTRIES_TABLE: Table = Table {
    name: "playlist_entries",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("playlist_id", &SqlType::Text, non_null = true),
        sqlite_column!("song_id", &SqlType::Text, non_null = true),
        sqlite_column!("added_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_playlist_entries_playlist", "playlist_id")],
    unique_constraints: &[&["playlist_id", "song_id"]],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        GENRES_TABLE,
        SONGS_TABLE,
        PLAYLISTS_TABLE,
        PLAYLIST_ENTRIES_TABLE,
    ],
    migration: None,
}];
