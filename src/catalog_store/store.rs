//! SQLite-backed catalog store implementation.
//!
//! Uses a round-robin pool of read-only connections plus a single guarded
//! write connection, all in WAL mode. The schema is created or migrated on
//! open.

use super::error::{insert_error, CatalogError};
use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

const RESOLVED_SONG_SELECT: &str = "SELECT s.id, s.title, s.duration, s.release_year, \
     a.id, a.name, g.id, g.name \
     FROM songs s \
     LEFT JOIN artists a ON a.id = s.artist_id \
     LEFT JOIN genres g ON g.id = s.genre_id";

/// SQLite-backed catalog store.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    // Brand new database (no tables) gets the latest schema directly
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let mut current_version = (db_version as usize).saturating_sub(BASE_DB_VERSION);
    if current_version >= latest_version {
        latest_schema.validate(conn)?;
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating catalog db from version {} to {}",
                current_version, schema.version
            );
            migration_fn(&tx)?;
            current_version = schema.version;
        }
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    tx.commit()?;
    Ok(())
}

impl SqliteCatalogStore {
    /// Open (and create or migrate if needed) the catalog database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections for concurrent reads
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        migrate_if_needed(&mut write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let artist_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM artists", [], |r| r.get(0))
            .unwrap_or(0);
        let genre_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM genres", [], |r| r.get(0))
            .unwrap_or(0);
        let song_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap_or(0);
        let playlist_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM playlists", [], |r| r.get(0))
            .unwrap_or(0);

        info!(
            "Opened catalog: {} artists, {} genres, {} songs, {} playlists",
            artist_count, genre_count, song_count, playlist_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    // =========================================================================
    // Row Parsing Helpers
    // =========================================================================

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn parse_genre_row(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    /// Parse a resolved song row laid out as
    /// (s.id, s.title, s.duration, s.release_year, a.id, a.name, g.id, g.name).
    /// The joined artist/genre columns are NULL when the reference dangles.
    fn parse_resolved_song_row(row: &rusqlite::Row) -> rusqlite::Result<ResolvedSong> {
        let artist = match (
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
        ) {
            (Some(id), Some(name)) => Some(Artist { id, name }),
            _ => None,
        };
        let genre = match (
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
        ) {
            (Some(id), Some(name)) => Some(Genre { id, name }),
            _ => None,
        };
        Ok(ResolvedSong {
            id: row.get(0)?,
            title: row.get(1)?,
            duration: row.get(2)?,
            release_year: row.get(3)?,
            artist,
            genre,
        })
    }

    fn resolve_playlist_entries(
        conn: &Connection,
        playlist_id: &str,
    ) -> Result<Vec<ResolvedPlaylistEntry>, CatalogError> {
        // Entries whose song has been deleted are dropped from the resolved
        // view; the membership rows themselves are left in place.
        let mut stmt = conn.prepare_cached(
            "SELECT s.id, s.title, s.duration, s.release_year, \
             a.id, a.name, g.id, g.name, e.added_at \
             FROM playlist_entries e \
             JOIN songs s ON s.id = e.song_id \
             LEFT JOIN artists a ON a.id = s.artist_id \
             LEFT JOIN genres g ON g.id = s.genre_id \
             WHERE e.playlist_id = ?1 \
             ORDER BY e.rowid",
        )?;
        let entries = stmt
            .query_map(params![playlist_id], |row| {
                Ok(ResolvedPlaylistEntry {
                    song: Self::parse_resolved_song_row(row)?,
                    added_at: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn parse_playlist_row(row: &rusqlite::Row) -> rusqlite::Result<Playlist> {
        Ok(Playlist {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }
}

impl CatalogStore for SqliteCatalogStore {
    // =========================================================================
    // Artists
    // =========================================================================

    fn list_artists(&self) -> Result<Vec<Artist>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached("SELECT id, name FROM artists ORDER BY name")?;
        let artists = stmt
            .query_map([], Self::parse_artist_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    fn get_artist(&self, id: &str) -> Result<Option<Artist>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached("SELECT id, name FROM artists WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![id], Self::parse_artist_row)
            .optional()?)
    }

    fn find_artist_by_canonical_name(
        &self,
        name: &str,
    ) -> Result<Option<Artist>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached("SELECT id, name FROM artists WHERE name = ?1")?;
        Ok(stmt
            .query_row(params![name], Self::parse_artist_row)
            .optional()?)
    }

    fn insert_artist(&self, artist: &Artist) -> Result<(), CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO artists (id, name) VALUES (?1, ?2)",
            params![artist.id, artist.name],
        )
        .map_err(|e| insert_error(e, "Artist"))?;
        Ok(())
    }

    // =========================================================================
    // Genres
    // =========================================================================

    fn list_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached("SELECT id, name FROM genres ORDER BY name")?;
        let genres = stmt
            .query_map([], Self::parse_genre_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn get_genre(&self, id: &str) -> Result<Option<Genre>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached("SELECT id, name FROM genres WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![id], Self::parse_genre_row)
            .optional()?)
    }

    fn insert_genre(&self, genre: &Genre) -> Result<(), CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO genres (id, name) VALUES (?1, ?2)",
            params![genre.id, genre.name],
        )
        .map_err(|e| insert_error(e, "Genre"))?;
        Ok(())
    }

    // =========================================================================
    // Songs
    // =========================================================================

    fn list_songs(&self) -> Result<Vec<ResolvedSong>, CatalogError> {
        self.query_songs(&SongPredicate::default())
    }

    fn get_song(&self, id: &str) -> Result<Option<ResolvedSong>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached(&format!("{} WHERE s.id = ?1", RESOLVED_SONG_SELECT))?;
        Ok(stmt
            .query_row(params![id], Self::parse_resolved_song_row)
            .optional()?)
    }

    fn get_song_record(&self, id: &str) -> Result<Option<Song>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, duration, release_year, artist_id, genre_id \
             FROM songs WHERE id = ?1",
        )?;
        Ok(stmt
            .query_row(params![id], |row| {
                Ok(Song {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    duration: row.get(2)?,
                    release_year: row.get(3)?,
                    artist_id: row.get(4)?,
                    genre_id: row.get(5)?,
                })
            })
            .optional()?)
    }

    fn song_exists(&self, id: &str) -> Result<bool, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached("SELECT 1 FROM songs WHERE id = ?1")?;
        Ok(stmt.query_row(params![id], |_| Ok(())).optional()?.is_some())
    }

    fn insert_song(&self, song: &Song) -> Result<(), CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO songs (id, title, duration, release_year, artist_id, genre_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                song.id,
                song.title,
                song.duration,
                song.release_year,
                song.artist_id,
                song.genre_id
            ],
        )
        .map_err(|e| insert_error(e, "Song"))?;
        Ok(())
    }

    fn update_song(&self, song: &Song) -> Result<bool, CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE songs SET title = ?2, duration = ?3, release_year = ?4, \
             artist_id = ?5, genre_id = ?6 WHERE id = ?1",
            params![
                song.id,
                song.title,
                song.duration,
                song.release_year,
                song.artist_id,
                song.genre_id
            ],
        )?;
        Ok(updated > 0)
    }

    fn delete_song(&self, id: &str) -> Result<bool, CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    // =========================================================================
    // Report Queries
    // =========================================================================

    fn query_songs(
        &self,
        predicate: &SongPredicate,
    ) -> Result<Vec<ResolvedSong>, CatalogError> {
        let (where_clause, sql_params) = predicate.where_clause();
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "{}{} ORDER BY s.rowid DESC",
            RESOLVED_SONG_SELECT, where_clause
        ))?;
        let songs = stmt
            .query_map(params_from_iter(sql_params), Self::parse_resolved_song_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn aggregate_songs(
        &self,
        predicate: &SongPredicate,
    ) -> Result<ReportStats, CatalogError> {
        let (where_clause, sql_params) = predicate.where_clause();
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let (total_songs, average_duration): (i64, Option<f64>) = conn
            .prepare_cached(&format!(
                "SELECT COUNT(*), AVG(s.duration) FROM songs s{}",
                where_clause
            ))?
            .query_row(params_from_iter(sql_params.clone()), |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT g.name, COUNT(*) FROM songs s \
             JOIN genres g ON g.id = s.genre_id{} GROUP BY g.name",
            where_clause
        ))?;
        let songs_per_genre = stmt
            .query_map(params_from_iter(sql_params), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<_, _>>()?;

        Ok(ReportStats {
            total_songs,
            // AVG over an empty set is NULL, surfaced as 0 per contract
            average_duration: average_duration.unwrap_or(0.0),
            songs_per_genre,
        })
    }

    // =========================================================================
    // Playlists
    // =========================================================================

    fn list_playlists(&self) -> Result<Vec<ResolvedPlaylist>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn
            .prepare_cached("SELECT id, name, description FROM playlists ORDER BY rowid")?;
        let playlists = stmt
            .query_map([], Self::parse_playlist_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut resolved = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            let entries = Self::resolve_playlist_entries(&conn, &playlist.id)?;
            resolved.push(ResolvedPlaylist {
                id: playlist.id,
                name: playlist.name,
                description: playlist.description,
                entries,
            });
        }
        Ok(resolved)
    }

    fn get_playlist(&self, id: &str) -> Result<Option<Playlist>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached("SELECT id, name, description FROM playlists WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![id], Self::parse_playlist_row)
            .optional()?)
    }

    fn get_playlist_resolved(
        &self,
        id: &str,
    ) -> Result<Option<ResolvedPlaylist>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let playlist = conn
            .prepare_cached("SELECT id, name, description FROM playlists WHERE id = ?1")?
            .query_row(params![id], Self::parse_playlist_row)
            .optional()?;

        let playlist = match playlist {
            Some(p) => p,
            None => return Ok(None),
        };

        let entries = Self::resolve_playlist_entries(&conn, &playlist.id)?;
        Ok(Some(ResolvedPlaylist {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            entries,
        }))
    }

    fn insert_playlist(&self, playlist: &Playlist) -> Result<(), CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO playlists (id, name, description) VALUES (?1, ?2, ?3)",
            params![playlist.id, playlist.name, playlist.description],
        )
        .map_err(|e| insert_error(e, "Playlist"))?;
        Ok(())
    }

    fn update_playlist(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<bool, CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE playlists SET name = COALESCE(?2, name), \
             description = COALESCE(?3, description) WHERE id = ?1",
            params![id, name, description],
        )?;
        Ok(updated > 0)
    }

    fn delete_playlist(&self, id: &str) -> Result<bool, CatalogError> {
        let mut guard = self.write_conn.lock().unwrap();
        let tx = guard.transaction().map_err(anyhow::Error::from)?;
        tx.execute(
            "DELETE FROM playlist_entries WHERE playlist_id = ?1",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM playlists WHERE id = ?1", params![id])?;
        tx.commit().map_err(anyhow::Error::from)?;
        Ok(deleted > 0)
    }

    // =========================================================================
    // Playlist Membership
    // =========================================================================

    fn list_playlist_entries(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, CatalogError> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT song_id, added_at FROM playlist_entries \
             WHERE playlist_id = ?1 ORDER BY rowid",
        )?;
        let entries = stmt
            .query_map(params![playlist_id], |row| {
                Ok(PlaylistEntry {
                    song_id: row.get(0)?,
                    added_at: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn insert_playlist_entry(
        &self,
        playlist_id: &str,
        song_id: &str,
        added_at: i64,
    ) -> Result<(), CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO playlist_entries (playlist_id, song_id, added_at) \
             VALUES (?1, ?2, ?3)",
            params![playlist_id, song_id, added_at],
        )
        .map_err(|e| match &e {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                CatalogError::Conflict("Song already exists in playlist".to_string())
            }
            _ => CatalogError::Store(e.into()),
        })?;
        Ok(())
    }

    fn delete_playlist_entry(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<bool, CatalogError> {
        let conn = self.write_conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM playlist_entries WHERE playlist_id = ?1 AND song_id = ?2",
            params![playlist_id, song_id],
        )?;
        Ok(deleted > 0)
    }
}
