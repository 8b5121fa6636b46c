//! Catalog models for SQLite-backed storage.
//!
//! Entity identifiers are opaque 24-character lowercase hex tokens.
//! Artist names are stored in canonical form (trimmed, lower-cased); the
//! display form is produced only at serialization time.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    static ref ENTITY_ID_RE: Regex = Regex::new("^[0-9a-fA-F]{24}$").unwrap();
}

/// Generate a fresh entity identifier.
pub fn new_entity_id() -> String {
    let bytes: [u8; 12] = rand::rng().random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Whether `s` is syntactically a valid entity identifier.
pub fn is_entity_id(s: &str) -> bool {
    ENTITY_ID_RE.is_match(s)
}

// =============================================================================
// Core Entities
// =============================================================================

/// Artist entity. `name` holds the canonical (lower-cased) form; JSON output
/// carries the word-initial-capitalized display form instead.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    #[serde(serialize_with = "crate::catalog::display::serialize_display_name")]
    pub name: String,
}

/// Genre entity. Names are unique under exact-match comparison.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

/// Song entity as stored; references its artist and genre by id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    /// Duration in seconds.
    pub duration: i64,
    pub release_year: i32,
    pub artist_id: String,
    pub genre_id: String,
}

/// Playlist entity without its entries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// One membership entry in a playlist, in append order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    pub song_id: String,
    /// Unix timestamp (seconds) of when the song was added.
    pub added_at: i64,
}

// =============================================================================
// Resolved/Composite Types (API Responses)
// =============================================================================

/// Song with its artist and genre embedded. Referential integrity on
/// artist/genre deletion is not enforced, so either reference may dangle.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSong {
    pub id: String,
    pub title: String,
    pub duration: i64,
    pub release_year: i32,
    pub artist: Option<Artist>,
    pub genre: Option<Genre>,
}

/// Playlist entry with the song resolved.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlaylistEntry {
    pub song: ResolvedSong,
    pub added_at: i64,
}

/// Full playlist with resolved entries.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ResolvedPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub entries: Vec<ResolvedPlaylistEntry>,
}

// =============================================================================
// Report Types
// =============================================================================

/// The combined equality/range conditions applied uniformly to both the
/// row-level and grouped-statistics queries of a report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongPredicate {
    pub artist_id: Option<String>,
    pub genre_id: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl SongPredicate {
    /// Render the predicate as a SQL WHERE fragment over a `songs s` table
    /// plus positional parameters. Empty predicate renders as no clause.
    pub fn where_clause(&self) -> (String, Vec<rusqlite::types::Value>) {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<rusqlite::types::Value> = Vec::new();

        if let Some(artist_id) = &self.artist_id {
            params.push(artist_id.clone().into());
            conditions.push(format!("s.artist_id = ?{}", params.len()));
        }
        if let Some(genre_id) = &self.genre_id {
            params.push(genre_id.clone().into());
            conditions.push(format!("s.genre_id = ?{}", params.len()));
        }
        if let Some(start_year) = self.start_year {
            params.push(i64::from(start_year).into());
            conditions.push(format!("s.release_year >= ?{}", params.len()));
        }
        if let Some(end_year) = self.end_year {
            params.push(i64::from(end_year).into());
            conditions.push(format!("s.release_year <= ?{}", params.len()));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

/// Aggregate statistics over the matching song set.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_songs: i64,
    /// Arithmetic mean of `duration`; 0 when there are no matches.
    pub average_duration: f64,
    /// Genre name to count of matching songs.
    pub songs_per_genre: BTreeMap<String, i64>,
}

/// A filtered report: the matching songs plus statistics computed over the
/// identical predicate.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Report {
    pub songs: Vec<ResolvedSong>,
    pub stats: ReportStats,
}
