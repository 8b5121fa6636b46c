//! Filtered analytical reports over the catalog.
//!
//! A report runs two queries against the same predicate: the row-level song
//! list and the grouped statistics. Filter values arrive as raw query-string
//! text; malformed values drop their filter dimension instead of failing the
//! request, widening the report rather than erroring (see DESIGN.md).

use crate::catalog_store::{
    is_entity_id, CatalogError, CatalogStore, Report, SongPredicate,
};
use serde::Deserialize;
use std::sync::Arc;

/// Raw report filter parameters, before syntactic validation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub genre_id: Option<String>,
    pub artist_id: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

impl ReportFilter {
    /// Build the aggregation predicate, dropping filter dimensions whose
    /// value is not syntactically valid (non-24-hex ids, non-numeric years).
    pub fn to_predicate(&self) -> SongPredicate {
        SongPredicate {
            artist_id: self
                .artist_id
                .as_deref()
                .filter(|s| is_entity_id(s))
                .map(str::to_string),
            genre_id: self
                .genre_id
                .as_deref()
                .filter(|s| is_entity_id(s))
                .map(str::to_string),
            start_year: self.start_year.as_deref().and_then(|s| s.parse().ok()),
            end_year: self.end_year.as_deref().and_then(|s| s.parse().ok()),
        }
    }
}

#[derive(Clone)]
pub struct ReportEngine {
    store: Arc<dyn CatalogStore>,
}

impl ReportEngine {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        ReportEngine { store }
    }

    /// Run the row-level and grouped-statistics queries against the
    /// identical predicate and combine them.
    pub fn build_report(&self, filter: &ReportFilter) -> Result<Report, CatalogError> {
        let predicate = filter.to_predicate();
        let songs = self.store.query_songs(&predicate)?;
        let stats = self.store.aggregate_songs(&predicate)?;
        Ok(Report { songs, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::{new_entity_id, Artist, Genre, Song, SqliteCatalogStore};
    use tempfile::TempDir;

    #[test]
    fn test_valid_ids_are_kept() {
        let filter = ReportFilter {
            genre_id: Some("a".repeat(24)),
            artist_id: Some("507f1f77bcf86cd799439011".to_string()),
            ..Default::default()
        };
        let predicate = filter.to_predicate();
        assert_eq!(predicate.genre_id, Some("a".repeat(24)));
        assert_eq!(
            predicate.artist_id,
            Some("507f1f77bcf86cd799439011".to_string())
        );
    }

    #[test]
    fn test_malformed_ids_are_dropped_not_rejected() {
        let filter = ReportFilter {
            genre_id: Some("not-an-id".to_string()),
            artist_id: Some("123".to_string()),
            ..Default::default()
        };
        let predicate = filter.to_predicate();
        assert_eq!(predicate, SongPredicate::default());
    }

    #[test]
    fn test_years_parse_independently() {
        let filter = ReportFilter {
            start_year: Some("2020".to_string()),
            end_year: Some("twenty-one".to_string()),
            ..Default::default()
        };
        let predicate = filter.to_predicate();
        assert_eq!(predicate.start_year, Some(2020));
        assert_eq!(predicate.end_year, None);
    }

    fn seeded_engine() -> (TempDir, ReportEngine, String, String) {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn CatalogStore> =
            Arc::new(SqliteCatalogStore::new(dir.path().join("catalog.db"), 2).unwrap());

        let artist = Artist {
            id: new_entity_id(),
            name: "queen".to_string(),
        };
        store.insert_artist(&artist).unwrap();
        let rock = Genre {
            id: new_entity_id(),
            name: "Rock".to_string(),
        };
        let pop = Genre {
            id: new_entity_id(),
            name: "Pop".to_string(),
        };
        store.insert_genre(&rock).unwrap();
        store.insert_genre(&pop).unwrap();

        for (title, duration, year, genre) in [
            ("A", 120, 2019, &rock),
            ("B", 180, 2020, &rock),
            ("C", 240, 2021, &pop),
        ] {
            store
                .insert_song(&Song {
                    id: new_entity_id(),
                    title: title.to_string(),
                    duration,
                    release_year: year,
                    artist_id: artist.id.clone(),
                    genre_id: genre.id.clone(),
                })
                .unwrap();
        }

        let engine = ReportEngine::new(store);
        (dir, engine, rock.id.clone(), artist.id.clone())
    }

    #[test]
    fn test_year_range_filters_rows_and_stats_identically() {
        let (_dir, engine, _rock_id, _artist_id) = seeded_engine();
        let report = engine
            .build_report(&ReportFilter {
                start_year: Some("2020".to_string()),
                end_year: Some("2021".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(report.songs.len(), 2);
        assert!(report
            .songs
            .iter()
            .all(|s| (2020..=2021).contains(&s.release_year)));
        assert_eq!(report.stats.total_songs, 2);
        assert_eq!(report.stats.average_duration, 210.0);
    }

    #[test]
    fn test_unfiltered_per_genre_counts_sum_to_total() {
        let (_dir, engine, _rock_id, _artist_id) = seeded_engine();
        let report = engine.build_report(&ReportFilter::default()).unwrap();
        assert_eq!(
            report.stats.songs_per_genre.values().sum::<i64>(),
            report.stats.total_songs
        );
    }

    #[test]
    fn test_genre_filter_leaves_at_most_one_genre_entry() {
        let (_dir, engine, rock_id, _artist_id) = seeded_engine();
        let report = engine
            .build_report(&ReportFilter {
                genre_id: Some(rock_id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(report.stats.songs_per_genre.len(), 1);
        assert_eq!(report.stats.total_songs, 2);
        assert_eq!(report.songs.len(), 2);
    }

    #[test]
    fn test_malformed_artist_id_is_ignored() {
        let (_dir, engine, _rock_id, _artist_id) = seeded_engine();
        let report = engine
            .build_report(&ReportFilter {
                artist_id: Some("definitely-not-hex".to_string()),
                ..Default::default()
            })
            .unwrap();
        // The filter dimension is dropped, not rejected
        assert_eq!(report.stats.total_songs, 3);
    }

    #[test]
    fn test_empty_catalog_report() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn CatalogStore> =
            Arc::new(SqliteCatalogStore::new(dir.path().join("catalog.db"), 1).unwrap());
        let engine = ReportEngine::new(store);

        let report = engine.build_report(&ReportFilter::default()).unwrap();
        assert!(report.songs.is_empty());
        assert_eq!(report.stats.total_songs, 0);
        assert_eq!(report.stats.average_duration, 0.0);
    }
}
