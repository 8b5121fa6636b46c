//! Seeded catalog data for end-to-end tests

use super::constants::*;
use tunedex::catalog_store::{Artist, CatalogStore, Genre, Playlist, Song};

/// Seeds the catalog every e2e test starts from: two artists, two genres,
/// three songs and one empty playlist.
pub fn seed_catalog(store: &dyn CatalogStore) -> anyhow::Result<()> {
    store.insert_artist(&Artist {
        id: ARTIST_1_ID.to_string(),
        name: ARTIST_1_NAME.to_string(),
    })?;
    store.insert_artist(&Artist {
        id: ARTIST_2_ID.to_string(),
        name: ARTIST_2_NAME.to_string(),
    })?;

    store.insert_genre(&Genre {
        id: GENRE_ROCK_ID.to_string(),
        name: "Rock".to_string(),
    })?;
    store.insert_genre(&Genre {
        id: GENRE_JAZZ_ID.to_string(),
        name: "Jazz".to_string(),
    })?;

    for (id, title, duration, year, artist_id, genre_id) in [
        (SONG_1_ID, SONG_1_TITLE, 180, 2019, ARTIST_1_ID, GENRE_ROCK_ID),
        (SONG_2_ID, SONG_2_TITLE, 210, 2020, ARTIST_1_ID, GENRE_ROCK_ID),
        (SONG_3_ID, SONG_3_TITLE, 240, 2021, ARTIST_2_ID, GENRE_JAZZ_ID),
    ] {
        store.insert_song(&Song {
            id: id.to_string(),
            title: title.to_string(),
            duration,
            release_year: year,
            artist_id: artist_id.to_string(),
            genre_id: genre_id.to_string(),
        })?;
    }

    store.insert_playlist(&Playlist {
        id: PLAYLIST_1_ID.to_string(),
        name: "Road Trip".to_string(),
        description: Some("long drives".to_string()),
    })?;

    Ok(())
}
