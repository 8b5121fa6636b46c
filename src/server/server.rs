use anyhow::Result;
use std::time::Duration;

use chrono::{Datelike, Utc};
use tower_http::services::ServeDir;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};
use crate::catalog::{ArtistResolver, PlaylistMembership, ReportEngine, ReportFilter};
use crate::catalog_store::{
    new_entity_id, CatalogError, Genre, Playlist, Song,
};
use crate::server::error::{ApiError, ApiResult};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct StatusMessage {
    message: &'static str,
}

#[derive(Deserialize, Debug)]
struct CreateArtistBody {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CreateGenreBody {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateSongBody {
    pub title: Option<String>,
    pub duration: Option<i64>,
    pub release_year: Option<i32>,
    pub artist_id: Option<String>,
    pub artist_name: Option<String>,
    pub genre_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UpdateSongBody {
    pub title: Option<String>,
    pub duration: Option<i64>,
    pub release_year: Option<i32>,
    pub artist_id: Option<String>,
    pub genre_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CreatePlaylistBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct UpdatePlaylistBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AddSongToPlaylistBody {
    pub song_id: Option<String>,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
    };
    Json(stats)
}

// =============================================================================
// Artists
// =============================================================================

async fn get_artists(State(store): State<GuardedCatalogStore>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_artists()?))
}

async fn post_artist(
    State(resolver): State<ArtistResolver>,
    Json(body): Json<CreateArtistBody>,
) -> ApiResult<impl IntoResponse> {
    let name = body.name.as_deref().unwrap_or_default();
    let artist = resolver.resolve_or_create(name)?;
    Ok((StatusCode::CREATED, Json(artist)))
}

// =============================================================================
// Genres
// =============================================================================

async fn get_genres(State(store): State<GuardedCatalogStore>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_genres()?))
}

async fn post_genre(
    State(store): State<GuardedCatalogStore>,
    Json(body): Json<CreateGenreBody>,
) -> ApiResult<impl IntoResponse> {
    let name = body.name.as_deref().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::Validation("Name is required".to_string()).into());
    }
    let genre = Genre {
        id: new_entity_id(),
        name,
    };
    store.insert_genre(&genre)?;
    Ok((StatusCode::CREATED, Json(genre)))
}

// =============================================================================
// Songs
// =============================================================================

fn validate_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(CatalogError::Validation("Title is required".to_string()).into());
    }
    Ok(title)
}

fn validate_duration(duration: i64) -> Result<i64, ApiError> {
    if duration < 0 {
        return Err(CatalogError::Validation(
            "Duration must be a non-negative number".to_string(),
        )
        .into());
    }
    Ok(duration)
}

fn validate_release_year(year: i32) -> Result<i32, ApiError> {
    let current_year = Utc::now().year();
    if year < 1900 || year > current_year {
        return Err(CatalogError::Validation(format!(
            "Release year must be between 1900 and {}",
            current_year
        ))
        .into());
    }
    Ok(year)
}

fn validate_genre_id(store: &GuardedCatalogStore, genre_id: &str) -> Result<String, ApiError> {
    match store.get_genre(genre_id)? {
        Some(genre) => Ok(genre.id),
        None => Err(CatalogError::Validation("Unknown genre".to_string()).into()),
    }
}

fn validate_artist_id(store: &GuardedCatalogStore, artist_id: &str) -> Result<String, ApiError> {
    match store.get_artist(artist_id)? {
        Some(artist) => Ok(artist.id),
        None => Err(CatalogError::Validation("Unknown artist".to_string()).into()),
    }
}

async fn get_songs(State(store): State<GuardedCatalogStore>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_songs()?))
}

async fn get_song(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let song = store.get_song(&id)?.ok_or(CatalogError::NotFound("Song"))?;
    Ok(Json(song))
}

async fn get_songs_report(
    State(report_engine): State<ReportEngine>,
    Query(filter): Query<ReportFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(report_engine.build_report(&filter)?))
}

async fn post_song(
    State(state): State<ServerState>,
    Json(body): Json<CreateSongBody>,
) -> ApiResult<impl IntoResponse> {
    let store = &state.catalog_store;

    let title = validate_title(body.title.as_deref().unwrap_or_default())?;
    let duration = validate_duration(
        body.duration
            .ok_or_else(|| CatalogError::Validation("Duration is required".to_string()))?,
    )?;
    let release_year = validate_release_year(
        body.release_year
            .ok_or_else(|| CatalogError::Validation("Release year is required".to_string()))?,
    )?;
    let genre_id = validate_genre_id(
        store,
        body.genre_id
            .as_deref()
            .ok_or_else(|| CatalogError::Validation("Genre is required".to_string()))?,
    )?;

    // The artist arrives either as an existing id or as a free-form name
    // that goes through identity resolution.
    let artist_id = match (body.artist_id.as_deref(), body.artist_name.as_deref()) {
        (Some(artist_id), _) => validate_artist_id(store, artist_id)?,
        (None, Some(artist_name)) => state.artist_resolver.resolve_or_create(artist_name)?.id,
        (None, None) => {
            return Err(CatalogError::Validation("Artist is required".to_string()).into())
        }
    };

    let song = Song {
        id: new_entity_id(),
        title,
        duration,
        release_year,
        artist_id,
        genre_id,
    };
    store.insert_song(&song)?;

    let resolved = store
        .get_song(&song.id)?
        .ok_or(CatalogError::NotFound("Song"))?;
    Ok((StatusCode::CREATED, Json(resolved)))
}

async fn put_song(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSongBody>,
) -> ApiResult<impl IntoResponse> {
    let existing = store
        .get_song_record(&id)?
        .ok_or(CatalogError::NotFound("Song"))?;

    let song = Song {
        id: existing.id,
        title: match body.title.as_deref() {
            Some(title) => validate_title(title)?,
            None => existing.title,
        },
        duration: match body.duration {
            Some(duration) => validate_duration(duration)?,
            None => existing.duration,
        },
        release_year: match body.release_year {
            Some(year) => validate_release_year(year)?,
            None => existing.release_year,
        },
        artist_id: match body.artist_id.as_deref() {
            Some(artist_id) => validate_artist_id(&store, artist_id)?,
            None => existing.artist_id,
        },
        genre_id: match body.genre_id.as_deref() {
            Some(genre_id) => validate_genre_id(&store, genre_id)?,
            None => existing.genre_id,
        },
    };
    if !store.update_song(&song)? {
        return Err(CatalogError::NotFound("Song").into());
    }

    let resolved = store
        .get_song(&song.id)?
        .ok_or(CatalogError::NotFound("Song"))?;
    Ok(Json(resolved))
}

async fn delete_song(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !store.delete_song(&id)? {
        return Err(CatalogError::NotFound("Song").into());
    }
    Ok(Json(StatusMessage {
        message: "Song deleted successfully",
    }))
}

// =============================================================================
// Playlists
// =============================================================================

async fn get_playlists(State(store): State<GuardedCatalogStore>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_playlists()?))
}

async fn get_playlist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let playlist = store
        .get_playlist_resolved(&id)?
        .ok_or(CatalogError::NotFound("Playlist"))?;
    Ok(Json(playlist))
}

async fn post_playlist(
    State(store): State<GuardedCatalogStore>,
    Json(body): Json<CreatePlaylistBody>,
) -> ApiResult<impl IntoResponse> {
    let name = body.name.as_deref().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::Validation("Name is required".to_string()).into());
    }
    let playlist = Playlist {
        id: new_entity_id(),
        name,
        description: body.description,
    };
    store.insert_playlist(&playlist)?;

    let resolved = store
        .get_playlist_resolved(&playlist.id)?
        .ok_or(CatalogError::NotFound("Playlist"))?;
    Ok((StatusCode::CREATED, Json(resolved)))
}

async fn put_playlist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePlaylistBody>,
) -> ApiResult<impl IntoResponse> {
    if let Some(name) = body.name.as_deref() {
        if name.trim().is_empty() {
            return Err(CatalogError::Validation("Name is required".to_string()).into());
        }
    }
    let updated = store.update_playlist(
        &id,
        body.name.as_deref().map(str::trim),
        body.description.as_deref(),
    )?;
    if !updated {
        return Err(CatalogError::NotFound("Playlist").into());
    }

    let resolved = store
        .get_playlist_resolved(&id)?
        .ok_or(CatalogError::NotFound("Playlist"))?;
    Ok(Json(resolved))
}

async fn delete_playlist(
    State(store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !store.delete_playlist(&id)? {
        return Err(CatalogError::NotFound("Playlist").into());
    }
    Ok(Json(StatusMessage {
        message: "Playlist deleted successfully",
    }))
}

async fn post_playlist_song(
    State(membership): State<PlaylistMembership>,
    Path(id): Path<String>,
    Json(body): Json<AddSongToPlaylistBody>,
) -> ApiResult<impl IntoResponse> {
    let song_id = body
        .song_id
        .as_deref()
        .ok_or_else(|| CatalogError::Validation("songId is required".to_string()))?;
    Ok(Json(membership.add_song(&id, song_id)?))
}

async fn delete_playlist_song(
    State(membership): State<PlaylistMembership>,
    Path((id, song_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    membership.remove_song(&id, &song_id)?;
    Ok(Json(StatusMessage {
        message: "Song removed from playlist",
    }))
}

// =============================================================================
// App
// =============================================================================

pub fn make_app(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Router {
    let state = ServerState::new(config.clone(), catalog_store);

    let api_routes = Router::new()
        .route("/artists", get(get_artists).post(post_artist))
        .route("/genres", get(get_genres).post(post_genre))
        .route("/songs", get(get_songs).post(post_song))
        .route("/songs/report", get(get_songs_report))
        .route(
            "/songs/{id}",
            get(get_song).put(put_song).delete(delete_song),
        )
        .route("/playlists", get(get_playlists).post(post_playlist))
        .route(
            "/playlists/{id}",
            get(get_playlist).put(put_playlist).delete(delete_playlist),
        )
        .route("/playlists/{id}/songs", post(post_playlist_song))
        .route("/playlists/{id}/songs/{song_id}", delete(delete_playlist_song))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    catalog_store: GuardedCatalogStore,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    frontend_dir_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        frontend_dir_path,
    };
    let app = make_app(config, catalog_store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
