use axum::extract::FromRef;

use crate::catalog::{ArtistResolver, PlaylistMembership, ReportEngine};
use crate::catalog_store::CatalogStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub artist_resolver: ArtistResolver,
    pub report_engine: ReportEngine,
    pub playlist_membership: PlaylistMembership,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            artist_resolver: ArtistResolver::new(catalog_store.clone()),
            report_engine: ReportEngine::new(catalog_store.clone()),
            playlist_membership: PlaylistMembership::new(catalog_store.clone()),
            catalog_store,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for ArtistResolver {
    fn from_ref(input: &ServerState) -> Self {
        input.artist_resolver.clone()
    }
}

impl FromRef<ServerState> for ReportEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.report_engine.clone()
    }
}

impl FromRef<ServerState> for PlaylistMembership {
    fn from_ref(input: &ServerState) -> Self {
        input.playlist_membership.clone()
    }
}
