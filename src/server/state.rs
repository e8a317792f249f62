use axum::extract::FromRef;

use crate::catalog::SongCatalog;
use std::sync::Arc;

use super::ServerConfig;

pub type GuardedSongCatalog = Arc<SongCatalog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub catalog: GuardedSongCatalog,
}

impl FromRef<ServerState> for GuardedSongCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
