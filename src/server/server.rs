use anyhow::{Context, Result};
use std::sync::Arc;

use tracing::{error, info};

use crate::catalog::{
    CatalogError, CatalogResult, SongCatalog, SongDetails, SongDisplay, SongQuery,
};
use crate::catalog_store::{Page, SongStats};
use tower_http::services::ServeDir;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Deserialize, Debug, Default)]
struct PageParams {
    page: Option<i64>,
    size: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
struct NameSearchParams {
    songname: Option<String>,
    page: Option<i64>,
    size: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
struct SearchParams {
    page: Option<i64>,
    size: Option<i64>,
    sortby: Option<String>,
    sortdirection: Option<String>,
    songname: Option<String>,
    artistname: Option<String>,
    albumname: Option<String>,
    releaseyear: Option<String>,
    minpopularity: Option<i64>,
}

impl From<SearchParams> for SongQuery {
    fn from(params: SearchParams) -> Self {
        SongQuery {
            page: params.page,
            size: params.size,
            sort_by: params.sortby,
            sort_direction: params.sortdirection,
            track_name: params.songname,
            artist_name: params.artistname,
            album_name: params.albumname,
            release_year: params.releaseyear,
            min_popularity: params.minpopularity,
        }
    }
}

/// Runs a synchronous catalog call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> CatalogResult<T>
where
    F: FnOnce() -> CatalogResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap_or_else(|err| {
        error!("Catalog task failed: {:?}", err);
        Err(CatalogError::StorageFailure(
            "Catalog task failed".to_string(),
        ))
    })
}

/// Malformed query strings are reported like any other invalid query.
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> CatalogResult<T> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| CatalogError::InvalidQuery(rejection.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> CatalogResult<T> {
    body.map(|Json(body)| body)
        .map_err(|rejection| CatalogError::InvalidSong(rejection.body_text()))
}

fn page_response(result: CatalogResult<Page<SongDisplay>>) -> Response {
    match result {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn list_songs(
    State(catalog): State<GuardedSongCatalog>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let params = match query_params(params) {
        Ok(params) => params,
        Err(err) => return err.into_response(),
    };
    page_response(run_blocking(move || catalog.list_all(params.page, params.size)).await)
}

async fn search_songs(
    State(catalog): State<GuardedSongCatalog>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let params = match query_params(params) {
        Ok(params) => params,
        Err(err) => return err.into_response(),
    };
    let query = SongQuery::from(params);
    page_response(run_blocking(move || catalog.search(&query)).await)
}

async fn search_songs_by_prefix(
    State(catalog): State<GuardedSongCatalog>,
    params: Result<Query<NameSearchParams>, QueryRejection>,
) -> Response {
    let params = match query_params(params) {
        Ok(params) => params,
        Err(err) => return err.into_response(),
    };
    let name = params.songname.unwrap_or_default();
    page_response(
        run_blocking(move || catalog.search_by_name_prefix(&name, params.page, params.size))
            .await,
    )
}

async fn search_songs_by_substring(
    State(catalog): State<GuardedSongCatalog>,
    params: Result<Query<NameSearchParams>, QueryRejection>,
) -> Response {
    let params = match query_params(params) {
        Ok(params) => params,
        Err(err) => return err.into_response(),
    };
    let name = params.songname.unwrap_or_default();
    page_response(
        run_blocking(move || catalog.search_by_name_substring(&name, params.page, params.size))
            .await,
    )
}

async fn get_song(
    State(catalog): State<GuardedSongCatalog>,
    Path(isrc): Path<String>,
) -> Response {
    match run_blocking(move || catalog.get_by_isrc(&isrc)).await {
        Ok(details) => Json(details).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_song(
    State(catalog): State<GuardedSongCatalog>,
    details: Result<Json<SongDetails>, JsonRejection>,
) -> Response {
    let details = match json_body(details) {
        Ok(details) => details,
        Err(err) => return err.into_response(),
    };
    match run_blocking(move || catalog.create(details)).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_song_stats(
    State(catalog): State<GuardedSongCatalog>,
    Path(isrc): Path<String>,
) -> Response {
    match run_blocking(move || catalog.get_song_stats(&isrc)).await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_song_stats(
    State(catalog): State<GuardedSongCatalog>,
    Path(isrc): Path<String>,
    stats: Result<Json<SongStats>, JsonRejection>,
) -> Response {
    let stats = match json_body(stats) {
        Ok(stats) => stats,
        Err(err) => return err.into_response(),
    };
    match run_blocking(move || catalog.create_song_stats(&isrc, stats)).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_app(config: ServerConfig, catalog: SongCatalog) -> Result<Router> {
    let state = ServerState {
        config: config.clone(),
        catalog: Arc::new(catalog),
    };

    let song_routes: Router = Router::new()
        .route("/songs", get(list_songs))
        .route("/songs/search", get(search_songs_by_prefix))
        .route("/songs/search/including", get(search_songs_by_substring))
        .route("/song", get(search_songs).post(post_song))
        .route("/song/{isrc}", get(get_song))
        .route("/song/{isrc}/stats", get(get_song_stats).post(post_song_stats))
        .with_state(state.clone());

    let mut app: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            song_routes.fallback_service(static_files_service)
        }
        None => song_routes,
    };
    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    catalog: SongCatalog,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    frontend_dir_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        frontend_dir_path,
    };
    let app = make_app(config, catalog)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
