use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod tui;
pub mod version;

pub use config::Config;
pub use db::{DataFile, StorePool};
pub use models::{Bookmark, BookmarkUpdate, NewBookmark};

#[derive(Clone)]
pub struct AppState {
    pub store: StorePool,
    pub config: Arc<Config>,
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/bookmarks",
            get(handlers::bookmark::list_bookmarks).post(handlers::bookmark::create_bookmark),
        )
        .route(
            "/api/bookmarks/{id}",
            get(handlers::bookmark::get_bookmark)
                .put(handlers::bookmark::update_bookmark)
                .delete(handlers::bookmark::delete_bookmark),
        )
        .route("/api/metadata", get(handlers::metadata::fetch_metadata))
        .route("/api/health", get(handlers::health::health_check))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

fn finish(router: Router<AppState>, state: AppState) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// JSON API only.
pub fn create_api_router(state: AppState) -> Router {
    let router = api_routes().fallback(handlers::not_found);
    finish(router, state)
}

/// JSON API plus the web UI. Unmatched paths are served from
/// `config.static_dir` when one is configured.
pub fn create_router(state: AppState) -> Router {
    let router = api_routes()
        .route("/", get(handlers::pages::index_page))
        .route("/all", get(handlers::pages::all_page));

    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router.fallback(handlers::not_found),
    };

    finish(router, state)
}
