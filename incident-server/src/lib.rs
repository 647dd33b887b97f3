pub mod auth;
pub mod config;
pub mod guard;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use config::ServerConfig;
use incident_core::{ApiClient, MemoryTokenStore};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            api: ApiClient::new(
                config.api_base_url.clone(),
                Arc::new(MemoryTokenStore::default()),
            ),
        }
    }
}

/// Login plumbing plus the compiled UI. Unknown paths fall back to
/// `index.html` so the browser app can route `/incidents/...` itself, except
/// under `/api`, where an unknown path is a plain 404.
pub fn dashboard_router(state: AppState, ui_dir: &Path) -> Router {
    let index = ui_dir.join("index.html");
    let assets = ServeDir::new(ui_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/", get(|| async { Redirect::temporary(auth::DEFAULT_LANDING) }))
        .route("/health", get(|| async { "ok" }))
        .route("/login", get(auth::login_page))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .fallback(move |req: Request| ui_or_api_not_found(assets.clone(), req))
        .layer(middleware::from_fn(guard::require_token))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ui_or_api_not_found(assets: ServeDir<ServeFile>, req: Request) -> Response {
    let path = req.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        tracing::debug!(path, "no dashboard route for api path");
        return StatusCode::NOT_FOUND.into_response();
    }
    match assets.oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}
