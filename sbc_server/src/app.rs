use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{routing::get, Router};
use sbc_core::CacheState;
use tower_http::services::ServeDir;

use crate::route;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheState>,
    pub template_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(cache: Arc<CacheState>, template_path: PathBuf) -> Self {
        Self {
            cache,
            template_path: Arc::new(template_path),
        }
    }
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(route::page::handler))
        .route("/api/data", get(route::api::handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
