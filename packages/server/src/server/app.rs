//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use handle_directory::{Directory, DirectoryConfig, DirectoryStore, MemoryStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    delete_record, health_handler, import_handler, query_handler, set_verified_handler,
    submit_handler,
};

/// Store behind the running server: PostgreSQL in production, memory otherwise.
pub type SharedStore = Arc<dyn DirectoryStore>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory<SharedStore>>,
}

impl AppState {
    pub fn new(store: SharedStore, config: DirectoryConfig) -> Self {
        Self {
            directory: Arc::new(Directory::with_config(store, config)),
        }
    }

    /// State over an empty in-memory store.
    pub fn in_memory(config: DirectoryConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(origins)
}

/// Build the Axum application router
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/directory", get(query_handler))
        .route("/directory/submissions", post(submit_handler))
        .route("/directory/imports", post(import_handler))
        .route("/directory/records/:id/verified", put(set_verified_handler))
        .route("/directory/records/:id", delete(delete_record));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
