//! clinmind-sm library - Sample Measurement service
//!
//! HTTP surface over the measurement record store and the image analysis
//! adapter. The browser front end is the only intended client; it holds no
//! state of its own and re-fetches the history after every mutation.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use clinmind_common::records::RecordStore;

pub mod analysis;
pub mod api;

use analysis::Analyzer;

/// Request body ceiling; leaves headroom over the decoded image limit for
/// base64 expansion and the JSON envelope
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record store owning the persisted measurement sequence
    pub store: Arc<dyn RecordStore>,
    /// Image analysis adapter (remote model or local stand-in)
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, analyzer: Arc<Analyzer>) -> Self {
        Self { store, analyzer }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route(
            "/api/measurements",
            get(api::list_measurements)
                .post(api::create_measurement)
                .delete(api::delete_measurement),
        )
        .route("/api/analyze", post(api::analyze_image))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Browser front end may be served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
