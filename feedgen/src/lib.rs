//! feedgen library interface
//!
//! Builds streaming-platform feed documents from a content catalog. The
//! binary in `main.rs` wraps this as a one-shot CLI or an HTTP service.

pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod transform;

pub use crate::error::{ApiError, ApiResult, PipelineError, SinkError};

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use feedgen_common::config::TomlConfig;

use crate::services::FeedPipeline;

/// Application state shared across handlers
///
/// Only immutable configuration and the pipeline (itself immutable) are
/// shared between requests; `last_error` is diagnostics.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<FeedPipeline>,
    /// Storage folder feeds are uploaded to
    pub storage_path: String,
    pub timestamped_filenames: bool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Error from the last failed run
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(pipeline: Arc<FeedPipeline>, config: &TomlConfig) -> Self {
        Self {
            pipeline,
            storage_path: config.storage.path.clone(),
            timestamped_filenames: config.storage.timestamped_filenames,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::generate_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
