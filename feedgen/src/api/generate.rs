//! Feed generation endpoint
//!
//! `GET /generate-feed?brandId=<id>` runs the whole pipeline for the brand
//! and uploads the result. The request blocks until the run finishes.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::{checked_brand_id, remote_destination};
use crate::AppState;

pub const MISSING_BRAND_ID: &str = "Missing brandId query param";

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    #[serde(rename = "brandId")]
    pub brand_id: Option<String>,
}

/// 200 response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub message: String,
    pub brand_id: String,
    pub feed_url: String,
    pub asset_count: usize,
    pub dropped_count: usize,
}

/// GET /generate-feed
pub async fn generate_feed(
    State(state): State<AppState>,
    Query(params): Query<GenerateParams>,
) -> ApiResult<Json<GenerateResponse>> {
    let brand_id = params
        .brand_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_BRAND_ID.to_string()))?;
    let brand_id = checked_brand_id(brand_id)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .to_string();

    tracing::info!(brand_id = %brand_id, "Feed generation requested");

    let destination = remote_destination(&state.storage_path, &brand_id, state.timestamped_filenames);

    match state.pipeline.run(&brand_id, &destination).await {
        Ok(published) => {
            *state.last_error.write().await = None;
            Ok(Json(GenerateResponse {
                message: "Feed generated successfully".to_string(),
                brand_id,
                feed_url: published.location,
                asset_count: published.report.assets_emitted,
                dropped_count: published.report.dropped_total(),
            }))
        }
        Err(e) => {
            tracing::error!(brand_id = %brand_id, error = %e, "Feed generation failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(ApiError::Pipeline(e))
        }
    }
}

/// Build feed generation routes
pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/generate-feed", get(generate_feed))
}
