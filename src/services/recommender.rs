use axum::{
    Json, Router,
    extract::{Query, rejection::QueryRejection},
    routing::get,
};
use log::debug;

use crate::services::{
    entities::{RecommendParams, RecommendResponse, TrackResult},
    errors::{Error, Result},
};

/// Router serving `GET /recommend`
pub fn router() -> Router {
    Router::new().route("/recommend", get(recommend))
}

/// Tracks similar to the given one.
///
/// There is no similarity index yet, so the same two entries come back for
/// every track id.
pub async fn recommend(
    params: std::result::Result<Query<RecommendParams>, QueryRejection>,
) -> Result<Json<RecommendResponse>> {
    let Query(params) = params.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    debug!("Recommending tracks similar to {}", params.track_id);

    Ok(Json(RecommendResponse {
        track_id: params.track_id,
        similar: vec![
            TrackResult::new("Similar Track A", "http://example.com/a"),
            TrackResult::new("Similar Track B", "http://example.com/b"),
        ],
    }))
}
