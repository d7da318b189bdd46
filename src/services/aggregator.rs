use axum::{
    Json, Router,
    extract::{Query, rejection::QueryRejection},
    routing::get,
};
use log::debug;

use crate::services::{
    entities::{SearchParams, SearchResponse, TrackResult},
    errors::{Error, Result},
};

/// Router serving `GET /search`
pub fn router() -> Router {
    Router::new().route("/search", get(search))
}

/// Search free catalogues for tracks matching the query.
///
/// Results are fixed until a catalogue backend is wired in.
pub async fn search(
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(params) = params.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    debug!("Searching tracks for {:?}", params.query);

    Ok(Json(SearchResponse {
        query: params.query,
        results: vec![
            TrackResult::new("Free Track 1", "http://example.com/track1"),
            TrackResult::new("Free Track 2", "http://example.com/track2"),
        ],
    }))
}
