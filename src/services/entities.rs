use serde::{Deserialize, Serialize};

/// A track as listed in search and recommendation results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResult {
    /// Display title
    pub title: String,
    /// Where the track can be played or downloaded
    pub url: String,
}

impl TrackResult {
    /// Track from borrowed title and url
    pub fn new(title: &str, url: &str) -> Self {
        TrackResult {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// Query string of `GET /search`
pub struct SearchParams {
    /// Free-text search terms
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Body of `GET /search`
pub struct SearchResponse {
    /// The query as received
    pub query: String,
    /// Matching tracks
    pub results: Vec<TrackResult>,
}

/// Verdict returned by the fingerprint service for an uploaded file
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Always `ok` once the upload is stored
    pub status: String,
    /// Whether the audio matched a copyrighted work
    pub copyrighted: bool,
    /// Filename as sent by the client
    pub filename: String,
}

#[derive(Debug, Deserialize)]
/// Query string of `GET /recommend`
pub struct RecommendParams {
    /// Track to find neighbours for
    pub track_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Body of `GET /recommend`
pub struct RecommendResponse {
    /// The track id as received
    pub track_id: String,
    /// Similar tracks
    pub similar: Vec<TrackResult>,
}
