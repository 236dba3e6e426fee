//! Last.fm API response models

use serde::{Deserialize, Serialize};

/// A track similar to a seed track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarTrack {
    /// Track title
    pub name: String,
    /// Artist name
    pub artist: String,
    /// Similarity score (0.0 - 1.0)
    pub match_score: f64,
    /// URL to the Last.fm track page
    pub url: Option<String>,
}

/// A top track for a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagTrack {
    /// Track title
    pub name: String,
    /// Artist name
    pub artist: String,
    /// Position in the tag chart (1-based)
    pub rank: Option<u32>,
    /// URL to the Last.fm track page
    pub url: Option<String>,
}

// Internal response types for deserialization
//
// A missing wrapper or track list is "no results", so everything below the
// top level is optional and defaults to empty.

#[derive(Debug, Deserialize)]
pub(crate) struct SimilarTracksResponse {
    #[serde(default)]
    pub similartracks: Option<TrackListWrapper<RawSimilarTrack>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagTopTracksResponse {
    #[serde(default)]
    pub tracks: Option<TrackListWrapper<RawTagTrack>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackListWrapper<T> {
    #[serde(default = "Vec::new")]
    pub track: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArtistRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSimilarTrack {
    pub name: String,
    pub artist: RawArtistRef,
    /// Sent as a number by `track.getsimilar`, as a string by older endpoints
    #[serde(rename = "match", default)]
    pub match_score: Option<serde_json::Value>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTagTrack {
    pub name: String,
    pub artist: RawArtistRef,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "@attr", default)]
    pub attr: Option<RankAttr>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankAttr {
    pub rank: String,
}

fn parse_match_score(name: &str, raw: Option<&serde_json::Value>) -> f64 {
    let parsed = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    };

    match parsed {
        Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
        _ => {
            tracing::warn!(
                track = %name,
                raw_score = ?raw,
                "Failed to parse match score, defaulting to 0.0"
            );
            0.0
        }
    }
}

impl From<RawSimilarTrack> for SimilarTrack {
    fn from(raw: RawSimilarTrack) -> Self {
        let match_score = parse_match_score(&raw.name, raw.match_score.as_ref());
        Self {
            name: raw.name,
            artist: raw.artist.name,
            match_score,
            url: raw.url.filter(|s| !s.is_empty()),
        }
    }
}

impl From<RawTagTrack> for TagTrack {
    fn from(raw: RawTagTrack) -> Self {
        Self {
            name: raw.name,
            artist: raw.artist.name,
            rank: raw.attr.and_then(|a| a.rank.parse().ok()),
            url: raw.url.filter(|s| !s.is_empty()),
        }
    }
}

/// Last.fm API error response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: i32,
    pub message: String,
}
