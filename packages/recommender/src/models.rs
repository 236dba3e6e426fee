//! Pipeline data types

use serde::{Deserialize, Serialize};

/// A track known to Last.fm, not yet tied to a Spotify ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub artist: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
        }
    }

    /// Case-insensitive identity used for deduplication
    pub(crate) fn dedup_key(&self) -> (String, String) {
        (self.artist.to_lowercase(), self.name.to_lowercase())
    }
}

/// A candidate resolved to a Spotify track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    /// Spotify track ID, never empty
    pub id: String,
    /// Title as returned by Spotify
    pub name: String,
    /// Artist name carried over from the candidate
    pub artist: String,
    pub url: String,
}

impl ResolvedTrack {
    /// `spotify:track:` URI for playlist insertion
    pub fn uri(&self) -> String {
        spindj_spotify_client::track_uri(&self.id)
    }
}

/// Ordered, non-empty set of lowercase Last.fm tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Build a tag set, dropping duplicates after the first occurrence
    pub(crate) fn from_ordered<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into().to_lowercase();
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
        Self(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
