//! Candidate sources

use async_trait::async_trait;
use spindj_lastfm_client::{LastfmClient, LastfmError};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::Candidate;

/// Read-only catalog of track relationships
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Tracks similar to a seed track; empty if the catalog has none
    async fn similar_tracks(
        &self,
        artist: &str,
        track: &str,
        limit: u32,
    ) -> PipelineResult<Vec<Candidate>>;

    /// Most popular tracks for a tag; empty if the tag is unknown
    async fn top_tracks_by_tag(&self, tag: &str, limit: u32) -> PipelineResult<Vec<Candidate>>;
}

/// Unknown seeds and tags yield no candidates; every other failure makes
/// the catalog unavailable.
fn absorb_not_found(err: LastfmError) -> PipelineResult<Vec<Candidate>> {
    match err {
        LastfmError::NotFound(subject) => {
            debug!(subject = %subject, "Last.fm has no entry, treating as empty");
            Ok(Vec::new())
        }
        LastfmError::InvalidInput(msg) => Err(PipelineError::InvalidRequest(msg)),
        other => Err(PipelineError::CatalogUnavailable(other.to_string())),
    }
}

#[async_trait]
impl CatalogSource for LastfmClient {
    async fn similar_tracks(
        &self,
        artist: &str,
        track: &str,
        limit: u32,
    ) -> PipelineResult<Vec<Candidate>> {
        match self.get_similar_tracks(artist, track, Some(limit)).await {
            Ok(tracks) => Ok(tracks
                .into_iter()
                .map(|t| Candidate::new(t.name, t.artist))
                .collect()),
            Err(e) => absorb_not_found(e),
        }
    }

    async fn top_tracks_by_tag(&self, tag: &str, limit: u32) -> PipelineResult<Vec<Candidate>> {
        match self.get_tag_top_tracks(tag, Some(limit)).await {
            Ok(tracks) => Ok(tracks
                .into_iter()
                .map(|t| Candidate::new(t.name, t.artist))
                .collect()),
            Err(e) => absorb_not_found(e),
        }
    }
}
