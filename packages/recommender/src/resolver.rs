//! Cross-service identity resolution

use std::sync::Arc;

use async_trait::async_trait;
use spindj_spotify_client::{AccessToken, SpotifyAuth, SpotifyClient, SpotifyError, Track};
use tracing::{debug, instrument};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Candidate, ResolvedTrack};

/// Supplies a valid Spotify access token
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> PipelineResult<AccessToken>;

    /// Forget `rejected` so the next [`Self::access_token`] refreshes
    async fn invalidate(&self, rejected: &AccessToken);
}

/// Spotify track search
#[async_trait]
pub trait TrackSearch: Send + Sync {
    async fn search_track(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> PipelineResult<Vec<Track>>;
}

#[async_trait]
impl TokenProvider for SpotifyAuth {
    async fn access_token(&self) -> PipelineResult<AccessToken> {
        self.ensure_access_token()
            .await
            .map_err(|e| PipelineError::AuthUnavailable(e.to_string()))
    }

    async fn invalidate(&self, rejected: &AccessToken) {
        SpotifyAuth::invalidate(self, rejected).await
    }
}

fn search_error(err: SpotifyError) -> PipelineError {
    if err.is_auth_error() {
        PipelineError::AuthUnavailable(err.to_string())
    } else {
        PipelineError::StreamingUnavailable(err.to_string())
    }
}

#[async_trait]
impl TrackSearch for SpotifyClient {
    async fn search_track(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> PipelineResult<Vec<Track>> {
        self.search_tracks(token, query, limit)
            .await
            .map_err(search_error)
    }
}

/// Maps Last.fm candidates onto Spotify tracks via fielded search
#[derive(Clone)]
pub struct IdentityResolver {
    search: Arc<dyn TrackSearch>,
}

impl IdentityResolver {
    pub fn new(search: Arc<dyn TrackSearch>) -> Self {
        Self { search }
    }

    /// Spotify search query for a candidate
    pub fn query_for(candidate: &Candidate) -> String {
        format!("track:{} artist:{}", candidate.name, candidate.artist)
    }

    /// Resolve one candidate
    ///
    /// Returns `Ok(None)` when Spotify has no match, or when the best match
    /// is a local file without a track ID.
    #[instrument(skip(self, token), fields(name = %candidate.name, artist = %candidate.artist))]
    pub async fn resolve(
        &self,
        token: &AccessToken,
        candidate: &Candidate,
    ) -> PipelineResult<Option<ResolvedTrack>> {
        let query = Self::query_for(candidate);
        let results = self.search.search_track(token, &query, 1).await?;

        let Some(track) = results.into_iter().next() else {
            debug!("No Spotify match");
            return Ok(None);
        };

        let id = match track.id.as_deref() {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => {
                debug!("Spotify match has no track ID");
                return Ok(None);
            }
        };

        let url = track
            .spotify_url()
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{}", id));

        Ok(Some(ResolvedTrack {
            id,
            name: track.name,
            artist: candidate.artist.clone(),
            url,
        }))
    }
}
