//! Playlist assembly orchestration

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use spindj_shared_config::PipelineConfig;
use spindj_spotify_client::AccessToken;
use tracing::{debug, info, instrument, warn};

use crate::catalog::CatalogSource;
use crate::dedupe::dedupe;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{Candidate, ResolvedTrack, TagSet};
use crate::resolver::{IdentityResolver, TokenProvider, TrackSearch};
use crate::tags::map_description_to_tags;

/// One catalog lookup; submission order fixes result order
#[derive(Debug, Clone)]
enum CatalogQuery {
    Similar { artist: String, track: String },
    Tag(String),
}

/// Run `fut`, failing with `on_timeout()` once `limit` elapses
async fn bounded<T, F>(
    limit: Duration,
    fut: F,
    on_timeout: impl FnOnce() -> PipelineError,
) -> PipelineResult<T>
where
    F: Future<Output = PipelineResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout()),
    }
}

fn require<'a>(field: &str, value: &'a str) -> PipelineResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::InvalidRequest(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed)
}

/// Builds an ordered list of Spotify tracks from a description and a seed
///
/// Candidates are gathered from the catalog (similar-to-seed first, then
/// each tag in order), deduplicated and resolved on Spotify. Both stages run
/// with bounded concurrency but yield results in submission order, and the
/// first failure in submission order is the one reported.
#[derive(Clone)]
pub struct PlaylistAssembler {
    catalog: Arc<dyn CatalogSource>,
    resolver: IdentityResolver,
    tokens: Arc<dyn TokenProvider>,
    config: PipelineConfig,
}

impl PlaylistAssembler {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        search: Arc<dyn TrackSearch>,
        tokens: Arc<dyn TokenProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            resolver: IdentityResolver::new(search),
            tokens,
            config,
        }
    }

    fn concurrency(&self) -> usize {
        self.config.resolve_concurrency.max(1)
    }

    /// Run the pipeline
    ///
    /// # Errors
    /// - `PipelineError::InvalidRequest` - an input is empty or blank
    /// - `PipelineError::CatalogUnavailable` - a Last.fm lookup failed or timed out
    /// - `PipelineError::AuthUnavailable` - no Spotify access token could be
    ///   obtained, or Spotify rejected a freshly refreshed one
    /// - `PipelineError::StreamingUnavailable` - a Spotify search failed or timed out
    /// - `PipelineError::NoTracksFound` - no candidate resolved to a Spotify track
    #[instrument(skip(self))]
    pub async fn build_playlist(
        &self,
        description: &str,
        seed_artist: &str,
        seed_track: &str,
    ) -> PipelineResult<Vec<ResolvedTrack>> {
        let description = require("description", description)?;
        let seed_artist = require("seed artist", seed_artist)?;
        let seed_track = require("seed track", seed_track)?;

        let tags = map_description_to_tags(description);
        let candidates = self.gather_candidates(seed_artist, seed_track, &tags).await?;
        let gathered = candidates.len();
        let unique = dedupe(candidates);

        debug!(gathered, unique = unique.len(), "Deduplicated candidates");

        if unique.is_empty() {
            return Err(PipelineError::NoTracksFound);
        }

        let token = self.fetch_token().await?;
        let resolved = match self.resolve_all(&token, unique.clone()).await {
            Err(PipelineError::AuthUnavailable(reason)) => {
                // One forced refresh; a second rejection is reported as is
                warn!(reason = %reason, "Spotify rejected the access token, refreshing");
                self.tokens.invalidate(&token).await;
                let token = self.fetch_token().await?;
                self.resolve_all(&token, unique).await?
            }
            other => other?,
        };
        if resolved.is_empty() {
            return Err(PipelineError::NoTracksFound);
        }

        info!(
            tags = ?tags.as_slice(),
            result_count = resolved.len(),
            "Assembled playlist"
        );
        Ok(resolved)
    }

    async fn fetch_token(&self) -> PipelineResult<AccessToken> {
        bounded(
            self.config.call_timeout(),
            self.tokens.access_token(),
            || PipelineError::AuthUnavailable("token refresh timed out".to_string()),
        )
        .await
    }

    async fn gather_candidates(
        &self,
        seed_artist: &str,
        seed_track: &str,
        tags: &TagSet,
    ) -> PipelineResult<Vec<Candidate>> {
        let queries: Vec<CatalogQuery> = std::iter::once(CatalogQuery::Similar {
            artist: seed_artist.to_string(),
            track: seed_track.to_string(),
        })
        .chain(tags.iter().map(|tag| CatalogQuery::Tag(tag.to_string())))
        .collect();

        let batches: Vec<Vec<Candidate>> = stream::iter(queries)
            .map(|query| self.fetch(query))
            .buffered(self.concurrency())
            .try_collect()
            .await?;

        Ok(batches.into_iter().flatten().collect())
    }

    async fn fetch(&self, query: CatalogQuery) -> PipelineResult<Vec<Candidate>> {
        let timeout = self.config.call_timeout();

        match query {
            CatalogQuery::Similar { artist, track } => {
                let found = bounded(
                    timeout,
                    self.catalog
                        .similar_tracks(&artist, &track, self.config.similar_limit),
                    || {
                        PipelineError::CatalogUnavailable(format!(
                            "similar tracks for {} - {} timed out",
                            artist, track
                        ))
                    },
                )
                .await?;
                debug!(artist = %artist, track = %track, result_count = found.len(), "Similar tracks");
                Ok(found)
            }
            CatalogQuery::Tag(tag) => {
                let result = bounded(
                    timeout,
                    self.catalog.top_tracks_by_tag(&tag, self.config.tag_limit),
                    || PipelineError::CatalogUnavailable(format!("top tracks for {} timed out", tag)),
                )
                .await;

                match result {
                    Ok(found) => {
                        debug!(tag = %tag, result_count = found.len(), "Tag top tracks");
                        Ok(found)
                    }
                    Err(PipelineError::CatalogUnavailable(reason))
                        if self.config.isolate_tag_failures =>
                    {
                        warn!(tag = %tag, reason = %reason, "Skipping tag after catalog failure");
                        Ok(Vec::new())
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    async fn resolve_all(
        &self,
        token: &AccessToken,
        candidates: Vec<Candidate>,
    ) -> PipelineResult<Vec<ResolvedTrack>> {
        let total = candidates.len();
        let timeout = self.config.call_timeout();

        let results: Vec<Option<ResolvedTrack>> = stream::iter(candidates)
            .map(move |candidate| async move {
                bounded(timeout, self.resolver.resolve(token, &candidate), || {
                    PipelineError::StreamingUnavailable(format!(
                        "search for {} - {} timed out",
                        candidate.artist, candidate.name
                    ))
                })
                .await
            })
            .buffered(self.concurrency())
            .try_collect()
            .await?;

        let resolved: Vec<ResolvedTrack> = results.into_iter().flatten().collect();
        debug!(
            candidates = total,
            resolved = resolved.len(),
            "Resolved candidates on Spotify"
        );
        Ok(resolved)
    }
}
