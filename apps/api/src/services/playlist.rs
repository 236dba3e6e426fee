//! Playlist service: runs the recommender and publishes the result to Spotify

use std::sync::Arc;

use serde::Serialize;
use spindj_recommender::{PlaylistAssembler, ResolvedTrack};
use spindj_spotify_client::{track_uri, Playlist, SpotifyAuth, SpotifyClient};
use tracing::{info, instrument};

use crate::error::ApiResult;

/// Playlist plus the tracks that were added to it
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPlaylist {
    pub playlist: Playlist,
    pub tracks: Vec<ResolvedTrack>,
}

/// Name of a playlist generated from a description and seed track
pub fn generated_playlist_name(description: &str, seed_track: &str) -> String {
    format!("{} - {}", description, seed_track)
}

/// Description of a playlist generated from a description and seed
pub fn generated_playlist_description(
    description: &str,
    seed_artist: &str,
    seed_track: &str,
) -> String {
    format!(
        "Auto-generated from Last.fm recs: \"{}\" with seed {} - {}",
        description, seed_artist, seed_track
    )
}

/// Creates private playlists for the authorized user
#[derive(Clone)]
pub struct PlaylistService {
    assembler: PlaylistAssembler,
    spotify: Arc<SpotifyClient>,
    auth: Arc<SpotifyAuth>,
}

impl PlaylistService {
    pub fn new(
        assembler: PlaylistAssembler,
        spotify: Arc<SpotifyClient>,
        auth: Arc<SpotifyAuth>,
    ) -> Self {
        Self {
            assembler,
            spotify,
            auth,
        }
    }

    /// Create a private playlist and add the given track IDs in order
    #[instrument(skip(self, description, track_ids), fields(track_count = track_ids.len()))]
    pub async fn create_with_tracks(
        &self,
        name: &str,
        description: &str,
        track_ids: &[String],
    ) -> ApiResult<Playlist> {
        let token = self.auth.ensure_access_token().await?;
        let created = self
            .spotify
            .create_playlist(&token, name, description, false)
            .await;
        let playlist = self.auth.check_rejection(&token, created).await?;

        let uris: Vec<String> = track_ids.iter().map(|id| track_uri(id)).collect();
        if !uris.is_empty() {
            let added = self
                .spotify
                .add_tracks_to_playlist(&token, &playlist.id, &uris)
                .await;
            self.auth.check_rejection(&token, added).await?;
        }

        Ok(playlist)
    }

    /// Build a playlist from a mood description and a seed track, then
    /// publish it
    ///
    /// Nothing is created on Spotify if the pipeline fails.
    #[instrument(skip(self))]
    pub async fn build_from_description(
        &self,
        description: &str,
        seed_artist: &str,
        seed_track: &str,
    ) -> ApiResult<PublishedPlaylist> {
        let tracks = self
            .assembler
            .build_playlist(description, seed_artist, seed_track)
            .await?;

        let description = description.trim();
        let seed_artist = seed_artist.trim();
        let seed_track = seed_track.trim();

        let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        let playlist = self
            .create_with_tracks(
                &generated_playlist_name(description, seed_track),
                &generated_playlist_description(description, seed_artist, seed_track),
                &ids,
            )
            .await?;

        info!(
            playlist_id = %playlist.id,
            track_count = tracks.len(),
            "Published generated playlist"
        );

        Ok(PublishedPlaylist { playlist, tracks })
    }
}
