//! Spotify passthrough route handlers
//!
//! - `POST /searchTracks` - Free-text track search
//! - `POST /getRecommendations` - Seeded recommendations
//! - `POST /createPlaylist` - Create a private playlist from track IDs
//! - `POST /playTrack` - Start playback on the active device
//!
//! Every handler obtains a fresh access token first, so a missing or revoked
//! refresh token surfaces as 401. A token the Web API rejects is dropped from
//! the cache and the next request refreshes it.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use spindj_spotify_client::{Playlist, RecommendationSeeds, Track};

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 10;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Create Spotify passthrough router
pub fn spotify_router(state: AppState) -> Router {
    Router::new()
        .route("/searchTracks", post(search_tracks))
        .route("/getRecommendations", post(get_recommendations))
        .route("/createPlaylist", post(create_playlist))
        .route("/playTrack", post(play_track))
        .with_state(state)
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct SearchTracksRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    #[serde(flatten)]
    pub seeds: RecommendationSeeds,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Spotify track IDs, added in order
    #[serde(default)]
    pub tracks: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayTrackRequest {
    pub track_id: String,
}

/// A track as shown to API clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrackView {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub url: Option<String>,
    pub preview_url: Option<String>,
    pub display: String,
}

impl TrackView {
    fn from_track(track: Track, position: Option<usize>) -> Self {
        let artists = track.artist_names();
        let line = format!("{} - {}", track.name, artists.join(", "));
        let display = match position {
            Some(n) => format!("{}. {}", n, line),
            None => line,
        };

        Self {
            album: track.album_name().map(str::to_string),
            url: track.spotify_url().map(str::to_string),
            id: track.id,
            name: track.name,
            artists,
            preview_url: track.preview_url,
            display,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub tracks: Vec<TrackView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistResponse {
    pub playlist_id: String,
    pub url: Option<String>,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct PlayTrackResponse {
    pub status: &'static str,
}

/// One-line summary of a newly created playlist
pub fn created_playlist_display(playlist: &Playlist) -> String {
    match playlist.external_urls.spotify.as_deref() {
        Some(url) => format!("Created playlist \"{}\" -> {}", playlist.name, url),
        None => format!("Created playlist \"{}\"", playlist.name),
    }
}

// ========== Handlers ==========

async fn search_tracks(
    State(state): State<AppState>,
    payload: Result<Json<SearchTracksRequest>, JsonRejection>,
) -> ApiResult<Json<TracksResponse>> {
    let Json(req) = payload?;
    let token = state.spotify_auth.ensure_access_token().await?;

    let found = state
        .spotify
        .search_tracks(&token, &req.query, req.limit)
        .await;
    let tracks = state.spotify_auth.check_rejection(&token, found).await?;

    Ok(Json(TracksResponse {
        tracks: tracks
            .into_iter()
            .map(|t| TrackView::from_track(t, None))
            .collect(),
    }))
}

async fn get_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationsRequest>, JsonRejection>,
) -> ApiResult<Json<TracksResponse>> {
    let Json(req) = payload?;
    let token = state.spotify_auth.ensure_access_token().await?;

    let found = state
        .spotify
        .recommendations(&token, &req.seeds, req.limit)
        .await;
    let tracks = state.spotify_auth.check_rejection(&token, found).await?;

    Ok(Json(TracksResponse {
        tracks: tracks
            .into_iter()
            .enumerate()
            .map(|(i, t)| TrackView::from_track(t, Some(i + 1)))
            .collect(),
    }))
}

async fn create_playlist(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlaylistRequest>, JsonRejection>,
) -> ApiResult<Json<CreatePlaylistResponse>> {
    let Json(req) = payload?;

    let playlist = state
        .playlists
        .create_with_tracks(&req.name, &req.description, &req.tracks)
        .await?;

    Ok(Json(CreatePlaylistResponse {
        display: created_playlist_display(&playlist),
        url: playlist.external_urls.spotify,
        playlist_id: playlist.id,
    }))
}

async fn play_track(
    State(state): State<AppState>,
    payload: Result<Json<PlayTrackRequest>, JsonRejection>,
) -> ApiResult<Json<PlayTrackResponse>> {
    let Json(req) = payload?;
    let token = state.spotify_auth.ensure_access_token().await?;

    let played = state.spotify.play(&token, &req.track_id).await;
    state.spotify_auth.check_rejection(&token, played).await?;

    Ok(Json(PlayTrackResponse { status: "playing" }))
}
