//! Playlist generation route
//!
//! - `POST /lastfmBuildPlaylist` - Build a playlist from a mood description
//!   and a seed track, then publish it to the operator's Spotify account

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::routes::spotify::created_playlist_display;
use crate::services::PublishedPlaylist;
use crate::state::AppState;

/// Create playlist generation router
pub fn playlist_router(state: AppState) -> Router {
    Router::new()
        .route("/lastfmBuildPlaylist", post(build_playlist))
        .with_state(state)
}

/// Missing fields deserialize as empty and are rejected by the pipeline
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlaylistRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub seed_artist: String,
    #[serde(default)]
    pub seed_track: String,
}

#[derive(Debug, Serialize)]
pub struct SeedView {
    pub artist: String,
    pub track: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistView {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedTrackView {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub url: String,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct BuildPlaylistResponse {
    pub description: String,
    pub seed: SeedView,
    pub playlist: PlaylistView,
    pub tracks: Vec<GeneratedTrackView>,
    pub display: String,
}

impl BuildPlaylistResponse {
    fn new(request: BuildPlaylistRequest, published: PublishedPlaylist) -> Self {
        let PublishedPlaylist { playlist, tracks } = published;

        let tracks = tracks
            .into_iter()
            .enumerate()
            .map(|(i, t)| GeneratedTrackView {
                display: format!("{}. {} - {}", i + 1, t.name, t.artist),
                id: t.id,
                name: t.name,
                artist: t.artist,
                url: t.url,
            })
            .collect();

        Self {
            description: request.description,
            seed: SeedView {
                artist: request.seed_artist,
                track: request.seed_track,
            },
            display: created_playlist_display(&playlist),
            playlist: PlaylistView {
                id: playlist.id,
                name: playlist.name,
                url: playlist.external_urls.spotify,
            },
            tracks,
        }
    }
}

async fn build_playlist(
    State(state): State<AppState>,
    payload: Result<Json<BuildPlaylistRequest>, JsonRejection>,
) -> ApiResult<Json<BuildPlaylistResponse>> {
    let Json(req) = payload?;

    let published = state
        .playlists
        .build_from_description(&req.description, &req.seed_artist, &req.seed_track)
        .await?;

    Ok(Json(BuildPlaylistResponse::new(req, published)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindj_recommender::ResolvedTrack;
    use spindj_spotify_client::{ExternalUrls, Playlist};

    #[test]
    fn test_request_field_names() {
        let req: BuildPlaylistRequest = serde_json::from_str(
            r#"{"description": "upbeat", "seedArtist": "Daft Punk", "seedTrack": "One More Time"}"#,
        )
        .unwrap();
        assert_eq!(req.seed_artist, "Daft Punk");
        assert_eq!(req.seed_track, "One More Time");

        let req: BuildPlaylistRequest = serde_json::from_str("{}").unwrap();
        assert!(req.description.is_empty());
    }

    #[test]
    fn test_response_numbering() {
        let request = BuildPlaylistRequest {
            description: "upbeat".into(),
            seed_artist: "Daft Punk".into(),
            seed_track: "One More Time".into(),
        };
        let published = PublishedPlaylist {
            playlist: Playlist {
                id: "pl1".into(),
                name: "upbeat - One More Time".into(),
                external_urls: ExternalUrls { spotify: None },
            },
            tracks: vec![
                ResolvedTrack {
                    id: "a".into(),
                    name: "Around the World".into(),
                    artist: "Daft Punk".into(),
                    url: "https://open.spotify.com/track/a".into(),
                },
                ResolvedTrack {
                    id: "b".into(),
                    name: "Music Sounds Better with You".into(),
                    artist: "Stardust".into(),
                    url: "https://open.spotify.com/track/b".into(),
                },
            ],
        };

        let response = BuildPlaylistResponse::new(request, published);
        assert_eq!(response.tracks[0].display, "1. Around the World - Daft Punk");
        assert_eq!(response.tracks[1].display, "2. Music Sounds Better with You - Stardust");
        assert_eq!(response.display, "Created playlist \"upbeat - One More Time\"");
        assert_eq!(response.seed.artist, "Daft Punk");
    }
}
