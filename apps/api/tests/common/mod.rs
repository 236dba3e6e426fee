//! Common test utilities for API integration tests
//!
//! Builds the full router against mock Last.fm and Spotify servers.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use spindj_api::{build_router, AppState, Config};
use spindj_shared_config::{CommonConfig, Environment, PipelineConfig, SpotifyConfig};
use spindj_test_utils::{MockLastfmServer, MockSpotifyServer};

pub struct TestApp {
    pub lastfm: MockLastfmServer,
    pub spotify: MockSpotifyServer,
    pub state: AppState,
}

impl TestApp {
    /// Start with an authorized Spotify account and empty catalog answers
    pub async fn start() -> Self {
        let lastfm = MockLastfmServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        lastfm.mock_everything_empty().await;
        spotify.mock_token_refresh().await;
        spotify.mock_search_fallback_empty().await;

        let spotify_config = spotify.config();
        Self::with_spotify_config(lastfm, spotify, spotify_config)
    }

    /// Start without a refresh token, as before the first `/login`
    pub async fn start_unauthorized() -> Self {
        let lastfm = MockLastfmServer::start().await;
        let spotify = MockSpotifyServer::start().await;
        lastfm.mock_everything_empty().await;

        let mut spotify_config = spotify.config();
        spotify_config.refresh_token = None;
        Self::with_spotify_config(lastfm, spotify, spotify_config)
    }

    fn with_spotify_config(
        lastfm: MockLastfmServer,
        spotify: MockSpotifyServer,
        spotify_config: SpotifyConfig,
    ) -> Self {
        let config = Config {
            common: CommonConfig {
                lastfm: lastfm.config(),
                spotify: spotify_config,
                pipeline: PipelineConfig::default(),
                environment: Environment::Development,
            },
            port: 0,
            cors_allowed_origins: None,
        };
        let state = AppState::from_config(config).unwrap();

        Self {
            lastfm,
            spotify,
            state,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: &impl Serialize) -> Response {
        self.send(json_post_request(uri, body)).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}

/// Helper to make JSON POST request
pub fn json_post_request(uri: &str, body: &impl Serialize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Parse response body as generic JSON Value
pub async fn parse_body_value(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read response body as text
pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
