//! Mock Spotify server for testing resolution and playlist creation
//!
//! Provides a [`MockSpotifyServer`] that serves both the accounts service
//! (`/api/token`) and the Web API (`/v1/...`) from one address, matching
//! `SpotifyConfig::with_base_url`.

use serde_json::{json, Value};
use spindj_shared_config::SpotifyConfig;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::fixtures::TrackFixture;

/// Mock Spotify server
///
/// # Example
///
/// ```rust,ignore
/// use spindj_test_utils::{MockSpotifyServer, TrackFixture};
///
/// #[tokio::test]
/// async fn test_resolution() {
///     let server = MockSpotifyServer::start().await;
///     server.mock_token_refresh().await;
///     server.mock_search_track(&TrackFixture::new("Get Lucky", "Daft Punk")).await;
///     server.mock_search_fallback_empty().await;
///
///     let auth = SpotifyAuth::new(&server.config()).unwrap();
/// }
/// ```
pub struct MockSpotifyServer {
    server: MockServer,
    access_token: String,
    refresh_token: String,
}

impl MockSpotifyServer {
    /// Start a new mock server issuing the default tokens
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            access_token: "test-access-token".to_string(),
            refresh_token: "test-refresh-token".to_string(),
        }
    }

    /// Base URL of the server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Access token handed out by [`Self::mock_token_refresh`]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Client configuration pointing at this server, with a refresh token set
    pub fn config(&self) -> SpotifyConfig {
        SpotifyConfig::new("test-client-id", "test-client-secret")
            .with_base_url(&self.server.uri())
            .with_refresh_token(self.refresh_token.clone())
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Mount the refresh-token grant
    pub async fn mock_token_refresh(&self) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": self.access_token,
                "token_type": "Bearer",
                "scope": "playlist-modify-private",
                "expires_in": 3600
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount the authorization-code grant for one code
    pub async fn mock_code_exchange(&self, code: &str) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains(format!("code={}", code)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": self.access_token,
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": self.refresh_token
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a rejected token request
    pub async fn mock_token_failure(&self) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid refresh token"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a search that finds exactly this track
    pub async fn mock_search_track(&self, track: &TrackFixture) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", track.search_query().as_str()))
            .and(query_param("type", "track"))
            .and(header("authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [track.to_spotify_json()], "total": 1}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a search for a free-text query returning these tracks
    pub async fn mock_search_query(&self, query: &str, tracks: &[TrackFixture]) {
        let items: Vec<Value> = tracks.iter().map(TrackFixture::to_spotify_json).collect();
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": items, "total": items.len()}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an empty result for any search no other mock matches
    pub async fn mock_search_fallback_empty(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"items": [], "total": 0}
            })))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Mount a single 401 for the next search, as for a revoked access token
    ///
    /// Takes precedence over every other search mock, then stops matching.
    pub async fn mock_search_rejected_once(&self) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"status": 401, "message": "The access token expired"}
            })))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Mount a failing search
    pub async fn mock_search_error(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"status": status, "message": "Service unavailable"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount recommendations returning these tracks
    pub async fn mock_recommendations(&self, tracks: &[TrackFixture]) {
        let items: Vec<Value> = tracks.iter().map(TrackFixture::to_spotify_json).collect();
        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": items,
                "seeds": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount playlist creation, answering with `playlist_id`
    ///
    /// The requested name is echoed back.
    pub async fn mock_create_playlist(&self, playlist_id: &str) {
        let playlist_id = playlist_id.to_string();

        Mock::given(method("POST"))
            .and(path("/v1/me/playlists"))
            .respond_with(move |req: &Request| {
                let requested: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
                ResponseTemplate::new(201).set_body_json(json!({
                    "id": playlist_id,
                    "name": requested["name"].as_str().unwrap_or_default(),
                    "public": requested["public"].as_bool().unwrap_or(false),
                    "external_urls": {
                        "spotify": format!("https://open.spotify.com/playlist/{}", playlist_id)
                    }
                }))
            })
            .mount(&self.server)
            .await;
    }

    /// Mount track insertion for a playlist
    pub async fn mock_add_tracks(&self, playlist_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/v1/playlists/{}/tracks", playlist_id)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "snapshot_id": "test-snapshot"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount playback start
    pub async fn mock_play(&self) {
        Mock::given(method("PUT"))
            .and(path("/v1/me/player/play"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    /// All requests received so far
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Received requests whose path is `request_path`
    pub async fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.received_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }
}
