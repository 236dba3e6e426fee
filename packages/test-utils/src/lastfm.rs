//! Mock Last.fm server for testing candidate gathering
//!
//! Provides a [`MockLastfmServer`] that simulates the `track.getsimilar` and
//! `tag.gettoptracks` methods of the Last.fm 2.0 API.

use serde_json::{json, Value};
use spindj_shared_config::LastfmConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::TrackFixture;

const API_PATH: &str = "/2.0/";

/// Mock Last.fm server
///
/// Wraps a [`wiremock::MockServer`]. Every mock requires the configured API
/// key, so a client with the wrong key gets no match (404).
///
/// # Example
///
/// ```rust,ignore
/// use spindj_test_utils::{MockLastfmServer, tag_tracks};
///
/// #[tokio::test]
/// async fn test_tag_lookup() {
///     let server = MockLastfmServer::start().await;
///     server.mock_tag_top_tracks("funk", &tag_tracks("funk", 5)).await;
///
///     let client = LastfmClient::from_config(&server.config()).unwrap();
/// }
/// ```
pub struct MockLastfmServer {
    server: MockServer,
    api_key: String,
}

impl MockLastfmServer {
    /// Start a new mock server with the default API key
    pub async fn start() -> Self {
        Self::start_with_api_key("test-lastfm-key").await
    }

    /// Start a new mock server expecting a custom API key
    pub async fn start_with_api_key(api_key: &str) -> Self {
        Self {
            server: MockServer::start().await,
            api_key: api_key.to_string(),
        }
    }

    /// API endpoint URL, as used for `LASTFM_API_URL`
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), API_PATH)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Client configuration pointing at this server
    pub fn config(&self) -> LastfmConfig {
        LastfmConfig::new(self.api_key.clone()).with_api_url(self.url())
    }

    fn api_call(&self, api_method: &str) -> wiremock::MockBuilder {
        Mock::given(method("GET"))
            .and(path(API_PATH))
            .and(query_param("method", api_method))
            .and(query_param("api_key", self.api_key.as_str()))
            .and(query_param("format", "json"))
    }

    /// Mount `track.getsimilar` for one seed track
    pub async fn mock_similar_tracks(&self, artist: &str, track: &str, similar: &[TrackFixture]) {
        let items: Vec<Value> = similar
            .iter()
            .enumerate()
            .map(|(i, t)| t.to_lastfm_similar_json(1.0 - i as f64 * 0.05))
            .collect();

        self.api_call("track.getsimilar")
            .and(query_param("artist", artist))
            .and(query_param("track", track))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "similartracks": {
                    "track": items,
                    "@attr": {"artist": artist}
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount `tag.gettoptracks` for one tag
    pub async fn mock_tag_top_tracks(&self, tag: &str, tracks: &[TrackFixture]) {
        let items: Vec<Value> = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| t.to_lastfm_tag_json(i + 1))
            .collect();

        self.api_call("tag.gettoptracks")
            .and(query_param("tag", tag))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {
                    "track": items,
                    "@attr": {"tag": tag, "page": "1", "perPage": "5", "totalPages": "1", "total": items.len()}
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount empty answers for every similar-track and tag lookup
    ///
    /// Mounted at low priority, so more specific mocks still win.
    pub async fn mock_everything_empty(&self) {
        self.api_call("track.getsimilar")
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "similartracks": {"track": [], "@attr": {"artist": ""}}
            })))
            .with_priority(10)
            .mount(&self.server)
            .await;

        self.api_call("tag.gettoptracks")
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {"track": [], "@attr": {"tag": ""}}
            })))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Mount a Last.fm error payload for an API method
    pub async fn mock_api_error(&self, api_method: &str, code: i32, message: &str) {
        self.api_call(api_method)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": code,
                "message": message
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an HTTP failure for an API method
    pub async fn mock_server_error(&self, api_method: &str, status: u16) {
        self.api_call(api_method)
            .respond_with(ResponseTemplate::new(status).set_body_string("Service Unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Mount an HTTP failure for a single tag
    pub async fn mock_tag_error(&self, tag: &str, status: u16) {
        self.api_call("tag.gettoptracks")
            .and(query_param("tag", tag))
            .respond_with(ResponseTemplate::new(status).set_body_string("Service Unavailable"))
            .mount(&self.server)
            .await;
    }
}
