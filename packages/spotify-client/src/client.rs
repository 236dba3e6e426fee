//! Spotify Web API client implementation

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use spindj_shared_config::SpotifyConfig;
use tracing::{debug, instrument, warn};

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{
    AccessToken, AddTracksRequest, ApiErrorResponse, CreatePlaylistRequest, PlayRequest,
    Playlist, RecommendationSeeds, RecommendationsResponse, SearchResponse, SnapshotResponse,
    Track,
};

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Search and recommendations accept at most this many results per call
const MAX_RESULT_LIMIT: u32 = 50;

/// The add-items endpoint accepts at most this many URIs per call
const MAX_TRACKS_PER_ADD: usize = 100;

/// Recommendations accept at most this many seeds in total
const MAX_SEEDS: usize = 5;

const TRACK_URI_PREFIX: &str = "spotify:track:";

/// Convert a track ID into a `spotify:track:` URI; existing URIs pass through
pub fn track_uri(id: &str) -> String {
    if id.starts_with(TRACK_URI_PREFIX) {
        id.to_string()
    } else {
        format!("{}{}", TRACK_URI_PREFIX, id)
    }
}

/// Spotify Web API client
///
/// Stateless apart from the HTTP connection pool; every call takes the
/// access token to use.
#[derive(Clone)]
pub struct SpotifyClient {
    http_client: Client,
    config: SpotifyConfig,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("api_url", &self.config.api_url)
            .finish()
    }
}

impl SpotifyClient {
    /// Create a new client from configuration
    pub fn new(config: &SpotifyConfig) -> SpotifyResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .user_agent("SpinDJ/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    fn validate_limit(limit: u32) -> SpotifyResult<u32> {
        if limit == 0 || limit > MAX_RESULT_LIMIT {
            return Err(SpotifyError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_RESULT_LIMIT
            )));
        }
        Ok(limit)
    }

    async fn send(&self, request: RequestBuilder, token: &AccessToken) -> SpotifyResult<Response> {
        let response = request
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(SpotifyError::from_transport)?;
        Self::check_response(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &AccessToken,
    ) -> SpotifyResult<T> {
        let response = self.send(request, token).await?;
        let text = response.text().await.map_err(SpotifyError::from_transport)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Map non-success statuses onto typed errors
    async fn check_response(response: Response) -> SpotifyResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            warn!(?retry_after, "Spotify API rate limited");
            return Err(SpotifyError::RateLimited { retry_after });
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);

        if status == StatusCode::UNAUTHORIZED {
            return Err(SpotifyError::Unauthorized(message));
        }

        Err(SpotifyError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Search the catalog for tracks
    ///
    /// # Arguments
    /// * `query` - Spotify search query, e.g. `track:One More Time artist:Daft Punk`
    /// * `limit` - Maximum number of results (1-50)
    ///
    /// A response without a `tracks` page yields an empty vector.
    #[instrument(skip(self, token))]
    pub async fn search_tracks(
        &self,
        token: &AccessToken,
        query: &str,
        limit: u32,
    ) -> SpotifyResult<Vec<Track>> {
        if query.trim().is_empty() {
            return Err(SpotifyError::InvalidInput("query cannot be empty".to_string()));
        }
        let limit = Self::validate_limit(limit)?.to_string();

        let request = self.http_client.get(self.config.api_endpoint("search")).query(&[
            ("q", query),
            ("type", "track"),
            ("limit", limit.as_str()),
        ]);
        let response: SearchResponse = self.send_json(request, token).await?;

        let tracks = response.tracks.map(|page| page.items).unwrap_or_default();
        debug!(count = tracks.len(), "Spotify search complete");
        Ok(tracks)
    }

    /// Get recommendations for up to five artist, genre or track seeds
    #[instrument(skip(self, token))]
    pub async fn recommendations(
        &self,
        token: &AccessToken,
        seeds: &RecommendationSeeds,
        limit: u32,
    ) -> SpotifyResult<Vec<Track>> {
        if seeds.is_empty() {
            return Err(SpotifyError::InvalidInput(
                "at least one seed is required".to_string(),
            ));
        }
        if seeds.len() > MAX_SEEDS {
            return Err(SpotifyError::InvalidInput(format!(
                "at most {} seeds are allowed",
                MAX_SEEDS
            )));
        }
        let limit = Self::validate_limit(limit)?.to_string();

        let mut params = vec![("limit", limit)];
        for (key, values) in [
            ("seed_artists", &seeds.seed_artists),
            ("seed_genres", &seeds.seed_genres),
            ("seed_tracks", &seeds.seed_tracks),
        ] {
            if !values.is_empty() {
                params.push((key, values.join(",")));
            }
        }

        let request = self
            .http_client
            .get(self.config.api_endpoint("recommendations"))
            .query(&params);
        let response: RecommendationsResponse = self.send_json(request, token).await?;
        Ok(response.tracks)
    }

    /// Create a playlist owned by the authorized user
    #[instrument(skip(self, token, description))]
    pub async fn create_playlist(
        &self,
        token: &AccessToken,
        name: &str,
        description: &str,
        public: bool,
    ) -> SpotifyResult<Playlist> {
        if name.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "playlist name cannot be empty".to_string(),
            ));
        }

        let request = self
            .http_client
            .post(self.config.api_endpoint("me/playlists"))
            .json(&CreatePlaylistRequest {
                name,
                public,
                description,
            });
        let playlist: Playlist = self.send_json(request, token).await?;
        debug!(playlist_id = %playlist.id, "Created Spotify playlist");
        Ok(playlist)
    }

    /// Append tracks to a playlist, in order
    ///
    /// URIs are sent in batches of 100. Returns the snapshot ID of the last
    /// batch, or `None` if `uris` is empty.
    #[instrument(skip(self, token, uris), fields(count = uris.len()))]
    pub async fn add_tracks_to_playlist(
        &self,
        token: &AccessToken,
        playlist_id: &str,
        uris: &[String],
    ) -> SpotifyResult<Option<String>> {
        if playlist_id.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "playlist id cannot be empty".to_string(),
            ));
        }

        let endpoint = self
            .config
            .api_endpoint(&format!("playlists/{}/tracks", playlist_id));

        let mut snapshot = None;
        for chunk in uris.chunks(MAX_TRACKS_PER_ADD) {
            let request = self
                .http_client
                .post(&endpoint)
                .json(&AddTracksRequest { uris: chunk });
            let response: SnapshotResponse = self.send_json(request, token).await?;
            snapshot = Some(response.snapshot_id);
        }
        Ok(snapshot)
    }

    /// Start playback of a single track on the active device
    #[instrument(skip(self, token))]
    pub async fn play(&self, token: &AccessToken, track_id: &str) -> SpotifyResult<()> {
        if track_id.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "track id cannot be empty".to_string(),
            ));
        }

        let uris = [track_uri(track_id.trim())];
        let request = self
            .http_client
            .put(self.config.api_endpoint("me/player/play"))
            .json(&PlayRequest { uris: &uris });
        self.send(request, token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, SpotifyClient, AccessToken) {
        let server = MockServer::start().await;
        let config = SpotifyConfig::new("id", "secret").with_base_url(&server.uri());
        let client = SpotifyClient::new(&config).unwrap();
        (server, client, AccessToken::new("test-token"))
    }

    #[test]
    fn test_track_uri() {
        assert_eq!(track_uri("abc"), "spotify:track:abc");
        assert_eq!(track_uri("spotify:track:abc"), "spotify:track:abc");
    }

    #[tokio::test]
    async fn test_search_tracks() {
        let (server, client, token) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "track:Get Lucky artist:Daft Punk"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "1"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {
                    "items": [{
                        "id": "69kOkLUCkxIZYexIgSG8rq",
                        "name": "Get Lucky",
                        "artists": [{"id": "4tZwfgrHOc3mvqYlEYSvVi", "name": "Daft Punk"}],
                        "external_urls": {"spotify": "https://open.spotify.com/track/69kOkLUCkxIZYexIgSG8rq"}
                    }]
                }
            })))
            .mount(&server)
            .await;

        let tracks = client
            .search_tracks(&token, "track:Get Lucky artist:Daft Punk", 1)
            .await
            .unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id.as_deref(), Some("69kOkLUCkxIZYexIgSG8rq"));
    }

    #[tokio::test]
    async fn test_search_without_tracks_page() {
        let (server, client, token) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let tracks = client.search_tracks(&token, "track:x", 1).await.unwrap();
        assert!(tracks.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_bad_limit() {
        let (_server, client, token) = setup().await;
        assert!(matches!(
            client.search_tracks(&token, "anything", 0).await,
            Err(SpotifyError::InvalidInput(_))
        ));
        assert!(matches!(
            client.search_tracks(&token, "anything", 51).await,
            Err(SpotifyError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_token() {
        let (server, client, token) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"status": 401, "message": "The access token expired"}
            })))
            .mount(&server)
            .await;

        let err = client.search_tracks(&token, "q", 1).await.unwrap_err();
        assert!(matches!(err, SpotifyError::Unauthorized(ref m) if m == "The access token expired"));
    }

    #[tokio::test]
    async fn test_rate_limited_with_retry_after() {
        let (server, client, token) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = client.search_tracks(&token, "q", 1).await.unwrap_err();
        assert!(matches!(err, SpotifyError::RateLimited { retry_after: Some(7) }));
    }

    #[tokio::test]
    async fn test_server_error() {
        let (server, client, token) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let seeds = RecommendationSeeds {
            seed_genres: vec!["funk".into()],
            ..RecommendationSeeds::default()
        };
        let err = client.recommendations(&token, &seeds, 5).await.unwrap_err();
        assert!(matches!(err, SpotifyError::Api { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[tokio::test]
    async fn test_recommendations_seed_params() {
        let (server, client, token) = setup().await;

        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .and(query_param("seed_genres", "funk,disco"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [{"id": "t1", "name": "Le Freak", "artists": [{"name": "Chic"}]}]
            })))
            .mount(&server)
            .await;

        let seeds = RecommendationSeeds {
            seed_genres: vec!["funk".into(), "disco".into()],
            ..Default::default()
        };
        let tracks = client.recommendations(&token, &seeds, 10).await.unwrap();
        assert_eq!(tracks[0].name, "Le Freak");
    }

    #[tokio::test]
    async fn test_recommendations_require_seeds() {
        let (_server, client, token) = setup().await;
        let err = client
            .recommendations(&token, &RecommendationSeeds::default(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SpotifyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_playlist() {
        let (server, client, token) = setup().await;

        Mock::given(method("POST"))
            .and(path("/v1/me/playlists"))
            .and(body_json(json!({
                "name": "upbeat - Get Lucky",
                "public": false,
                "description": "desc"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "pl1",
                "name": "upbeat - Get Lucky",
                "external_urls": {"spotify": "https://open.spotify.com/playlist/pl1"}
            })))
            .mount(&server)
            .await;

        let playlist = client
            .create_playlist(&token, "upbeat - Get Lucky", "desc", false)
            .await
            .unwrap();
        assert_eq!(playlist.id, "pl1");
    }

    #[tokio::test]
    async fn test_add_tracks_in_batches() {
        let (server, client, token) = setup().await;

        Mock::given(method("POST"))
            .and(path("/v1/playlists/pl1/tracks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"snapshot_id": "snap"})))
            .expect(2)
            .mount(&server)
            .await;

        let uris: Vec<String> = (0..150).map(|i| track_uri(&format!("id{}", i))).collect();
        let snapshot = client
            .add_tracks_to_playlist(&token, "pl1", &uris)
            .await
            .unwrap();
        assert_eq!(snapshot.as_deref(), Some("snap"));
    }

    #[tokio::test]
    async fn test_add_no_tracks_makes_no_request() {
        let (server, client, token) = setup().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let snapshot = client
            .add_tracks_to_playlist(&token, "pl1", &[])
            .await
            .unwrap();
        assert!(snapshot.is_none());
    }

    #[tokio::test]
    async fn test_play() {
        let (server, client, token) = setup().await;

        Mock::given(method("PUT"))
            .and(path("/v1/me/player/play"))
            .and(body_json(json!({"uris": ["spotify:track:abc"]})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client.play(&token, "abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_play_without_active_device() {
        let (server, client, token) = setup().await;

        Mock::given(method("PUT"))
            .and(path("/v1/me/player/play"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"status": 404, "message": "Player command failed: No active device found"}
            })))
            .mount(&server)
            .await;

        let err = client.play(&token, "abc").await.unwrap_err();
        assert!(matches!(err, SpotifyError::Api { status: 404, .. }));
    }
}
