//! Last.fm API client implementation

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use spindj_shared_config::LastfmConfig;
use tracing::{debug, instrument, warn};

use crate::error::{LastfmError, LastfmResult};
use crate::models::{
    ErrorResponse, SimilarTrack, SimilarTracksResponse, TagTopTracksResponse, TagTrack,
};

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default number of tracks to return
const DEFAULT_TRACK_LIMIT: u32 = 5;

/// Maximum artist, track or tag length
const MAX_QUERY_LENGTH: usize = 256;

/// Maximum error body kept in `LastfmError::Status`
const MAX_ERROR_BODY_SIZE: usize = 500;

/// Last.fm error code for an unknown track/artist/tag
const ERROR_NOT_FOUND: i32 = 6;

/// Last.fm error code for an invalid API key
const ERROR_INVALID_API_KEY: i32 = 10;

/// Last.fm error code for rate limiting
const ERROR_RATE_LIMITED: i32 = 29;

/// Last.fm API client
#[derive(Clone)]
pub struct LastfmClient {
    http_client: Client,
    api_key: String,
    api_url: String,
}

/// API key validation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyStatus {
    /// API key is valid
    Valid,
    /// API key is invalid
    Invalid,
    /// Could not determine validity (network error, etc.)
    Unknown(String),
}

impl fmt::Debug for LastfmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastfmClient")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl LastfmClient {
    /// Create a new Last.fm client with the given API key and default settings
    ///
    /// # Errors
    /// Returns `LastfmError::MissingApiKey` if the API key is empty
    pub fn new(api_key: impl Into<String>) -> LastfmResult<Self> {
        Self::from_config(&LastfmConfig::new(api_key))
    }

    /// Create a Last.fm client from configuration
    ///
    /// # Errors
    /// Returns `LastfmError::MissingApiKey` if the API key is empty
    pub fn from_config(config: &LastfmConfig) -> LastfmResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LastfmError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("SpinDJ/1.0")
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    /// Validate a free-text query parameter (artist, track or tag)
    fn validate_param<'a>(field: &str, value: &'a str) -> LastfmResult<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LastfmError::InvalidInput(format!("{} cannot be empty", field)));
        }
        if trimmed.len() > MAX_QUERY_LENGTH {
            return Err(LastfmError::InvalidInput(format!(
                "{} too long (max {} characters)",
                field, MAX_QUERY_LENGTH
            )));
        }
        Ok(trimmed)
    }

    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body.to_string();
        }
        let cut = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);
        format!("{}... (truncated)", &body[..cut])
    }

    /// Make an API request and handle common error cases
    ///
    /// Returns the parsed body on success. Last.fm error payloads are turned
    /// into typed errors whatever the HTTP status.
    async fn make_request<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
        subject: &str,
    ) -> LastfmResult<T> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LastfmError::Timeout
                } else {
                    LastfmError::Http(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Last.fm API rate limited");
            return Err(LastfmError::RateLimited);
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LastfmError::Timeout
            } else {
                LastfmError::Http(e)
            }
        })?;

        if let Some(error) = Self::parse_api_error(&text, subject) {
            return Err(error);
        }

        if !status.is_success() {
            return Err(LastfmError::Status {
                status: status.as_u16(),
                body: Self::truncate_body(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Parse response text and handle API errors
    fn parse_api_error(text: &str, subject: &str) -> Option<LastfmError> {
        let error = serde_json::from_str::<ErrorResponse>(text).ok()?;
        Some(match error.error {
            ERROR_NOT_FOUND => LastfmError::NotFound(subject.to_string()),
            ERROR_RATE_LIMITED => LastfmError::RateLimited,
            code => LastfmError::Api {
                code,
                message: error.message,
            },
        })
    }

    /// Get tracks similar to a seed track
    ///
    /// # Arguments
    /// * `artist_name` - Artist of the seed track
    /// * `track_name` - Title of the seed track
    /// * `limit` - Maximum number of tracks to return (default: 5)
    ///
    /// A response without a `similartracks.track` list yields an empty vector.
    ///
    /// # Errors
    /// - `LastfmError::InvalidInput` - If the artist or track name is empty or too long
    /// - `LastfmError::NotFound` - If Last.fm does not know the seed track
    /// - `LastfmError::Api` / `LastfmError::Status` - If Last.fm returns an error
    /// - `LastfmError::Http` / `LastfmError::Timeout` - If the HTTP request fails
    #[instrument(skip(self))]
    pub async fn get_similar_tracks(
        &self,
        artist_name: &str,
        track_name: &str,
        limit: Option<u32>,
    ) -> LastfmResult<Vec<SimilarTrack>> {
        let artist_name = Self::validate_param("artist name", artist_name)?;
        let track_name = Self::validate_param("track name", track_name)?;
        let limit_str = limit.unwrap_or(DEFAULT_TRACK_LIMIT).to_string();

        debug!(artist = %artist_name, track = %track_name, limit = %limit_str, "Fetching similar tracks from Last.fm");

        let subject = format!("{} - {}", artist_name, track_name);
        let response: SimilarTracksResponse = self
            .make_request(
                &[
                    ("method", "track.getsimilar"),
                    ("artist", artist_name),
                    ("track", track_name),
                    ("limit", &limit_str),
                ],
                &subject,
            )
            .await?;

        let tracks: Vec<SimilarTrack> = response
            .similartracks
            .map(|wrapper| wrapper.track.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(
            artist = %artist_name,
            track = %track_name,
            result_count = tracks.len(),
            "Found similar tracks"
        );

        Ok(tracks)
    }

    /// Get the top tracks for a tag
    ///
    /// # Arguments
    /// * `tag` - Tag name, e.g. "funk"
    /// * `limit` - Maximum number of tracks to return (default: 5)
    ///
    /// # Errors
    /// Same as [`LastfmClient::get_similar_tracks`].
    #[instrument(skip(self))]
    pub async fn get_tag_top_tracks(
        &self,
        tag: &str,
        limit: Option<u32>,
    ) -> LastfmResult<Vec<TagTrack>> {
        let tag = Self::validate_param("tag", tag)?;
        let limit_str = limit.unwrap_or(DEFAULT_TRACK_LIMIT).to_string();

        debug!(tag = %tag, limit = %limit_str, "Fetching tag top tracks from Last.fm");

        let response: TagTopTracksResponse = self
            .make_request(
                &[
                    ("method", "tag.gettoptracks"),
                    ("tag", tag),
                    ("limit", &limit_str),
                ],
                tag,
            )
            .await?;

        let tracks: Vec<TagTrack> = response
            .tracks
            .map(|wrapper| wrapper.track.into_iter().map(Into::into).collect())
            .unwrap_or_default();

        debug!(tag = %tag, result_count = tracks.len(), "Found tag top tracks");

        Ok(tracks)
    }

    /// Check if the API key is valid by making a simple request
    ///
    /// Returns `ApiKeyStatus` indicating whether the key is valid, invalid,
    /// or if the check could not be completed due to network issues.
    pub async fn validate_api_key(&self) -> ApiKeyStatus {
        match self.get_tag_top_tracks("rock", Some(1)).await {
            Ok(_) => ApiKeyStatus::Valid,
            Err(LastfmError::Api {
                code: ERROR_INVALID_API_KEY,
                ..
            }) => ApiKeyStatus::Invalid,
            Err(e) => ApiKeyStatus::Unknown(e.to_string()),
        }
    }
}
