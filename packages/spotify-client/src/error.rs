//! Spotify API error types

use thiserror::Error;

/// Spotify client errors
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// Client ID or secret missing
    #[error("Spotify client credentials are required")]
    MissingCredentials,

    /// No refresh token has been configured or obtained through login
    #[error("no refresh token set, run /login first")]
    MissingRefreshToken,

    /// Invalid input provided to API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse Spotify response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The accounts service rejected a token request
    #[error("Spotify token request failed: {error}{}", .description.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default())]
    TokenRequest {
        error: String,
        description: Option<String>,
    },

    /// Access token rejected by the Web API
    #[error("Spotify rejected the access token: {0}")]
    Unauthorized(String),

    /// Rate limited by Spotify
    #[error("Rate limited by Spotify API")]
    RateLimited { retry_after: Option<u64> },

    /// Spotify Web API returned an error
    #[error("Spotify API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Request timeout
    #[error("Request to Spotify timed out")]
    Timeout,
}

impl SpotifyError {
    /// Check if this error means the user has to (re-)authenticate
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            SpotifyError::MissingCredentials
                | SpotifyError::MissingRefreshToken
                | SpotifyError::TokenRequest { .. }
                | SpotifyError::Unauthorized(_)
        )
    }

    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpotifyError::Timeout
        } else {
            SpotifyError::Http(e)
        }
    }
}

/// Result type for Spotify operations
pub type SpotifyResult<T> = Result<T, SpotifyError>;
