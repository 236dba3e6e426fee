//! Spotify Web API configuration types

use crate::{
    get_env_or_default, get_optional_env, get_required_env, parse_env, validate_url, ConfigResult,
};

/// Default Spotify Web API base URL
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Default Spotify accounts service URL
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Default OAuth redirect URI
pub const DEFAULT_SPOTIFY_REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";

/// Spotify application credentials and endpoints
#[derive(Clone)]
pub struct SpotifyConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// OAuth redirect URI registered with the Spotify application
    pub redirect_uri: String,

    /// Long-lived refresh token obtained through `/login` (optional)
    pub refresh_token: Option<String>,

    /// Web API base URL (overridable for testing)
    pub api_url: String,

    /// Accounts service base URL (overridable for testing)
    pub accounts_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SpotifyConfig {
    /// Load Spotify configuration from environment variables
    ///
    /// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required;
    /// `SPOTIFY_REFRESH_TOKEN` may be absent until the operator logs in.
    pub fn from_env() -> ConfigResult<Self> {
        let api_url = get_env_or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL);
        let accounts_url = get_env_or_default("SPOTIFY_ACCOUNTS_URL", DEFAULT_SPOTIFY_ACCOUNTS_URL);
        let redirect_uri = get_env_or_default("SPOTIFY_REDIRECT_URI", DEFAULT_SPOTIFY_REDIRECT_URI);
        validate_url("SPOTIFY_API_URL", &api_url)?;
        validate_url("SPOTIFY_ACCOUNTS_URL", &accounts_url)?;
        validate_url("SPOTIFY_REDIRECT_URI", &redirect_uri)?;

        Ok(Self {
            client_id: get_required_env("SPOTIFY_CLIENT_ID")?,
            client_secret: get_required_env("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri,
            refresh_token: get_optional_env("SPOTIFY_REFRESH_TOKEN"),
            api_url,
            accounts_url,
            timeout_secs: parse_env("SPOTIFY_TIMEOUT", 10)?,
        })
    }

    /// Create a configuration with custom credentials (useful for testing)
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_SPOTIFY_REDIRECT_URI.to_string(),
            refresh_token: None,
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set the refresh token
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Point both the Web API and the accounts service at one base URL
    ///
    /// The Web API is served under `/v1` and the token endpoint under
    /// `/api/token`, mirroring the real hosts.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.api_url = format!("{}/v1", base);
        self.accounts_url = base.to_string();
        self
    }

    /// Get the full URL for a Web API endpoint
    pub fn api_endpoint(&self, path: &str) -> String {
        let base = self.api_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Get the token endpoint URL
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }

    /// Get the authorize endpoint URL
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_url", &self.api_url)
            .field("accounts_url", &self.accounts_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
