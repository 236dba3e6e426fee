//! Spotify OAuth: authorization-code login and access-token refresh

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use spindj_shared_config::SpotifyConfig;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{SpotifyError, SpotifyResult};
use crate::models::{AccessToken, AuthErrorResponse, TokenResponse};

/// Scopes requested at login
pub const SCOPES: &[&str] = &[
    "user-read-playback-state",
    "user-modify-playback-state",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-read-recently-played",
];

/// A cached token is refreshed when it expires within this window
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Tokens obtained from the accounts service
#[derive(Clone)]
pub struct TokenGrant {
    pub access_token: AccessToken,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &self.access_token)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

struct CachedToken {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - chrono::Duration::seconds(EXPIRY_MARGIN_SECS) > now
    }
}

#[derive(Default)]
struct TokenCache {
    access: Option<CachedToken>,
    refresh_token: Option<String>,
}

/// Spotify accounts-service client holding the single-user token cache
pub struct SpotifyAuth {
    http_client: Client,
    config: SpotifyConfig,
    cache: Mutex<TokenCache>,
}

impl fmt::Debug for SpotifyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyAuth")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SpotifyAuth {
    /// Create the auth client, seeding the cache with the configured refresh token
    ///
    /// # Errors
    /// Returns `SpotifyError::MissingCredentials` if the client ID or secret is empty
    pub fn new(config: &SpotifyConfig) -> SpotifyResult<Self> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(SpotifyError::MissingCredentials);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("SpinDJ/1.0")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
            cache: Mutex::new(TokenCache {
                access: None,
                refresh_token: config.refresh_token.clone(),
            }),
        })
    }

    /// Build the URL the user is redirected to for consent
    pub fn authorize_url(&self, state: &str) -> SpotifyResult<String> {
        let scope = SCOPES.join(" ");
        let url = Url::parse_with_params(
            &self.config.authorize_url(),
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("scope", scope.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| SpotifyError::InvalidInput(format!("invalid accounts URL: {}", e)))?;
        Ok(url.into())
    }

    /// Check whether a refresh token is available
    pub async fn has_refresh_token(&self) -> bool {
        self.cache.lock().await.refresh_token.is_some()
    }

    /// Exchange an authorization code for tokens and cache them
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> SpotifyResult<TokenGrant> {
        if code.trim().is_empty() {
            return Err(SpotifyError::InvalidInput(
                "authorization code cannot be empty".to_string(),
            ));
        }

        let grant = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;

        let mut cache = self.cache.lock().await;
        cache.access = Some(CachedToken {
            token: grant.access_token.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(grant.expires_in),
        });
        if let Some(refresh) = &grant.refresh_token {
            cache.refresh_token = Some(refresh.clone());
        }

        info!("Spotify authorization completed");
        Ok(grant)
    }

    /// Return a usable access token, refreshing it first if needed
    ///
    /// The cache lock is held across the refresh so concurrent callers wait
    /// for one refresh and then read its result.
    ///
    /// # Errors
    /// - `SpotifyError::MissingRefreshToken` - no refresh token configured or obtained
    /// - `SpotifyError::TokenRequest` - the accounts service rejected the refresh
    /// - `SpotifyError::Http` / `SpotifyError::Timeout` - transport failure
    #[instrument(skip(self))]
    pub async fn ensure_access_token(&self) -> SpotifyResult<AccessToken> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = &cache.access {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.token.clone());
            }
        }

        let refresh_token = cache
            .refresh_token
            .clone()
            .ok_or(SpotifyError::MissingRefreshToken)?;

        debug!("Refreshing Spotify access token");
        let grant = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .await?;

        // Spotify may rotate the refresh token
        if let Some(rotated) = grant.refresh_token {
            cache.refresh_token = Some(rotated);
        }
        cache.access = Some(CachedToken {
            token: grant.access_token.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(grant.expires_in),
        });

        Ok(grant.access_token)
    }

    /// Drop the cached access token if it is still `rejected`
    ///
    /// Called after the Web API answered 401 with `rejected`; the next
    /// [`Self::ensure_access_token`] then performs a refresh. A token cached
    /// by a concurrent refresh in the meantime is left alone.
    pub async fn invalidate(&self, rejected: &AccessToken) {
        let mut cache = self.cache.lock().await;
        if cache.access.as_ref().is_some_and(|c| &c.token == rejected) {
            debug!("Dropping access token rejected by Spotify");
            cache.access = None;
        }
    }

    /// Pass `result` through, invalidating `token` if Spotify rejected it
    pub async fn check_rejection<T>(
        &self,
        token: &AccessToken,
        result: SpotifyResult<T>,
    ) -> SpotifyResult<T> {
        if let Err(SpotifyError::Unauthorized(_)) = &result {
            self.invalidate(token).await;
        }
        result
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> SpotifyResult<TokenGrant> {
        let response = self
            .http_client
            .post(self.config.token_url())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await
            .map_err(SpotifyError::from_transport)?;

        let response = Self::check_token_response(response).await?;
        let body: TokenResponse = serde_json::from_str(
            &response.text().await.map_err(SpotifyError::from_transport)?,
        )?;

        Ok(TokenGrant {
            access_token: AccessToken::new(body.access_token),
            refresh_token: body.refresh_token,
            expires_in: body.expires_in,
        })
    }

    async fn check_token_response(response: Response) -> SpotifyResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = match serde_json::from_str::<AuthErrorResponse>(&text) {
            Ok(body) => SpotifyError::TokenRequest {
                error: body.error,
                description: body.error_description,
            },
            Err(_) => SpotifyError::TokenRequest {
                error: format!("HTTP {}", status.as_u16()),
                description: None,
            },
        };
        warn!(status = status.as_u16(), error = %err, "Spotify token request rejected");
        Err(err)
    }
}
