//! Spotify login route handlers
//!
//! - `GET /login` - Redirect to the Spotify consent page
//! - `GET /callback` - Exchange the authorization code for tokens
//!
//! The server acts for a single operator. After the first login the refresh
//! token is shown once so it can be stored in `SPOTIFY_REFRESH_TOKEN`.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Create login router
pub fn auth_router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .with_state(state)
}

/// Query parameters Spotify appends to the redirect URI
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// Set instead of `code` when the user denies access
    #[serde(default)]
    pub error: Option<String>,
}

/// Start the authorization-code flow
///
/// A fresh random state replaces any login still in progress.
async fn login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let login_state = Uuid::new_v4().to_string();
    let url = state.spotify_auth.authorize_url(&login_state)?;

    *state.pending_login.lock().await = Some(login_state);
    tracing::info!("Redirecting to Spotify authorization");

    Ok(Redirect::to(&url))
}

/// Finish the authorization-code flow
///
/// # Errors
/// - 400 `INVALID_STATE` if the state does not match the pending login
/// - 401 if Spotify reported an error or rejected the code
async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<String> {
    {
        // Single-use once matched; a stray callback leaves the login pending
        let mut pending = state.pending_login.lock().await;
        let matched = matches!(
            (pending.as_deref(), params.state.as_deref()),
            (Some(expected), Some(received)) if expected == received
        );
        if !matched {
            return Err(ApiError::InvalidState);
        }
        pending.take();
    }

    if let Some(error) = params.error {
        return Err(ApiError::Unauthorized(format!(
            "Spotify authorization denied: {}",
            error
        )));
    }

    let code = params
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::ValidationError("missing authorization code".to_string()))?;

    let grant = state.spotify_auth.exchange_code(&code).await?;

    let body = match grant.refresh_token {
        Some(refresh) => format!(
            "Spotify authorization complete.\n\
             Add this to your .env to skip login on the next start:\n\
             SPOTIFY_REFRESH_TOKEN={}\n",
            refresh
        ),
        None => "Spotify authorization complete.\n".to_string(),
    };
    Ok(body)
}
