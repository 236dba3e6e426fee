//! HTTP route handlers for the SpinDJ API
//!
//! - Spotify login endpoints
//! - Spotify passthrough endpoints
//! - Playlist generation
//! - Health check and status endpoints

pub mod auth;
pub mod health;
pub mod playlist;
pub mod spotify;

pub use auth::auth_router;
pub use health::health_router;
pub use playlist::playlist_router;
pub use spotify::spotify_router;

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// Fallback for requests no route matched
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
