//! Spotify Web API client for SpinDJ
//!
//! This crate provides:
//! - [`SpotifyAuth`]: authorization-code login and a refresh-token backed
//!   access-token cache
//! - [`SpotifyClient`]: track search, recommendations, playlist creation and
//!   playback on behalf of the authorized user
//!
//! # Thread Safety
//!
//! Both types are `Send + Sync`. `SpotifyAuth` guards its token cache with an
//! async mutex so a refresh and the following read happen under one lock
//! acquisition; share it behind an `Arc`.
//!
//! # Example
//!
//! ```rust,no_run
//! use spindj_shared_config::SpotifyConfig;
//! use spindj_spotify_client::{SpotifyAuth, SpotifyClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SpotifyConfig::new("client-id", "client-secret").with_refresh_token("refresh");
//! let auth = SpotifyAuth::new(&config)?;
//! let client = SpotifyClient::new(&config)?;
//!
//! let token = auth.ensure_access_token().await?;
//! let tracks = client
//!     .search_tracks(&token, "track:One More Time artist:Daft Punk", 1)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod error;
mod models;

pub use auth::{SpotifyAuth, TokenGrant, SCOPES};
pub use client::{track_uri, SpotifyClient};
pub use error::{SpotifyError, SpotifyResult};
pub use models::{
    AccessToken, AlbumRef, ArtistRef, ExternalUrls, Playlist, RecommendationSeeds,
    Track,
};
