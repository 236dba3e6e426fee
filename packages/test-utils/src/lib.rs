//! Shared test utilities for the SpinDJ workspace
//!
//! This crate provides mock implementations of the external services for
//! testing without network dependencies. The mocks are used by the
//! recommender and API test suites.
//!
//! # Mock Services
//!
//! - [`MockLastfmServer`] - Mock Last.fm API for similar-track and tag lookups
//! - [`MockSpotifyServer`] - Mock Spotify accounts service and Web API
//!
//! # Example
//!
//! ```rust,ignore
//! use spindj_test_utils::{MockLastfmServer, TrackFixture};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let lastfm = MockLastfmServer::start().await;
//!     lastfm
//!         .mock_similar_tracks("Daft Punk", "One More Time", &[TrackFixture::new("Digital Love", "Daft Punk")])
//!         .await;
//!
//!     // Use lastfm.config() to build your client
//! }
//! ```

mod fixtures;
mod lastfm;
mod spotify;

pub use fixtures::{tag_tracks, TrackFixture};
pub use lastfm::MockLastfmServer;
pub use spotify::MockSpotifyServer;
