//! Last.fm API client for SpinDJ
//!
//! This crate provides a client for the Last.fm API, enabling:
//! - Similar track discovery for a seed track
//! - Top tracks for a tag
//!
//! # Example
//!
//! ```rust,no_run
//! use spindj_lastfm_client::LastfmClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LastfmClient::new("your_api_key")?;
//!
//! // Get tracks similar to a seed
//! let similar = client.get_similar_tracks("Daft Punk", "One More Time", Some(5)).await?;
//! for track in similar {
//!     println!("{} - {} ({:.2})", track.artist, track.name, track.match_score);
//! }
//!
//! // Get the top tracks for a tag
//! let top = client.get_tag_top_tracks("funk", Some(5)).await?;
//! for track in top {
//!     println!("{} - {}", track.artist, track.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `LASTFM_API_KEY`: API key for Last.fm (required)
//! - `LASTFM_API_URL`: endpoint override (optional)

mod client;
mod error;
mod models;

pub use client::{ApiKeyStatus, LastfmClient};
pub use error::{LastfmError, LastfmResult};
pub use models::{SimilarTrack, TagTrack};
