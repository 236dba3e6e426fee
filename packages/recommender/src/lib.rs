//! Playlist assembly pipeline for SpinDJ
//!
//! Turns a free-text mood description plus a seed track into an ordered list
//! of Spotify tracks:
//!
//! 1. [`map_description_to_tags`] maps the description onto Last.fm tags
//! 2. a [`CatalogSource`] supplies tracks similar to the seed and the top
//!    tracks of every tag
//! 3. [`dedupe`] drops repeated (artist, title) pairs, ignoring case
//! 4. an [`IdentityResolver`] looks every remaining candidate up on Spotify
//!
//! [`PlaylistAssembler`] runs the whole pipeline. Collaborators are injected
//! as trait objects, so tests can swap in fakes and the API can share one
//! set of clients across requests.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use spindj_lastfm_client::LastfmClient;
//! use spindj_recommender::PlaylistAssembler;
//! use spindj_shared_config::{PipelineConfig, SpotifyConfig};
//! use spindj_spotify_client::{SpotifyAuth, SpotifyClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spotify = SpotifyConfig::new("id", "secret").with_refresh_token("refresh");
//! let assembler = PlaylistAssembler::new(
//!     Arc::new(LastfmClient::new("lastfm-key")?),
//!     Arc::new(SpotifyClient::new(&spotify)?),
//!     Arc::new(SpotifyAuth::new(&spotify)?),
//!     PipelineConfig::default(),
//! );
//!
//! let tracks = assembler
//!     .build_playlist("upbeat workout", "Daft Punk", "One More Time")
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod assembler;
mod catalog;
mod dedupe;
mod error;
mod models;
mod resolver;
mod tags;

pub use assembler::PlaylistAssembler;
pub use catalog::CatalogSource;
pub use dedupe::dedupe;
pub use error::{PipelineError, PipelineResult};
pub use models::{Candidate, ResolvedTrack, TagSet};
pub use resolver::{IdentityResolver, TokenProvider, TrackSearch};
pub use tags::{map_description_to_tags, DEFAULT_TAG, KEYWORD_TAGS};
