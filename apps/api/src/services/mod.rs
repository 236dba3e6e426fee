//! Business logic services for SpinDJ
//!
//! - Playlist generation and publishing
//! - Dependency health checks

pub mod health;
pub mod playlist;

pub use health::HealthService;
pub use playlist::{PlaylistService, PublishedPlaylist};
