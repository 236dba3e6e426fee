//! Pipeline error types

use thiserror::Error;

/// Errors surfaced by [`crate::PlaylistAssembler::build_playlist`]
///
/// A candidate that cannot be found on Spotify is not an error; it is
/// dropped from the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Missing or empty input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Nothing survived resolution
    #[error("No tracks found for the given description and seed")]
    NoTracksFound,

    /// Last.fm failed or timed out
    #[error("Last.fm unavailable: {0}")]
    CatalogUnavailable(String),

    /// No usable Spotify access token
    #[error("Spotify authorization unavailable: {0}")]
    AuthUnavailable(String),

    /// Spotify search failed or timed out
    #[error("Spotify unavailable: {0}")]
    StreamingUnavailable(String),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
