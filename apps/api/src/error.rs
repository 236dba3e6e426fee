//! Error handling for the SpinDJ API
//!
//! One error type for every handler, mapped onto HTTP status codes and a
//! JSON body via Axum's `IntoResponse`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spindj_recommender::PipelineError;
use spindj_spotify_client::SpotifyError;
use thiserror::Error;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// No usable Spotify credentials; the operator has to log in
    #[error("Spotify authorization required: {0}")]
    Unauthorized(String),

    /// OAuth callback state did not match the login request
    #[error("OAuth state mismatch")]
    InvalidState,

    // ========== Resource Errors ==========
    /// No route matched the request
    #[error("no route matched {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// The pipeline produced no tracks
    #[error("no tracks found for the given description and seed")]
    NoTracksFound,

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Invalid request body format
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    // ========== External Service Errors ==========
    /// Last.fm failed or timed out
    #[error("Last.fm error: {0}")]
    Lastfm(String),

    /// Spotify failed or timed out
    #[error("Spotify error: {0}")]
    Spotify(String),

    /// Rate limited by an upstream service
    #[error("rate limited by upstream service, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            Self::RouteNotFound { .. } | Self::NoTracksFound => StatusCode::NOT_FOUND,

            Self::InvalidState | Self::ValidationError(_) | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }

            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            Self::Lastfm(_) | Self::Spotify(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidState => "INVALID_STATE",
            Self::RouteNotFound { .. } => "NOT_FOUND",
            Self::NoTracksFound => "NO_TRACKS_FOUND",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::Lastfm(_) => "LASTFM_ERROR",
            Self::Spotify(_) => "SPOTIFY_ERROR",
            Self::RateLimited { .. } => "RATE_LIMITED",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::RouteNotFound { method, path } => {
                Some(serde_json::json!({ "path": path, "method": method }))
            }
            _ => None,
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
            details: self.details(),
        };

        if let Self::RateLimited { retry_after } = &self {
            return (
                status,
                [("Retry-After", retry_after.to_string())],
                Json(error_response),
            )
                .into_response();
        }

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidRequest(msg) => Self::ValidationError(msg),
            PipelineError::NoTracksFound => Self::NoTracksFound,
            PipelineError::CatalogUnavailable(msg) => Self::Lastfm(msg),
            PipelineError::AuthUnavailable(msg) => Self::Unauthorized(msg),
            PipelineError::StreamingUnavailable(msg) => Self::Spotify(msg),
        }
    }
}

impl From<SpotifyError> for ApiError {
    fn from(err: SpotifyError) -> Self {
        match err {
            SpotifyError::InvalidInput(msg) => Self::ValidationError(msg),
            SpotifyError::RateLimited { retry_after } => Self::RateLimited {
                retry_after: retry_after.unwrap_or(1),
            },
            e if e.is_auth_error() => Self::Unauthorized(e.to_string()),
            e => Self::Spotify(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use tracing_test::traced_test;

    #[rstest]
    #[case(PipelineError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST)]
    #[case(PipelineError::NoTracksFound, StatusCode::NOT_FOUND)]
    #[case(PipelineError::CatalogUnavailable("x".into()), StatusCode::BAD_GATEWAY)]
    #[case(PipelineError::AuthUnavailable("x".into()), StatusCode::UNAUTHORIZED)]
    #[case(PipelineError::StreamingUnavailable("x".into()), StatusCode::BAD_GATEWAY)]
    fn test_pipeline_status_codes(#[case] err: PipelineError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(err).status_code(), expected);
    }

    #[test]
    fn test_spotify_conversions() {
        assert_eq!(
            ApiError::from(SpotifyError::MissingRefreshToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(SpotifyError::Api {
                status: 404,
                message: "No active device found".into()
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_matches!(
            ApiError::from(SpotifyError::RateLimited { retry_after: Some(30) }),
            ApiError::RateLimited { retry_after: 30 }
        );
        assert_matches!(
            ApiError::from(SpotifyError::InvalidInput("bad".into())),
            ApiError::ValidationError(msg) if msg == "bad"
        );
    }

    #[test]
    fn test_route_not_found_details() {
        let err = ApiError::RouteNotFound {
            method: "GET".into(),
            path: "/nope".into(),
        };
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(
            err.details().unwrap(),
            serde_json::json!({"path": "/nope", "method": "GET"})
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited { retry_after: 7 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["Retry-After"], "7");
    }

    #[test]
    #[traced_test]
    fn test_log_severity() {
        ApiError::Spotify("upstream down".into()).log();
        assert!(logs_contain("Server error occurred"));

        ApiError::Unauthorized("no refresh token".into()).log();
        assert!(logs_contain("Authorization error"));
    }
}
