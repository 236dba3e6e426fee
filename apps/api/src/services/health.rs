//! Health check service for verifying external dependencies
//!
//! Readiness depends on:
//! - Last.fm (API key accepted)
//! - Spotify (an access token can be obtained)

use serde::Serialize;
use std::time::{Duration, Instant};

use spindj_lastfm_client::{ApiKeyStatus, LastfmClient};
use spindj_spotify_client::{SpotifyAuth, SpotifyError};

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy and responding
    Healthy,
    /// Service is unhealthy or unreachable
    Unhealthy,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the service
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: response_time.as_millis() as u64,
            error: None,
        }
    }

    pub fn unhealthy(name: &'static str, error: impl Into<String>, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: response_time.as_millis() as u64,
            error: Some(error.into()),
        }
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Healthy only if every service is healthy
    pub status: ServiceStatus,
    pub services: Vec<ServiceHealth>,
    pub total_time_ms: u64,
    pub version: &'static str,
}

impl HealthCheckResponse {
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services.iter().all(|s| s.status == ServiceStatus::Healthy) {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service for verifying external dependencies
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Check that Last.fm accepts the configured API key
    pub async fn check_lastfm(&self, client: &LastfmClient) -> ServiceHealth {
        let start = Instant::now();
        match client.validate_api_key().await {
            ApiKeyStatus::Valid => ServiceHealth::healthy("lastfm", start.elapsed()),
            ApiKeyStatus::Invalid => {
                ServiceHealth::unhealthy("lastfm", "API key rejected", start.elapsed())
            }
            ApiKeyStatus::Unknown(e) => ServiceHealth::unhealthy("lastfm", e, start.elapsed()),
        }
    }

    /// Check that a Spotify access token can be obtained
    pub async fn check_spotify(&self, auth: &SpotifyAuth) -> ServiceHealth {
        let start = Instant::now();
        match auth.ensure_access_token().await {
            Ok(_) => ServiceHealth::healthy("spotify", start.elapsed()),
            Err(SpotifyError::MissingRefreshToken) => ServiceHealth::unhealthy(
                "spotify",
                "not authorized, visit /login",
                start.elapsed(),
            ),
            Err(e) => ServiceHealth::unhealthy("spotify", e.to_string(), start.elapsed()),
        }
    }

    /// Run all checks concurrently
    pub async fn check_all(&self, lastfm: &LastfmClient, auth: &SpotifyAuth) -> HealthCheckResponse {
        let start = Instant::now();
        let (lastfm, spotify) = tokio::join!(self.check_lastfm(lastfm), self.check_spotify(auth));
        HealthCheckResponse::new(vec![lastfm, spotify], start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_status() {
        let ok = ServiceHealth::healthy("lastfm", Duration::from_millis(12));
        let bad = ServiceHealth::unhealthy("spotify", "down", Duration::from_millis(3));

        assert!(HealthCheckResponse::new(vec![ok.clone()], Duration::ZERO).is_healthy());
        assert!(!HealthCheckResponse::new(vec![ok, bad], Duration::ZERO).is_healthy());
    }

    #[test]
    fn test_serialization() {
        let health = ServiceHealth::unhealthy("spotify", "down", Duration::from_millis(3));
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "down");
    }
}
