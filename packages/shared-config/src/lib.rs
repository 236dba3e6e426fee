//! Shared configuration types for SpinDJ services
//!
//! This crate provides the configuration consumed by the API server and the
//! client crates, ensuring every component reads the same environment.

mod error;
mod lastfm;
mod pipeline;
mod spotify;

pub use error::{ConfigError, ConfigResult};
pub use lastfm::LastfmConfig;
pub use pipeline::PipelineConfig;
pub use spotify::SpotifyConfig;

use std::env;

/// Common configuration shared between all services
#[derive(Debug, Clone)]
pub struct CommonConfig {
    /// Last.fm catalog configuration
    pub lastfm: LastfmConfig,

    /// Spotify Web API configuration
    pub spotify: SpotifyConfig,

    /// Recommendation pipeline tuning
    pub pipeline: PipelineConfig,

    /// Environment mode (development, staging, production)
    pub environment: Environment,
}

/// Application environment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stage" => Self::Staging,
            _ => Self::Development,
        })
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl CommonConfig {
    /// Load common configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            lastfm: LastfmConfig::from_env()?,
            spotify: SpotifyConfig::from_env()?,
            pipeline: PipelineConfig::from_env()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse()
                .unwrap_or_default(),
        })
    }

    /// Check if a Spotify refresh token was provided up front
    pub fn has_refresh_token(&self) -> bool {
        self.spotify.refresh_token.is_some()
    }
}

/// Helper function to get a required environment variable
pub fn get_required_env(name: &str) -> ConfigResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

/// Helper function to get an optional environment variable with a default
pub fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper function to get an optional environment variable, treating empty as unset
pub fn get_optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Reject URLs without an http(s) scheme
pub fn validate_url(name: &str, url: &str) -> ConfigResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(
            name.to_string(),
            format!("'{}' must start with http:// or https://", url),
        ))
    }
}

/// Helper function to parse an environment variable into a specific type
pub fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "prod".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            "stage".parse::<Environment>().unwrap(),
            Environment::Staging
        );
        assert_eq!(
            "anything".parse::<Environment>().unwrap(),
            Environment::Development
        );
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(format!("{}", Environment::Production), "production");
        assert_eq!(format!("{}", Environment::Staging), "staging");
        assert_eq!(format!("{}", Environment::Development), "development");
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        temp_env::with_var_unset("SPINDJ_TEST_PARSE_UNSET", || {
            assert_eq!(parse_env("SPINDJ_TEST_PARSE_UNSET", 7u32).unwrap(), 7);
        });
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        temp_env::with_var("SPINDJ_TEST_PARSE_BAD", Some("seven"), || {
            let result = parse_env("SPINDJ_TEST_PARSE_BAD", 7u32);
            assert!(matches!(result, Err(ConfigError::InvalidValue(name, _)) if name == "SPINDJ_TEST_PARSE_BAD"));
        });
    }

    #[test]
    fn test_required_env_treats_blank_as_missing() {
        temp_env::with_var("SPINDJ_TEST_REQUIRED", Some("   "), || {
            assert!(matches!(
                get_required_env("SPINDJ_TEST_REQUIRED"),
                Err(ConfigError::MissingEnvVar(_))
            ));
        });
    }

    #[test]
    fn test_common_config_from_env() {
        temp_env::with_vars(
            [
                ("LASTFM_API_KEY", Some("lastfm-key")),
                ("SPOTIFY_CLIENT_ID", Some("client-id")),
                ("SPOTIFY_CLIENT_SECRET", Some("client-secret")),
                ("SPOTIFY_REFRESH_TOKEN", Some("refresh")),
                ("ENVIRONMENT", Some("prod")),
            ],
            || {
                let config = CommonConfig::from_env().unwrap();
                assert_eq!(config.lastfm.api_key, "lastfm-key");
                assert!(config.has_refresh_token());
                assert!(config.environment.is_production());
            },
        );
    }
}
