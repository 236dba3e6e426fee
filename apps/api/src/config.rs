//! API server configuration

use std::env;

use anyhow::{Context, Result};
use spindj_shared_config::{CommonConfig, LastfmConfig, PipelineConfig, SpotifyConfig};

/// Default listen port, matching the registered OAuth redirect URI
pub const DEFAULT_PORT: u16 = 3000;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Service credentials and pipeline tuning
    pub common: CommonConfig,

    /// Server port (default: 3000)
    pub port: u16,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `LASTFM_API_KEY`, `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are
    /// required. `SPOTIFY_REFRESH_TOKEN` may be left unset until `/login`
    /// has been completed once.
    pub fn from_env() -> Result<Self> {
        let common = CommonConfig::from_env().context("Failed to load config")?;

        let port = match env::var("PORT") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value '{}'", raw))?,
            _ => DEFAULT_PORT,
        };

        if !common.has_refresh_token() {
            tracing::warn!(
                "SPOTIFY_REFRESH_TOKEN not set. Visit /login once and copy the refresh token into .env"
            );
        }

        Ok(Self {
            common,
            port,
            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }

    pub fn lastfm(&self) -> &LastfmConfig {
        &self.common.lastfm
    }

    pub fn spotify(&self) -> &SpotifyConfig {
        &self.common.spotify
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.common.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_vars() -> Vec<(&'static str, Option<&'static str>)> {
        vec![
            ("LASTFM_API_KEY", Some("lastfm-key")),
            ("SPOTIFY_CLIENT_ID", Some("client-id")),
            ("SPOTIFY_CLIENT_SECRET", Some("client-secret")),
        ]
    }

    #[test]
    fn test_defaults() {
        let mut vars = required_vars();
        vars.extend([("PORT", None), ("CORS_ORIGINS", None), ("ENVIRONMENT", None)]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.port, DEFAULT_PORT);
            assert!(config.cors_allowed_origins.is_none());
            assert!(!config.is_production());
            assert_eq!(config.pipeline().similar_limit, 5);
        });
    }

    #[test]
    fn test_custom_port_and_origins() {
        let mut vars = required_vars();
        vars.extend([
            ("PORT", Some("8888")),
            ("CORS_ORIGINS", Some("http://localhost:5173, ,https://dj.example.com")),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.port, 8888);
            assert_eq!(
                config.cors_allowed_origins.unwrap(),
                vec!["http://localhost:5173", "https://dj.example.com"]
            );
        });
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = required_vars();
        vars.push(("PORT", Some("not-a-port")));

        temp_env::with_vars(vars, || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_missing_lastfm_key() {
        let mut vars = required_vars();
        vars[0] = ("LASTFM_API_KEY", None);

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }
}
