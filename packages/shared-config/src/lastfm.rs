//! Last.fm catalog configuration types

use crate::{get_env_or_default, get_required_env, parse_env, validate_url, ConfigResult};

/// Default Last.fm API endpoint
pub const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Last.fm API configuration
#[derive(Clone)]
pub struct LastfmConfig {
    /// Last.fm API key
    pub api_key: String,

    /// API endpoint (overridable for testing)
    pub api_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LastfmConfig {
    /// Load Last.fm configuration from environment variables
    ///
    /// `LASTFM_API_KEY` is required.
    pub fn from_env() -> ConfigResult<Self> {
        let api_url = get_env_or_default("LASTFM_API_URL", DEFAULT_LASTFM_API_URL);
        validate_url("LASTFM_API_URL", &api_url)?;

        Ok(Self {
            api_key: get_required_env("LASTFM_API_KEY")?,
            api_url,
            timeout_secs: parse_env("LASTFM_TIMEOUT", 10)?,
        })
    }

    /// Create a configuration with a custom API key (useful for testing)
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_LASTFM_API_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Point the configuration at a different endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl std::fmt::Debug for LastfmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastfmConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn test_new_config() {
        let config = LastfmConfig::new("key");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_url, DEFAULT_LASTFM_API_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = LastfmConfig::new("super-secret");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super-secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_env_requires_api_key() {
        temp_env::with_var_unset("LASTFM_API_KEY", || {
            assert!(matches!(
                LastfmConfig::from_env(),
                Err(ConfigError::MissingEnvVar(name)) if name == "LASTFM_API_KEY"
            ));
        });
    }

    #[test]
    fn test_from_env_rejects_bad_url() {
        temp_env::with_vars(
            [
                ("LASTFM_API_KEY", Some("key")),
                ("LASTFM_API_URL", Some("ws.audioscrobbler.com")),
            ],
            || {
                assert!(matches!(
                    LastfmConfig::from_env(),
                    Err(ConfigError::InvalidUrl(_, _))
                ));
            },
        );
    }
}
