//! Recommendation pipeline tuning

use std::time::Duration;

use crate::{parse_env, ConfigError, ConfigResult};

/// Pipeline limits, concurrency and failure policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of similar tracks requested for the seed
    pub similar_limit: u32,

    /// Number of top tracks requested per tag
    pub tag_limit: u32,

    /// Maximum in-flight identity resolutions
    pub resolve_concurrency: usize,

    /// Upper bound for any single remote call, in seconds
    pub call_timeout_secs: u64,

    /// When set, a failed tag fetch contributes no candidates instead of
    /// failing the build
    pub isolate_tag_failures: bool,
}

impl PipelineConfig {
    /// Load pipeline configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self {
            similar_limit: parse_env("PIPELINE_SIMILAR_LIMIT", 5)?,
            tag_limit: parse_env("PIPELINE_TAG_LIMIT", 5)?,
            resolve_concurrency: parse_env("PIPELINE_RESOLVE_CONCURRENCY", 4)?,
            call_timeout_secs: parse_env("PIPELINE_CALL_TIMEOUT", 5)?,
            isolate_tag_failures: parse_env("PIPELINE_ISOLATE_TAG_FAILURES", false)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.resolve_concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "PIPELINE_RESOLVE_CONCURRENCY".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "PIPELINE_CALL_TIMEOUT".to_string(),
                "must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-call timeout as a `Duration`
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similar_limit: 5,
            tag_limit: 5,
            resolve_concurrency: 4,
            call_timeout_secs: 5,
            isolate_tag_failures: false,
        }
    }
}
