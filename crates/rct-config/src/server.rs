//! HTTP server configuration.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Bearer tokens accepted by the API. Empty means every protected route
    /// answers 401.
    #[serde(default)]
    pub api_tokens: Vec<String>,

    /// Fixed UTC offset used for "today" and chart labels. Falls back to the
    /// system local zone when unset.
    #[serde(default)]
    pub time_zone_offset_minutes: Option<i32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            api_tokens: Vec::new(),
            time_zone_offset_minutes: None,
        }
    }
}

impl ServerConfig {
    /// Whether at least one API token is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_tokens.iter().any(|t| !t.is_empty())
    }

    /// Resolve the configured fixed offset, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the offset is outside ±24h.
    pub fn fixed_offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        let Some(minutes) = self.time_zone_offset_minutes else {
            return Ok(None);
        };
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "server.time_zone_offset_minutes".into(),
                reason: format!("{minutes} is not a valid UTC offset"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_correct() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "127.0.0.1:8000");
        assert!(!config.is_configured());
        assert_eq!(config.fixed_offset().unwrap(), None);
    }

    #[test]
    fn offset_is_validated() {
        let config = ServerConfig {
            time_zone_offset_minutes: Some(90),
            ..ServerConfig::default()
        };
        assert_eq!(
            config.fixed_offset().unwrap(),
            FixedOffset::east_opt(5400)
        );

        let bad = ServerConfig {
            time_zone_offset_minutes: Some(24 * 60 + 1),
            ..ServerConfig::default()
        };
        assert!(bad.fixed_offset().is_err());
    }
}
