//! Settings of the departure board, read from the environment (and `.env`)
use std::{fmt, time::Duration};

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "https://api.golemio.cz/v2/pid/departureboards";
/// Kotlářka, platform towards the city centre
pub const DEFAULT_STOP_ID: &str = "U240Z1P";
pub const DEFAULT_MINUTES_AFTER: u32 = 60;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";

#[derive(Clone)]
pub struct BoardConfig {
    pub api_url: String,
    pub access_token: String,
    pub stop_id: String,
    pub minutes_before: u32,
    pub minutes_after: u32,
    /// `None` keeps reqwest's default
    pub http_timeout: Option<Duration>,
}

impl BoardConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        BoardConfig {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: access_token.into(),
            stop_id: DEFAULT_STOP_ID.to_string(),
            minutes_before: 0,
            minutes_after: DEFAULT_MINUTES_AFTER,
            http_timeout: None,
        }
    }

    /// `ACCESS_TOKEN` is required, everything else falls back to the defaults
    pub fn from_env() -> Result<Self> {
        let access_token =
            dotenvy::var("ACCESS_TOKEN").context("ACCESS_TOKEN must be set to query Golemio")?;

        let mut config = BoardConfig::new(access_token);

        if let Ok(api_url) = dotenvy::var("GOLEMIO_API_URL") {
            config.api_url = api_url;
        }
        if let Ok(stop_id) = dotenvy::var("STOP_ID") {
            config.stop_id = stop_id;
        }
        if let Ok(minutes_after) = dotenvy::var("MINUTES_AFTER") {
            config.minutes_after = minutes_after
                .parse()
                .with_context(|| format!("invalid MINUTES_AFTER \"{minutes_after}\""))?;
        }
        if let Ok(timeout) = dotenvy::var("HTTP_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .with_context(|| format!("invalid HTTP_TIMEOUT_SECS \"{timeout}\""))?;
            config.http_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

impl fmt::Debug for BoardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardConfig")
            .field("api_url", &self.api_url)
            .field("access_token", &"<redacted>")
            .field("stop_id", &self.stop_id)
            .field("minutes_before", &self.minutes_before)
            .field("minutes_after", &self.minutes_after)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

pub fn bind_address() -> String {
    dotenvy::var("BIND_ADDRESS").unwrap_or(DEFAULT_BIND_ADDRESS.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let config = BoardConfig::new("super-secret");

        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("U240Z1P"));
    }

    #[test]
    fn test_defaults_query_the_next_hour() {
        let config = BoardConfig::new("token");

        assert_eq!(config.minutes_before, 0);
        assert_eq!(config.minutes_after, 60);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.http_timeout.is_none());
    }
}
