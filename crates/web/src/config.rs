use std::{env, fmt, time::Duration};

use busradar::BUSRADAR_API_URL;
use public_transport::{aggregator::DEFAULT_PROVIDER_TIMEOUT, points::DeletionMode};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Runtime settings of the web service, read from the environment.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: String,
    pub busradar_url: String,
    pub provider_timeout: Duration,
    pub deletion_mode: DeletionMode,
}

#[derive(Debug)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid value for {}: {}", self.variable, self.message)
    }
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset variables fall back to their defaults, malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address =
            lookup("WEB_BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());
        let busradar_url = lookup("BUSRADAR_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| BUSRADAR_API_URL.to_owned());

        let provider_timeout = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError {
                    variable: "PROVIDER_TIMEOUT_SECS",
                    message: format!("expected a positive number of seconds, got '{}'", secs),
                })?,
            None => DEFAULT_PROVIDER_TIMEOUT,
        };

        let deletion_mode = match lookup("POINT_DELETION_MODE") {
            Some(mode) => mode.parse().map_err(|message| ConfigError {
                variable: "POINT_DELETION_MODE",
                message,
            })?,
            None => DeletionMode::default(),
        };

        Ok(Self {
            bind_address,
            busradar_url,
            provider_timeout,
            deletion_mode,
        })
    }
}
