//! # Runtime Configuration
//!
//! Application configuration from environment variables.
//!
//! | Variable                      | Default                   | Meaning                                   |
//! |-------------------------------|---------------------------|-------------------------------------------|
//! | `DASHBOARD_API_URL`           | `http://127.0.0.1:3001`   | Backend base URL                          |
//! | `DASHBOARD_API_TOKEN`         | unset                     | Static token, skips the init-data exchange|
//! | `DASHBOARD_INIT_DATA`         | unset                     | Telegram init data for session startup    |
//! | `DASHBOARD_POLL_SECS`         | `30`                      | Real-time poll interval in seconds        |
//! | `DASHBOARD_FULL_HEALTH_CHECK` | `0`                       | Block startup on a backend health probe   |
//! | `DASHBOARD_ERROR_DSN`         | unset                     | Error reporting endpoint (logged only)    |
//! | `DASHBOARD_DEMO`              | `0`                       | Run against the in-process mock backend   |
//! | `DASHBOARD_STATE_FILE`        | `./dashboard-state.json`  | Persisted preferences file                |

use crate::app::state::DEFAULT_POLL_INTERVAL;
use crate::services::api::client::DEFAULT_API_BASE_URL;
use crate::services::storage::DEFAULT_STATE_FILE;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API base URL
    pub api_url: String,
    /// Pre-issued bearer token; when set the init-data exchange is skipped
    pub api_token: Option<String>,
    /// Telegram Mini App init data used to connect at startup
    pub init_data: Option<String>,
    /// Interval between real-time poll ticks
    pub poll_interval: Duration,
    /// Probe the backend before starting and refuse to run if it is down
    pub full_health_check: bool,
    /// Error reporting DSN; recorded in the logs for operators
    pub error_dsn: Option<String>,
    /// Use the in-process mock backend instead of HTTP
    pub demo: bool,
    /// Path of the persisted preferences file
    pub state_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            init_data: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            full_health_check: false,
            error_dsn: None,
            demo: false,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            api_url: std::env::var("DASHBOARD_API_URL").unwrap_or(defaults.api_url),
            api_token: std::env::var("DASHBOARD_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            init_data: std::env::var("DASHBOARD_INIT_DATA")
                .ok()
                .filter(|d| !d.is_empty()),
            poll_interval: std::env::var("DASHBOARD_POLL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            full_health_check: std::env::var("DASHBOARD_FULL_HEALTH_CHECK")
                .map(|v| v == "1")
                .unwrap_or(defaults.full_health_check),
            error_dsn: std::env::var("DASHBOARD_ERROR_DSN")
                .ok()
                .filter(|d| !d.is_empty()),
            demo: std::env::var("DASHBOARD_DEMO")
                .map(|v| v == "1")
                .unwrap_or(defaults.demo),
            state_file: std::env::var("DASHBOARD_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://127.0.0.1:3001");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert!(!config.demo);
        assert!(!config.full_health_check);
        assert!(config.api_token.is_none());
    }
}
