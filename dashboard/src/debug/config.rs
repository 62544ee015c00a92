//! Debug configuration from environment variables

use std::path::PathBuf;

/// Debug system configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Log level filter (e.g., "dashboard=debug,info")
    pub log_level: String,
    /// Enable realtime debug log (separate from main log, truncated on start)
    pub enable_realtime_log: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: "dashboard=info,warn".to_string(),
            enable_realtime_log: false,
        }
    }
}

impl DebugConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var("DASHBOARD_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs")),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "dashboard=info,warn".to_string()),
            enable_realtime_log: std::env::var("DASHBOARD_DEBUG_REALTIME")
                .map(|v| v == "1")
                .unwrap_or(cfg!(feature = "debug-mode")),
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug")
    }
}
