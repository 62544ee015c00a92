//! # Debugging and Tracing Infrastructure
//!
//! File-based logging for the dashboard.
//!
//! ## Features
//!
//! - **File-based logging**: Structured logs to `logs/dashboard-debug.log`
//!   (daily rotation)
//! - **Realtime log**: Optional second log truncated on startup, for tailing
//!   a live session
//! - **Panic hook**: Crashes land in the log with location and backtrace
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (e.g., `dashboard=debug,info`)
//! - `DASHBOARD_LOG_DIR`: Log directory (default: `logs`)
//! - `DASHBOARD_DEBUG_REALTIME`: Enable the realtime log (1=on, 0=off)

pub mod config;
pub mod logger;

pub use config::DebugConfig;
pub use logger::init as init_logger;

/// Initialize the debugging system
///
/// Sets up file-based logging with daily rotation and the panic hook. Call
/// this at application startup, before any other operations.
pub fn init() {
    init_logger();
}

/// Check if debug mode is enabled via feature flag
pub fn is_debug_mode() -> bool {
    cfg!(feature = "debug-mode")
}

/// Check if profiling is enabled via feature flag
pub fn is_profile_mode() -> bool {
    cfg!(feature = "profile")
}
