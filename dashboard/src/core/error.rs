//! # Common Error Types
//!
//! Consolidated error handling for the dashboard application.
//!
//! This module provides a centralized error type [`AppError`] that covers all error
//! scenarios in the dashboard application.
//!
//! ## Error Categories
//! Errors are categorized by their source:
//!
//! - **Api**: Backend API communication errors (network, HTTP, JSON parsing)
//! - **Storage**: Local state file errors (read, write, malformed JSON)
//! - **State**: Application state management errors (lock failures, invalid state)
//! - **Validation**: Input validation errors (invalid format, missing fields)
//!
//! ## Usage Pattern
//!
//! ```rust
//! use dashboard::core::error::AppError;
//!
//! fn validate_limit(limit: u32) -> Result<u32, AppError> {
//!     if limit == 0 {
//!         return Err(AppError::Validation("Limit must be positive".to_string()));
//!     }
//!     Ok(limit)
//! }
//! ```
//!
//! ## Error Conversion
//!
//! Common error types automatically convert to `AppError`:
//!
//! - `String` → `AppError::Api`
//! - `std::io::Error` → `AppError::Storage`
//! - `serde_json::Error` → `AppError::Storage`

use thiserror::Error;

/// Application-wide error type covering all error scenarios in the dashboard.
///
/// Each variant includes a descriptive `String` message for context. The `#[error]`
/// attribute from `thiserror` provides automatic `Display` and `Error` implementations.
///
/// # Error Variants
///
/// - **Api**: Backend API communication failures
///   - Network errors (connection refused, timeout)
///   - HTTP errors (4xx, 5xx status codes)
///   - JSON parsing errors
///   - Authentication failures
///
/// - **Storage**: Local state file failures
///   - Missing or unreadable state file
///   - Malformed JSON on disk
///   - Write failures (permissions, disk full)
///
/// - **State**: Application state management failures
///   - Lock contention (rare, indicates design issue)
///   - Invalid state transitions
///
/// - **Validation**: Input validation failures
///   - Invalid format (username, telegram id)
///   - Missing required fields
///   - Out of range values
///
/// # Example
///
/// ```rust
/// use dashboard::core::error::AppError;
///
/// let api_err = AppError::Api("Connection timeout".to_string());
/// let storage_err = AppError::Storage("State file is not valid JSON".to_string());
/// let validation_err = AppError::Validation("Username is required".to_string());
///
/// assert_eq!(api_err.to_string(), "API error: Connection timeout");
/// assert_eq!(storage_err.to_string(), "Storage error: State file is not valid JSON");
/// assert_eq!(validation_err.to_string(), "Validation error: Username is required");
/// ```
#[derive(Debug, Error)]
#[allow(dead_code)] // Exported for public API and future use
pub enum AppError {
    /// Backend API communication error.
    ///
    /// Used for errors during HTTP requests to the backend:
    /// - Network failures (connection refused, timeout, DNS errors)
    /// - HTTP errors (4xx client errors, 5xx server errors)
    /// - JSON parsing errors (malformed responses)
    /// - Authentication failures (invalid session token)
    #[error("API error: {0}")]
    Api(String),

    /// Local state file error.
    ///
    /// Used for errors while reading or writing the persisted dashboard
    /// state (selected channels, remembered user):
    /// - File system errors (missing directory, permissions)
    /// - Malformed JSON content
    #[error("Storage error: {0}")]
    Storage(String),

    /// Application state management error.
    ///
    /// Used for errors related to state management:
    /// - Lock contention (rare, indicates potential deadlock risk)
    /// - Invalid state transitions (e.g., opening a monitor screen without a session)
    #[error("State error: {0}")]
    State(String),

    /// Input validation error.
    ///
    /// Used for user input validation failures:
    /// - Invalid format (channel username, telegram id)
    /// - Missing required fields (name, username)
    /// - Out of range values (zero limits)
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convenience type alias for `Result<T, AppError>`.
///
/// Use this throughout the dashboard crate for consistent error handling:
///
/// ```rust
/// use dashboard::core::error::Result;
///
/// fn operation() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
#[allow(dead_code)] // Exported for public API and future use
pub type Result<T> = std::result::Result<T, AppError>;

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Api(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Api(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
