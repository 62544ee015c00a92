//! # Core Abstractions
//!
//! Core traits, error types, and fetch-state primitives used throughout the
//! dashboard application.
//!
//! ## Modules
//!
//! - **[`error`]**: Application error types (`AppError`, `Result<T>`)
//! - **[`resource`]**: Generic fetch state (`Resource<T>`, `FetchTicket`, `RetryPolicy`)
//! - **[`service`]**: Service traits for dependency injection (`DataProvider`, `ApiService`)
//!
//! ## Error Handling
//!
//! All application errors use the centralized [`AppError`] type:
//!
//! ```rust
//! use dashboard::core::error::{AppError, Result};
//!
//! fn validate_input(input: &str) -> Result<String> {
//!     if input.is_empty() {
//!         return Err(AppError::Validation("Input cannot be empty".to_string()));
//!     }
//!     Ok(input.to_string())
//! }
//! ```
//!
//! ## Dependency Injection
//!
//! Service traits enable dependency injection for testing: production code
//! holds `Arc<dyn DataProvider>` / `Arc<dyn ApiService>` and tests swap in
//! mock implementations (see `services::mock`).

pub mod error;
pub mod resource;
pub mod service;

// Re-export commonly used types for convenience
// Note: These may be unused in the current implementation but are part of the public API
// for dependency injection and testing purposes
#[allow(unused_imports)]
pub use error::{AppError, Result};
#[allow(unused_imports)]
pub use resource::{FetchTicket, Resource, RetryPolicy};
#[allow(unused_imports)]
pub use service::{ApiService, DataProvider};
