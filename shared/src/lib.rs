//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the dashboard client and the
//! Chanlytics backend API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Session establishment and user identity DTOs
//!   - **[`dto::channel`]**: Channel management DTOs
//!   - **[`dto::analytics`]**: Analytics projections (overview, posts, engagement)
//!   - **[`dto::admin`]**: Database monitor DTOs (query stats, vacuum)
//!   - **[`dto::media`]**: Media upload DTOs and transient upload records
//! - **[`utils`]**: Shared display helpers
//!   - **[`utils::format_count`]**: Compact subscriber/view counts (12.4K)
//!   - **[`utils::format_bytes`]**: Human-readable byte sizes
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON using the default `serde` behavior:
//! - Field names use **snake_case** in Rust, which maps to **snake_case** in JSON by default
//! - Optional fields are omitted from JSON when `None` (using `#[serde(skip_serializing_if = "Option::is_none")]`)
//! - All structs implement both `Serialize` and `Deserialize` for bidirectional communication
//!
//! ## Usage in the Client
//!
//! ```rust
//! use shared::dto::channel::CreateChannelRequest;
//!
//! let request = CreateChannelRequest {
//!     name: "Daily Digest".to_string(),
//!     username: "dailydigest".to_string(),
//!     telegram_id: -1001234567890,
//! };
//!
//! let body = serde_json::to_string(&request).expect("serializes");
//! assert!(body.contains("\"username\":\"dailydigest\""));
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
