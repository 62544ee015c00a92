//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures used for communication between
//! the dashboard client and the backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Session establishment, user identity, and generic responses
//! - [`channel`] - Channel records and create/update requests
//! - [`analytics`] - Overview, engagement, top posts, and AI recommendations
//! - [`admin`] - Query statistics and vacuum monitor DTOs
//! - [`media`] - Upload responses and transient upload tracking
//!
//! ## Serialization Format
//!
//! All DTOs use `serde_json` for JSON serialization:
//!
//! - **Field naming**: snake_case (default serde behavior)
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//! - **Enums**: Serialize to lowercase strings using `#[serde(rename_all = "lowercase")]`
//! - **All types**: Implement both `Serialize` and `Deserialize`
//!
//! ## Example JSON Communication
//!
//! ### Request/Response Pair
//!
//! ```text
//! POST /api/auth/session
//! Content-Type: application/json
//!
//! {
//!   "init_data": "query_id=AAH...&user=%7B%22id%22%3A42..."
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "user": {
//!     "id": 42,
//!     "username": "alice",
//!     "display_name": "Alice"
//!   }
//! }
//! ```

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod channel;
pub mod media;

pub use admin::*;
pub use analytics::*;
pub use auth::*;
pub use channel::*;
pub use media::*;
