//! # Backend API Client Module
//!
//! HTTP client for communicating with the Chanlytics backend API server.
//! Handles session establishment, channel management, analytics queries,
//! database monitors, and media upload.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs        - Module exports and documentation
//! ├── client.rs     - ApiClient struct and common functionality
//! ├── auth.rs       - Session endpoint (init-data exchange)
//! ├── channels.rs   - Channel CRUD endpoints
//! ├── analytics.rs  - Analytics endpoints (overview, posts, engagement, health)
//! ├── admin.rs      - Database monitor endpoints (query stats, vacuum)
//! └── media.rs      - Streaming media upload
//! ```

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod channels;
pub mod client;
pub mod media;

pub use client::ApiClient;
