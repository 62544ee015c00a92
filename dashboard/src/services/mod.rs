//! # Services Module
//!
//! External service integrations for the Chanlytics dashboard client.
//! This module provides clients and utilities for communicating with the
//! backend and the local filesystem.
//!
//! ## Module Overview
//!
//! ```text
//! services/
//! ├── api/        - Backend HTTP API client
//! │                 (session, channels, analytics, monitors, media)
//! ├── mock.rs     - In-process mock backend
//! │                 (demo mode, dependency-injection tests)
//! └── storage.rs  - Local JSON state store
//!                   (remembered channel selection per user)
//! ```
//!
//! ## Service Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Dashboard App                        │
//! │                                                         │
//! │  ┌──────────────────┐       ┌──────────────────┐       │
//! │  │  ApiClient       │       │  LocalStore      │       │
//! │  │  (api/)          │       │  (storage.rs)    │       │
//! │  └────────┬─────────┘       └────────┬─────────┘       │
//! │           │                          │                 │
//! └───────────┼──────────────────────────┼─────────────────┘
//!             │                          │
//!             │ HTTP/JSON                │ JSON file
//!             ▼                          ▼
//! ┌─────────────────────┐    ┌─────────────────────────────┐
//! │  Backend API Server │    │  ./dashboard-state.json     │
//! │  (SaaS, Postgres)   │    │                             │
//! │                     │    │  - selected channel per     │
//! │  /api/auth/*        │    │    user id                  │
//! │  /api/channels/*    │    │                             │
//! │  /api/admin/*       │    └─────────────────────────────┘
//! │  /api/media         │
//! └─────────────────────┘
//! ```
//!
//! ## ApiClient (api/)
//!
//! HTTP client for the backend REST API. Implements both service traits from
//! [`crate::core::service`]:
//!
//! - [`crate::core::service::DataProvider`]: the five read-only analytics
//!   operations plus the availability probe. One request per call, no retry
//!   or caching inside the client.
//! - [`crate::core::service::ApiService`]: session establishment, channel
//!   CRUD, the two database monitors, media upload.
//!
//! The session token lives on the client (`set_token`), so provider calls
//! carry no auth plumbing.
//!
//! ### Usage Pattern
//!
//! ```text
//! let api = Arc::new(ApiClient::with_base_url(&config.api_url));
//!
//! spawn(async move {
//!     match api.create_session(init_data).await {
//!         Ok(session) => { /* install token, fetch channels */ }
//!         Err(e) => { /* surface error string in state */ }
//!     }
//! });
//! ```
//!
//! ## MockProvider (mock.rs)
//!
//! Seeded in-process stand-in for the whole backend. Selected at startup in
//! demo mode and injected through the service traits in tests. Supports
//! latency injection, forced failures, and per-operation call counts.
//!
//! ## LocalStore (storage.rs)
//!
//! Small JSON file remembering the last selected channel per user id, loaded
//! on session start and rewritten on every selection change.
//!
//! ## Error Handling
//!
//! API functions return `Result<T, String>` with user-friendly messages:
//! - Network errors: "Network error: {details}"
//! - Parse errors: "Failed to parse response: {details}"
//! - API errors: Extracted from the ErrorResponse body
//!
//! Storage functions return [`crate::core::error::Result`] and degrade to
//! defaults on load failure.
//!
//! ## Thread Safety
//!
//! - **ApiClient**: `reqwest::Client` is internally thread-safe; the token
//!   sits behind a `parking_lot::RwLock`. Wrap in `Arc` and share freely.
//! - **MockProvider**: all mutable state behind `parking_lot` locks.
//! - **LocalStore**: stateless handle; every call re-reads the file.

pub mod api;
pub mod mock;
pub mod storage;
