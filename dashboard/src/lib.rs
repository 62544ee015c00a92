//! # Chanlytics Dashboard - Library Root
//!
//! A **headless application core** for the Chanlytics Telegram channel
//! analytics dashboard. This library crate contains all modules used by the
//! binary crate (`main.rs`); any frontend (Mini App shell, TUI, tests) drives
//! it through [`app::App`].
//!
//! ## Features
//!
//! - **Channel Analytics**: Overview, top posts, engagement, recommendations
//! - **Real-time Feed**: Background polling with cached-snapshot fallback
//! - **Channel Management**: Register, edit, and remove tracked channels
//! - **Database Monitors**: Query statistics and table bloat, with guarded
//!   maintenance actions (stats reset, VACUUM)
//! - **Media Upload**: Progress-tracked uploads to the backend CDN
//!
//! ## Architecture
//!
//! ### Technology Stack
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              dashboard (this crate)                    │
//! ├────────────────────────────────────────────────────────┤
//! │  Tokio          - Async runtime                        │
//! │  async-channel  - Event channel (tasks → main loop)    │
//! │  parking_lot    - Shared state locking                 │
//! │  Reqwest        - HTTP client                          │
//! │  tracing        - Structured logging                   │
//! └────────────────────────────────────────────────────────┘
//!                          │ HTTP (JSON)
//!                          ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                  Chanlytics Backend                    │
//! │        (sessions, analytics, monitors, media)          │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: Application state and orchestration
//!   - Event-driven architecture with async tasks
//!   - Screen navigation and the per-screen fetch lifecycles
//!
//! - **core**: Foundation types
//!   - `resource`: Generic fetch state with generation tokens
//!   - `service`: The `DataProvider` / `ApiService` injection seams
//!   - `error`: Application-wide error type
//!
//! - **services**: Trait implementations
//!   - `api`: Backend HTTP client
//!   - `mock`: In-process backend for demo mode and tests
//!   - `storage`: Persisted selections (local JSON state file)
//!
//! - **config**: Environment-driven runtime configuration
//! - **debug**: Logging setup and panic hook
//! - **utils**: Input validation
//!
//! ### Module Dependency Graph
//!
//! ```text
//! main.rs
//!   │
//!   └── app (state, events, handlers, tasks)
//!       ├── core (Resource, traits, errors)
//!       ├── services::api  ───┐
//!       ├── services::mock ───┼── implement core traits
//!       └── services::storage ┘
//! ```
//!
//! ## Core Concepts
//!
//! ### Event-Driven Architecture
//!
//! Handlers are synchronous and cheap: they validate, flip state, and spawn.
//! Network work happens in Tokio tasks that report back over an async channel,
//! drained once per main-loop iteration by [`app::App::on_tick`].
//!
//! ### State Management
//!
//! Application state is wrapped in `Arc<parking_lot::RwLock<AppState>>`:
//! - **Thread-safe**: Multiple readers, exclusive writers
//! - **Shared**: Accessible from async tasks
//! - **Locked briefly**: Never held across an await point
//!
//! ### Fetch Protocol
//!
//! Every remote value lives in a [`core::resource::Resource`], and every
//! fetch carries a generation ticket. Results from superseded fetches (the
//! channel changed, the user disconnected, a newer request won) fail the
//! ticket check and are dropped instead of clobbering fresh state.
//!
//! ## Usage
//!
//! ### As a Binary
//!
//! ```bash
//! cargo run --bin dashboard
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use dashboard::app::{App, Screen};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = App::new();
//!     app.handle_connect_click("telegram-init-data");
//!     loop {
//!         app.on_tick();
//!         tokio::time::sleep(std::time::Duration::from_millis(250)).await;
//!     }
//! }
//! ```
//!
//! ## Testing
//!
//! Run all tests:
//! ```bash
//! cargo test --lib
//! ```
//!
//! Run specific module tests:
//! ```bash
//! cargo test --lib app::tests
//! cargo test --lib core::resource::tests
//! ```
//!
//! The mock backend (`services::mock`) injects latency and failures and
//! counts per-operation calls, so the retry/dedup/polling behavior is tested
//! without a network.
//!
//! ## Dependencies
//!
//! ### Core Dependencies
//!
//! - `tokio` - Async runtime
//! - `async-channel` - Event channel
//! - `parking_lot` - Locks without poisoning
//! - `reqwest` - HTTP client
//! - `serde` / `serde_json` - DTO serialization
//! - `tracing` - Structured logging
//!
//! ### Shared Crate
//!
//! - `shared` - Common types (DTOs, requests, responses)
//!   - Shared between dashboard and backend

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod utils;

// Re-export commonly used types for convenience
pub use app::{App, AppEvent, AppState, Screen};
pub use config::Config;
pub use core::{AppError, Result};
