//! # Async Tasks
//!
//! Async task spawning for channel data, analytics, real-time polling, the
//! database monitors, and media uploads.
//!
//! Every task follows the same shape: the synchronous entry point takes the
//! state write lock just long enough to run its guards and stamp a
//! [`crate::core::resource::FetchTicket`], then spawns the actual request and
//! reports back through the event channel.

pub mod admin;
pub mod analytics;
pub mod channels;
pub mod media;
pub mod realtime;
