//! # Action Handlers
//!
//! User-action handlers organized by domain. Each handler validates against
//! current state, mutates it under the write lock, and hands network work to
//! the task modules; results come back through the event channel.

pub mod admin;
pub mod analytics;
pub mod channels;
pub mod navigation;
pub mod session;
