//! # Utility Functions
//!
//! Shared utility functions used across the dashboard application.
//!
//! ## Modules
//!
//! - **[`validation`]**: Input validation utilities (channel names, usernames,
//!   Telegram ids)
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Cross-crate utilities (count and byte formatting)
//! - [`crate::core`]: Core abstractions and error types

pub mod validation;
