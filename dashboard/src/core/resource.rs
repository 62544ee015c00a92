//! # Generic Fetch State
//!
//! One primitive for every remotely-fetched piece of dashboard state.
//!
//! [`Resource<T>`] tracks the data/loading/error triple for a single remote
//! value, and every fetch cycle goes through a two-step protocol:
//!
//! 1. A handler calls [`Resource::begin`] under the state write lock and gets
//!    back a [`FetchTicket`] stamped with the resource's current generation.
//! 2. The spawned task performs the request and reports back through
//!    [`Resource::complete`] with the same ticket. Completions whose ticket no
//!    longer matches the current generation are discarded.
//!
//! The generation check is what makes overlapping fetches safe: when a second
//! request starts before the first finishes, the first one's ticket goes
//! stale and its late result can never overwrite the newer one. Resetting a
//! resource (e.g. when the selected channel changes) bumps the generation for
//! the same reason.
//!
//! [`RetryPolicy`] centralizes the exponential backoff used by the channel
//! list fetch and by the real-time poller.

use std::time::{Duration, Instant};

/// Proof that a fetch was started against a specific resource generation.
///
/// Tickets are cheap and `Copy`; they travel through the event channel with
/// the fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State of one remotely-fetched value.
#[derive(Debug)]
pub struct Resource<T> {
    data: Option<T>,
    error: Option<String>,
    loading: bool,
    generation: u64,
    fetched_at: Option<Instant>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
            generation: 0,
            fetched_at: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch cycle: bump the generation, mark loading, clear the error.
    ///
    /// Previous data stays visible while the new fetch is in flight.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch result if `ticket` still matches the current generation.
    ///
    /// Returns `false` when the completion was stale and discarded. A failed
    /// fetch records the error message but keeps any previously loaded data.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<T, String>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(value) => {
                self.data = Some(value);
                self.error = None;
                self.fetched_at = Some(Instant::now());
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        true
    }

    /// Overwrite the value outside the begin/complete protocol.
    ///
    /// Used by background refreshes (the real-time poller) that must not
    /// toggle the loading flag or disturb an in-flight foreground fetch.
    /// Callers are responsible for their own staleness checks.
    pub fn refresh(&mut self, value: T) {
        self.data = Some(value);
        self.error = None;
        self.fetched_at = Some(Instant::now());
    }

    /// Redundant-call guard: a fetch is warranted only when nothing is in
    /// flight and there is no cached value (or the caller forces a refresh).
    pub fn should_fetch(&self, force: bool) -> bool {
        if self.loading {
            return false;
        }
        force || self.data.is_none()
    }

    /// Drop everything and invalidate any in-flight fetch.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.data = None;
        self.error = None;
        self.loading = false;
        self.fetched_at = None;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time since the last successful fetch, `None` if never fetched.
    pub fn age(&self) -> Option<Duration> {
        self.fetched_at.map(|at| at.elapsed())
    }

    /// Whether the cached value is older than `max_age` (or missing entirely).
    pub fn is_stale(&self, max_age: Duration) -> bool {
        match self.age() {
            Some(age) => age > max_age,
            None => true,
        }
    }
}

/// Exponential backoff parameters for retried fetches.
///
/// Delay for attempt `n` (zero-based) is `base_delay * 2^n`, capped at
/// `max_delay`. `max_retries` bounds how many re-attempts follow the initial
/// try before the error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Policy for the channel list fetch: 1s, 2s, 4s, then give up.
    pub const fn channel_list() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(4))
    }

    /// Policy for the real-time poller: doubling from 1s, capped at 10s.
    pub const fn realtime() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(10))
    }

    /// Backoff delay before retry `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Resource Lifecycle ==========

    #[test]
    fn test_resource_starts_empty() {
        let resource: Resource<i32> = Resource::new();
        assert!(resource.data().is_none());
        assert!(resource.error().is_none());
        assert!(!resource.is_loading());
        assert!(resource.should_fetch(false));
    }

    #[test]
    fn test_begin_sets_loading_and_clears_error() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();
        resource.complete(ticket, Err("boom".to_string()));
        assert_eq!(resource.error(), Some("boom"));

        resource.begin();
        assert!(resource.is_loading());
        assert!(resource.error().is_none());
    }

    #[test]
    fn test_complete_success_stores_data() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();
        assert!(resource.complete(ticket, Ok(42)));
        assert_eq!(resource.data(), Some(&42));
        assert!(!resource.is_loading());
        assert!(resource.age().is_some());
    }

    #[test]
    fn test_complete_failure_keeps_previous_data() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();
        resource.complete(ticket, Ok(1));

        let ticket = resource.begin();
        resource.complete(ticket, Err("backend down".to_string()));
        assert_eq!(resource.data(), Some(&1));
        assert_eq!(resource.error(), Some("backend down"));
    }

    // ========== Generation Tokens ==========

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut resource: Resource<&str> = Resource::new();

        // First fetch starts, then a second one before the first resolves
        let first = resource.begin();
        let second = resource.begin();

        // Second (newer) fetch resolves first
        assert!(resource.complete(second, Ok("fresh")));
        assert_eq!(resource.data(), Some(&"fresh"));

        // The slow first fetch resolves late and must not overwrite
        assert!(!resource.complete(first, Ok("stale")));
        assert_eq!(resource.data(), Some(&"fresh"));
        assert!(!resource.is_loading());
    }

    #[test]
    fn test_stale_error_does_not_clobber_fresh_data() {
        let mut resource: Resource<i32> = Resource::new();
        let first = resource.begin();
        let second = resource.begin();

        assert!(resource.complete(second, Ok(7)));
        assert!(!resource.complete(first, Err("timeout".to_string())));
        assert_eq!(resource.data(), Some(&7));
        assert!(resource.error().is_none());
    }

    #[test]
    fn test_reset_invalidates_inflight_ticket() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();
        resource.reset();

        assert!(!resource.complete(ticket, Ok(99)));
        assert!(resource.data().is_none());
        assert!(!resource.is_loading());
    }

    #[test]
    fn test_refresh_leaves_inflight_fetch_undisturbed() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();

        resource.refresh(10);
        assert_eq!(resource.data(), Some(&10));
        assert!(resource.is_loading());

        // The foreground fetch still completes against its own ticket
        assert!(resource.complete(ticket, Ok(11)));
        assert_eq!(resource.data(), Some(&11));
    }

    // ========== Redundant-Call Guard ==========

    #[test]
    fn test_should_fetch_skips_while_loading() {
        let mut resource: Resource<i32> = Resource::new();
        resource.begin();
        assert!(!resource.should_fetch(false));
        assert!(!resource.should_fetch(true));
    }

    #[test]
    fn test_should_fetch_skips_cached_unless_forced() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();
        resource.complete(ticket, Ok(5));

        assert!(!resource.should_fetch(false));
        assert!(resource.should_fetch(true));
    }

    // ========== Retry Policy ==========

    #[test]
    fn test_channel_list_backoff_sequence() {
        let policy = RetryPolicy::channel_list();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay(0), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_realtime_backoff_caps_at_max() {
        let policy = RetryPolicy::realtime();
        assert_eq!(policy.delay(0), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));
        assert_eq!(policy.delay(3), Duration::from_secs(8));
        assert_eq!(policy.delay(4), Duration::from_secs(10));
        assert_eq!(policy.delay(10), Duration::from_secs(10));
    }

    #[test]
    fn test_delay_survives_large_attempt_numbers() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500), Duration::from_secs(10));
        assert_eq!(policy.delay(40), Duration::from_secs(10));
    }

    // ========== Staleness ==========

    #[test]
    fn test_never_fetched_is_stale() {
        let resource: Resource<i32> = Resource::new();
        assert!(resource.is_stale(Duration::from_secs(30)));
    }

    #[test]
    fn test_fresh_fetch_is_not_stale() {
        let mut resource: Resource<i32> = Resource::new();
        let ticket = resource.begin();
        resource.complete(ticket, Ok(1));
        assert!(!resource.is_stale(Duration::from_secs(30)));
    }
}
