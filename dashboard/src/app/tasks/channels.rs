//! # Channel Tasks
//!
//! Async tasks for fetching the channel list and running channel mutations.
//!
//! The list fetch carries the heaviest machinery in the app: a process-wide
//! per-user in-flight guard plus bounded exponential retry. The guard exists
//! because several screens may ask for the list at nearly the same moment
//! (navigation, session restore, a manual refresh) and only one request per
//! user should ever hit the backend.

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use crate::core::resource::RetryPolicy;
use async_channel::Sender;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use shared::dto::channel::{CreateChannelRequest, UpdateChannelRequest};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::spawn;
use tracing::{debug, error, info, warn};

/// In-flight channel list fetches keyed by user id.
///
/// Global rather than per-App so concurrent views over the same account
/// still collapse into a single request.
static ACTIVE_FETCHES: Lazy<Mutex<HashMap<i64, Instant>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Entries older than this are treated as leaked (a task that never released
/// its claim) and may be replaced.
const ACTIVE_FETCH_EXPIRY: Duration = Duration::from_secs(30);

/// Claim the per-user fetch slot. Returns false if a live fetch holds it.
fn try_claim(user_id: i64) -> bool {
    let mut active = ACTIVE_FETCHES.lock();
    if let Some(started) = active.get(&user_id) {
        if started.elapsed() < ACTIVE_FETCH_EXPIRY {
            return false;
        }
    }
    active.insert(user_id, Instant::now());
    true
}

fn release_claim(user_id: i64) {
    ACTIVE_FETCHES.lock().remove(&user_id);
}

/// Fetch the channel list with retry and per-user dedup.
///
/// `force` bypasses the cached-value check but never the in-flight guards.
pub(crate) fn fetch_channels(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, api, user_id) = {
        let mut state = state.write();
        let Some(user_id) = state.user_id() else {
            return;
        };
        if !state.channels.list.should_fetch(force) {
            return;
        }
        if !try_claim(user_id) {
            debug!(user_id, "Channel list fetch already in flight, skipping");
            return;
        }
        (
            state.channels.list.begin(),
            state.services.api.clone(),
            user_id,
        )
    }; // Lock released here

    let policy = RetryPolicy::channel_list();
    spawn(async move {
        let mut attempt = 0u32;
        let result = loop {
            match api.list_channels().await {
                Ok(channels) => {
                    if attempt > 0 {
                        info!(user_id, attempt, "Channel list fetch recovered after retry");
                    }
                    break Ok(channels);
                }
                Err(e) => {
                    if attempt >= policy.max_retries {
                        error!(user_id, error = %e, "Channel list fetch failed after all retries");
                        break Err(e);
                    }
                    let delay = policy.delay(attempt);
                    warn!(
                        user_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Channel list fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        };

        release_claim(user_id);
        let _ = event_tx.send(AppEvent::ChannelsResult { ticket, result }).await;
    });
}

/// Register a new channel
pub(crate) fn submit_create(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    request: CreateChannelRequest,
) {
    let api = state.read().services.api.clone();
    spawn(async move {
        let result = api.create_channel(request).await;
        let _ = event_tx.send(AppEvent::ChannelCreated(result)).await;
    });
}

/// Update an existing channel
pub(crate) fn submit_update(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    channel_id: i64,
    request: UpdateChannelRequest,
) {
    let api = state.read().services.api.clone();
    spawn(async move {
        let result = api.update_channel(channel_id, request).await;
        let _ = event_tx.send(AppEvent::ChannelUpdated(result)).await;
    });
}

/// Delete a channel
pub(crate) fn submit_delete(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    channel_id: i64,
) {
    let api = state.read().services.api.clone();
    spawn(async move {
        let result = api.delete_channel(channel_id).await;
        let _ = event_tx
            .send(AppEvent::ChannelDeleted { channel_id, result })
            .await;
    });
}
