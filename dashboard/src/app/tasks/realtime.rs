//! # Real-Time Polling
//!
//! Background poller that refreshes the overview snapshot for the selected
//! channel at a fixed interval, with exponential backoff inside each tick
//! when the backend misbehaves.
//!
//! The loop is self-terminating: each iteration re-checks that it still owns
//! the current `poll_session` stamp, that the Overview screen is visible, and
//! that the channel it was started for is still selected. Changing any of
//! those orphans the loop and it exits on its next wake-up. Starting a new
//! poller never requires stopping the old one first.

use crate::app::events::AppEvent;
use crate::app::state::{AppState, Screen};
use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::spawn;
use tracing::{debug, info, warn};

fn owns_poll(state: &RwLock<AppState>, session: u64, channel_id: i64) -> bool {
    let state = state.read();
    state.realtime.poll_session == session
        && state.current_screen == Screen::Overview
        && state.channels.selected == Some(channel_id)
}

/// Start the real-time poll loop if none is running.
///
/// No-op unless a channel is selected and the Overview screen is visible.
pub(crate) fn ensure_poller(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    let (session, channel_id, interval, policy) = {
        let mut state = state.write();
        if state.realtime.polling {
            return;
        }
        let Some(channel_id) = state.channels.selected else {
            return;
        };
        if state.current_screen != Screen::Overview {
            return;
        }
        state.realtime.poll_session += 1;
        state.realtime.polling = true;
        state.realtime.consecutive_failures = 0;
        (
            state.realtime.poll_session,
            channel_id,
            state.realtime.poll_interval,
            state.realtime.retry,
        )
    };

    let provider = state.read().services.provider.clone();
    spawn(async move {
        info!(session, channel_id, interval_secs = interval.as_secs(), "Real-time poller started");

        loop {
            tokio::time::sleep(interval).await;
            if !owns_poll(&state, session, channel_id) {
                break;
            }

            // One tick: fetch with backoff until success or budget exhausted
            let mut attempt = 0u32;
            loop {
                match provider.get_analytics(channel_id).await {
                    Ok(snapshot) => {
                        let _ = event_tx
                            .send(AppEvent::RealtimeSnapshot {
                                poll_session: session,
                                channel_id,
                                result: Ok(snapshot),
                                retries_exhausted: false,
                            })
                            .await;
                        break;
                    }
                    Err(e) => {
                        let exhausted = attempt >= policy.max_retries;
                        let _ = event_tx
                            .send(AppEvent::RealtimeSnapshot {
                                poll_session: session,
                                channel_id,
                                result: Err(e.clone()),
                                retries_exhausted: exhausted,
                            })
                            .await;
                        if exhausted {
                            warn!(
                                session,
                                channel_id,
                                attempts = attempt + 1,
                                error = %e,
                                "Real-time tick gave up, serving cached snapshot until next tick"
                            );
                            break;
                        }
                        let delay = policy.delay(attempt);
                        debug!(
                            session,
                            channel_id,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Real-time tick failed, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        if !owns_poll(&state, session, channel_id) {
                            break;
                        }
                    }
                }
            }

            if !owns_poll(&state, session, channel_id) {
                break;
            }
        }

        // Only the current owner may clear the flag; an orphaned loop must
        // not stomp on a successor's bookkeeping.
        let mut state = state.write();
        if state.realtime.poll_session == session {
            state.realtime.polling = false;
        }
        info!(session, channel_id, "Real-time poller stopped");
    });
}

/// Orphan any running poll loop.
///
/// The loop notices on its next wake-up; snapshots it already produced are
/// dropped by the session check in the event handler.
pub(crate) fn stop_poller(state: &Arc<RwLock<AppState>>) {
    let mut state = state.write();
    state.realtime.poll_session += 1;
    state.realtime.polling = false;
}
