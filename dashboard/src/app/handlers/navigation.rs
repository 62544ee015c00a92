//! # Navigation Handlers
//!
//! Screen changes and the mount-style fetches they trigger.

use crate::app::events::AppEvent;
use crate::app::state::{AppState, Screen};
use crate::app::tasks;
use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;

/// Handle screen change with session guard
///
/// Internal handler function - use [`crate::app::App::handle_screen_change`] instead.
/// Entering a screen loads whatever that screen needs and is missing; data
/// that is already cached is left alone.
pub(crate) fn handle_screen_change(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    screen: Screen,
) {
    {
        let mut state = state.write();
        if screen.requires_session() && !state.is_authenticated() {
            tracing::info!(
                "Access denied: {} requires a session, redirecting to Connect",
                screen.title()
            );
            state.current_screen = Screen::Connect;
            return;
        }
        state.current_screen = screen;
    }

    match screen {
        Screen::Connect => {}
        Screen::Overview => {
            tasks::channels::fetch_channels(Arc::clone(&state), event_tx.clone(), false);
            tasks::analytics::fetch_missing(Arc::clone(&state), event_tx.clone());
            tasks::realtime::ensure_poller(state, event_tx);
        }
        Screen::Channels => {
            tasks::channels::fetch_channels(state, event_tx, false);
        }
        Screen::QueryStats => {
            tasks::admin::fetch_query_stats(Arc::clone(&state), event_tx.clone(), false);
            tasks::admin::fetch_slow_queries(Arc::clone(&state), event_tx.clone(), false);
            tasks::admin::ensure_query_refresh(state, event_tx);
        }
        Screen::Vacuum => {
            tasks::admin::fetch_table_stats(Arc::clone(&state), event_tx.clone(), false);
            tasks::admin::ensure_vacuum_refresh(state, event_tx);
        }
    }
}
