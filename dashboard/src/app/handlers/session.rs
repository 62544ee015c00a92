//! # Session Handlers
//!
//! Handlers for establishing and tearing down the backend session.

use crate::app::events::AppEvent;
use crate::app::state::{AppState, ChannelForm, ConnectionStatus, Screen};
use crate::app::tasks;
use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;

/// Handle connect button click
///
/// Internal handler function - use [`crate::app::App::handle_connect_click`] instead.
pub(crate) fn handle_connect_click(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    init_data: String,
) {
    let trimmed = init_data.trim().to_string();
    {
        let mut state = state.write();
        state.init_data = init_data;
        if trimmed.is_empty() {
            state.connect_error = Some("Telegram init data is required".to_string());
            return;
        }
        if state.connecting {
            return;
        }
        state.connecting = true;
        state.connect_error = None;
    }

    let api = state.read().services.api.clone();
    tokio::spawn(async move {
        let result = api.create_session(trimmed).await;
        let _ = event_tx.send(AppEvent::SessionResult(result)).await;
    });
}

/// Handle disconnect button click
///
/// Internal handler function - use [`crate::app::App::handle_disconnect_click`] instead.
/// Clears the session token and every piece of per-session state. Resources
/// are `reset()` rather than replaced so tickets from in-flight fetches stay
/// invalid forever.
pub(crate) fn handle_disconnect_click(state: Arc<RwLock<AppState>>) {
    tasks::realtime::stop_poller(&state);

    let mut state = state.write();
    state.services.api.set_session_token(None);
    state.session = None;
    state.connecting = false;
    state.current_screen = Screen::Connect;

    state.channels.list.reset();
    state.channels.selected = None;
    state.channels.form = ChannelForm::default();

    state.analytics.reset_all();
    state.realtime.connection = ConnectionStatus::Disconnected;
    state.realtime.consecutive_failures = 0;

    state.admin.query.summary.reset();
    state.admin.query.slow_queries.reset();
    state.admin.query.auto_refresh = false;
    state.admin.query.refresh_session += 1;
    state.admin.query.refresh_running = false;
    state.admin.vacuum.tables.reset();
    state.admin.vacuum.auto_refresh = false;
    state.admin.vacuum.refresh_session += 1;
    state.admin.vacuum.refresh_running = false;
    state.admin.dialog = None;

    tracing::info!("Session closed");
}

/// Probe backend availability
///
/// Internal handler function - use [`crate::app::App::check_availability`] instead.
pub(crate) fn check_availability(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    let provider = state.read().services.provider.clone();
    tokio::spawn(async move {
        let available = provider.is_available().await;
        let _ = event_tx.send(AppEvent::AvailabilityChecked(available)).await;
    });
}
