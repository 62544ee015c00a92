//! # Channel Handlers
//!
//! Channel selection and the create/edit/delete actions. Form submissions
//! are validated locally first; an invalid form never produces a request.

use crate::app::events::AppEvent;
use crate::app::state::{AppState, ChannelForm, ConnectionStatus, Screen};
use crate::app::tasks;
use crate::utils::validation::{parse_telegram_id, validate_channel_name, validate_channel_username};
use async_channel::Sender;
use parking_lot::RwLock;
use shared::dto::channel::{CreateChannelRequest, UpdateChannelRequest};
use std::sync::Arc;

/// Handle channel selection
///
/// Internal handler function - use [`crate::app::App::handle_select_channel`] instead.
/// Selection is persisted per user, all analytics for the previous channel
/// are invalidated, and the real-time poller is restarted against the new
/// channel when the Overview screen is visible.
pub(crate) fn handle_select_channel(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    channel_id: i64,
) {
    {
        let mut state = state.write();
        if !state.channels.contains(channel_id) {
            tracing::warn!(channel_id, "Ignoring selection of unknown channel");
            return;
        }
        if state.channels.selected == Some(channel_id) {
            return;
        }

        state.channels.selected = Some(channel_id);
        state.analytics.reset_all();
        state.realtime.connection = ConnectionStatus::Disconnected;
        state.realtime.consecutive_failures = 0;

        if let Some(user_id) = state.user_id() {
            if let Err(e) = state.services.store.remember_selection(user_id, channel_id) {
                tracing::warn!(error = %e, "Failed to persist channel selection");
            }
        }
        tracing::info!(channel_id, "Channel selected");
    }

    tasks::realtime::stop_poller(&state);
    if state.read().current_screen == Screen::Overview {
        tasks::analytics::fetch_missing(Arc::clone(&state), event_tx.clone());
        tasks::realtime::ensure_poller(state, event_tx);
    }
}

/// Open an empty create form
///
/// Internal handler function - use [`crate::app::App::open_create_form`] instead.
pub(crate) fn open_create_form(state: Arc<RwLock<AppState>>) {
    let mut state = state.write();
    state.channels.form = ChannelForm::default();
}

/// Open the form prefilled for editing `channel_id`
///
/// Internal handler function - use [`crate::app::App::open_edit_form`] instead.
pub(crate) fn open_edit_form(state: Arc<RwLock<AppState>>, channel_id: i64) {
    let mut state = state.write();
    let Some(channel) = state
        .channels
        .list
        .data()
        .and_then(|list| list.iter().find(|c| c.id == channel_id))
    else {
        tracing::warn!(channel_id, "Cannot edit unknown channel");
        return;
    };
    state.channels.form = ChannelForm::for_edit(channel);
}

/// Handle channel form submission
///
/// Internal handler function - use [`crate::app::App::handle_submit_channel_form`] instead.
/// Validation failures land in `form.error` and stop here; the API is only
/// reached with a request that already passed every local check.
pub(crate) fn handle_submit_channel_form(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
) {
    let (editing_id, name, username, telegram_id) = {
        let mut state = state.write();
        if state.channels.form.submitting {
            return;
        }

        let name = state.channels.form.name.trim().to_string();
        let username = state
            .channels
            .form
            .username
            .trim()
            .trim_start_matches('@')
            .to_string();
        let telegram_id_raw = state.channels.form.telegram_id.trim().to_string();

        let check = validate_channel_name(&name);
        if !check.is_valid {
            state.channels.form.error = check.error;
            return;
        }
        let check = validate_channel_username(&username);
        if !check.is_valid {
            state.channels.form.error = check.error;
            return;
        }
        let telegram_id = match parse_telegram_id(&telegram_id_raw) {
            Ok(id) => id,
            Err(message) => {
                state.channels.form.error = Some(message);
                return;
            }
        };

        state.channels.form.error = None;
        state.channels.form.submitting = true;
        (state.channels.form.editing_id, name, username, telegram_id)
    };

    match editing_id {
        None => tasks::channels::submit_create(
            state,
            event_tx,
            CreateChannelRequest {
                name,
                username,
                telegram_id,
            },
        ),
        Some(channel_id) => tasks::channels::submit_update(
            state,
            event_tx,
            channel_id,
            UpdateChannelRequest {
                name: Some(name),
                username: Some(username),
            },
        ),
    }
}

/// Handle channel deletion
///
/// Internal handler function - use [`crate::app::App::handle_delete_channel`] instead.
pub(crate) fn handle_delete_channel(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    channel_id: i64,
) {
    {
        let state = state.read();
        if !state.channels.contains(channel_id) {
            tracing::warn!(channel_id, "Ignoring deletion of unknown channel");
            return;
        }
    }
    tasks::channels::submit_delete(state, event_tx, channel_id);
}
