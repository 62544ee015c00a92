//! # Database Monitor Handlers
//!
//! Filter changes, auto-refresh toggles, and the confirmation dialog that
//! gates every destructive maintenance action. The tasks in
//! [`crate::app::tasks::admin`] are only ever reached through
//! [`handle_confirm_dialog`]; there is no direct path from a button to a
//! stats reset or a VACUUM.

use crate::app::events::AppEvent;
use crate::app::state::{AdminAction, AppState, ConfirmDialog};
use crate::app::tasks;
use async_channel::Sender;
use parking_lot::RwLock;
use shared::dto::admin::SlowQueryFilters;
use std::sync::Arc;

/// Handle slow-query filter change
///
/// Internal handler function - use [`crate::app::App::handle_set_slow_query_filters`] instead.
pub(crate) fn handle_set_slow_query_filters(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    filters: SlowQueryFilters,
) {
    {
        let mut state = state.write();
        if state.admin.query.filters == filters {
            return;
        }
        state.admin.query.filters = filters;
    }
    tasks::admin::fetch_slow_queries(state, event_tx, true);
}

/// Toggle the query monitor auto-refresh loop
///
/// Internal handler function - use [`crate::app::App::handle_toggle_query_auto_refresh`] instead.
pub(crate) fn handle_toggle_query_auto_refresh(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
) {
    let enabled = {
        let mut state = state.write();
        state.admin.query.auto_refresh = !state.admin.query.auto_refresh;
        if !state.admin.query.auto_refresh {
            // Orphan the loop immediately instead of waiting a full interval
            state.admin.query.refresh_session += 1;
            state.admin.query.refresh_running = false;
        }
        state.admin.query.auto_refresh
    };

    if enabled {
        tasks::admin::ensure_query_refresh(state, event_tx);
    }
}

/// Toggle the vacuum monitor auto-refresh loop
///
/// Internal handler function - use [`crate::app::App::handle_toggle_vacuum_auto_refresh`] instead.
pub(crate) fn handle_toggle_vacuum_auto_refresh(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
) {
    let enabled = {
        let mut state = state.write();
        state.admin.vacuum.auto_refresh = !state.admin.vacuum.auto_refresh;
        if !state.admin.vacuum.auto_refresh {
            state.admin.vacuum.refresh_session += 1;
            state.admin.vacuum.refresh_running = false;
        }
        state.admin.vacuum.auto_refresh
    };

    if enabled {
        tasks::admin::ensure_vacuum_refresh(state, event_tx);
    }
}

/// Request a destructive action, opening the confirmation dialog
///
/// Internal handler function - use [`crate::app::App::request_admin_action`] instead.
pub(crate) fn handle_request_action(state: Arc<RwLock<AppState>>, action: AdminAction) {
    let mut state = state.write();
    if state.admin.dialog.is_some() {
        return;
    }
    state.admin.dialog = Some(ConfirmDialog::new(action));
}

/// Confirm the pending dialog and run its action
///
/// Internal handler function - use [`crate::app::App::handle_confirm_dialog`] instead.
pub(crate) fn handle_confirm_dialog(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    let action = {
        let mut state = state.write();
        match state.admin.dialog.take() {
            Some(dialog) => dialog.action,
            None => return,
        }
    };

    match action {
        AdminAction::ResetQueryStats => tasks::admin::run_reset_stats(state, event_tx),
        AdminAction::RunVacuum { table, full } => {
            tasks::admin::run_vacuum(state, event_tx, table, full)
        }
    }
}

/// Dismiss the pending dialog without running anything
///
/// Internal handler function - use [`crate::app::App::handle_cancel_dialog`] instead.
pub(crate) fn handle_cancel_dialog(state: Arc<RwLock<AppState>>) {
    let mut state = state.write();
    state.admin.dialog = None;
}
