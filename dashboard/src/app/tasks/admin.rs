//! # Database Monitor Tasks
//!
//! Fetches and maintenance actions for the query statistics and table bloat
//! monitors. Reads follow the usual resource protocol; the two destructive
//! actions (stats reset, VACUUM) are serialized by an `action_in_flight` flag
//! and never touch monitor data until the refetch that follows success.

use crate::app::events::AppEvent;
use crate::app::state::{AppState, Screen};
use async_channel::Sender;
use parking_lot::RwLock;
use shared::dto::admin::VacuumRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::spawn;
use tracing::info;

/// Interval between automatic monitor refreshes
const AUTO_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Fetch the aggregate query statistics summary
pub(crate) fn fetch_query_stats(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, api) = {
        let mut state = state.write();
        if !state.admin.query.summary.should_fetch(force) {
            return;
        }
        (state.admin.query.summary.begin(), state.services.api.clone())
    };

    spawn(async move {
        let result = api.get_query_stats().await;
        let _ = event_tx
            .send(AppEvent::QueryStatsResult { ticket, result })
            .await;
    });
}

/// Fetch the slow query report with the current filters
pub(crate) fn fetch_slow_queries(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, api, filters) = {
        let mut state = state.write();
        if !state.admin.query.slow_queries.should_fetch(force) {
            return;
        }
        (
            state.admin.query.slow_queries.begin(),
            state.services.api.clone(),
            state.admin.query.filters,
        )
    };

    spawn(async move {
        let result = api.get_slow_queries(filters).await;
        let _ = event_tx
            .send(AppEvent::SlowQueriesResult { ticket, result })
            .await;
    });
}

/// Fetch per-table bloat statistics
pub(crate) fn fetch_table_stats(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, api) = {
        let mut state = state.write();
        if !state.admin.vacuum.tables.should_fetch(force) {
            return;
        }
        (state.admin.vacuum.tables.begin(), state.services.api.clone())
    };

    spawn(async move {
        let result = api.get_table_stats().await;
        let _ = event_tx
            .send(AppEvent::TableStatsResult { ticket, result })
            .await;
    });
}

/// Reset the collected query statistics.
///
/// Serialized: a second call while one is in flight is dropped.
pub(crate) fn run_reset_stats(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    let api = {
        let mut state = state.write();
        if state.admin.query.action_in_flight {
            return;
        }
        state.admin.query.action_in_flight = true;
        state.admin.query.last_action_error = None;
        state.services.api.clone()
    };

    info!("Query statistics reset requested");
    spawn(async move {
        let result = api.reset_query_stats().await;
        let _ = event_tx.send(AppEvent::StatsResetFinished(result)).await;
    });
}

/// Run VACUUM (optionally FULL) on one table.
///
/// The table list keeps showing pre-vacuum numbers until the refetch after a
/// successful run reports the real outcome.
pub(crate) fn run_vacuum(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    table: String,
    full: bool,
) {
    let api = {
        let mut state = state.write();
        if state.admin.vacuum.action_in_flight {
            return;
        }
        state.admin.vacuum.action_in_flight = true;
        state.admin.vacuum.last_action_error = None;
        state.services.api.clone()
    };

    info!(table = %table, full, "VACUUM requested");
    spawn(async move {
        let result = api.run_vacuum(VacuumRequest { table, full }).await;
        let _ = event_tx.send(AppEvent::VacuumFinished(result)).await;
    });
}

/// Start the query monitor auto-refresh loop if enabled and not running
pub(crate) fn ensure_query_refresh(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    let session = {
        let mut state = state.write();
        if state.admin.query.refresh_running || !state.admin.query.auto_refresh {
            return;
        }
        if state.current_screen != Screen::QueryStats {
            return;
        }
        state.admin.query.refresh_session += 1;
        state.admin.query.refresh_running = true;
        state.admin.query.refresh_session
    };

    spawn(async move {
        info!(session, "Query monitor auto-refresh started");
        loop {
            tokio::time::sleep(AUTO_REFRESH_INTERVAL).await;
            let keep_going = {
                let state = state.read();
                state.admin.query.refresh_session == session
                    && state.admin.query.auto_refresh
                    && state.current_screen == Screen::QueryStats
            };
            if !keep_going {
                break;
            }
            fetch_query_stats(Arc::clone(&state), event_tx.clone(), true);
            fetch_slow_queries(Arc::clone(&state), event_tx.clone(), true);
        }

        let mut state = state.write();
        if state.admin.query.refresh_session == session {
            state.admin.query.refresh_running = false;
        }
        info!(session, "Query monitor auto-refresh stopped");
    });
}

/// Start the vacuum monitor auto-refresh loop if enabled and not running
pub(crate) fn ensure_vacuum_refresh(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    let session = {
        let mut state = state.write();
        if state.admin.vacuum.refresh_running || !state.admin.vacuum.auto_refresh {
            return;
        }
        if state.current_screen != Screen::Vacuum {
            return;
        }
        state.admin.vacuum.refresh_session += 1;
        state.admin.vacuum.refresh_running = true;
        state.admin.vacuum.refresh_session
    };

    spawn(async move {
        info!(session, "Vacuum monitor auto-refresh started");
        loop {
            tokio::time::sleep(AUTO_REFRESH_INTERVAL).await;
            let keep_going = {
                let state = state.read();
                state.admin.vacuum.refresh_session == session
                    && state.admin.vacuum.auto_refresh
                    && state.current_screen == Screen::Vacuum
            };
            if !keep_going {
                break;
            }
            fetch_table_stats(Arc::clone(&state), event_tx.clone(), true);
        }

        let mut state = state.write();
        if state.admin.vacuum.refresh_session == session {
            state.admin.vacuum.refresh_running = false;
        }
        info!(session, "Vacuum monitor auto-refresh stopped");
    });
}
