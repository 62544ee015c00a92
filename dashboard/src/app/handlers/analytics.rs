//! # Analytics Handlers
//!
//! View controls for the analytics screens (metrics period, result limits).

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use crate::app::tasks;
use async_channel::Sender;
use parking_lot::RwLock;
use shared::dto::analytics::MetricsPeriod;
use std::sync::Arc;

/// Handle metrics period change
///
/// Internal handler function - use [`crate::app::App::handle_set_period`] instead.
/// The period applies to top posts and engagement; both are force-refreshed
/// while their previous data stays visible.
pub(crate) fn handle_set_period(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    period: MetricsPeriod,
) {
    {
        let mut state = state.write();
        if state.analytics.query.period == period {
            return;
        }
        state.analytics.query.period = period;
    }

    tasks::analytics::fetch_top_posts(Arc::clone(&state), event_tx.clone(), true);
    tasks::analytics::fetch_engagement(state, event_tx, true);
}

/// Handle top-post limit change
///
/// Internal handler function - use [`crate::app::App::handle_set_post_limit`] instead.
pub(crate) fn handle_set_post_limit(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    limit: u32,
) {
    {
        let mut state = state.write();
        let limit = limit.clamp(1, 50);
        if state.analytics.query.limit == limit {
            return;
        }
        state.analytics.query.limit = limit;
    }

    tasks::analytics::fetch_top_posts(state, event_tx, true);
}
