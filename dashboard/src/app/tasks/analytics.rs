//! # Analytics Tasks
//!
//! Async tasks for the four per-channel analytics resources. Each fetch is
//! guarded by [`crate::core::resource::Resource::should_fetch`], so mounting
//! a screen that already has data costs nothing unless the caller forces a
//! refresh.

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use async_channel::Sender;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::spawn;
use tracing::debug;

/// Fetch the analytics overview for the selected channel
pub(crate) fn fetch_overview(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, provider, channel_id) = {
        let mut state = state.write();
        let Some(channel_id) = state.channels.selected else {
            return;
        };
        if !state.analytics.overview.should_fetch(force) {
            return;
        }
        (
            state.analytics.overview.begin(),
            state.services.provider.clone(),
            channel_id,
        )
    };

    spawn(async move {
        let result = provider.get_analytics(channel_id).await;
        let _ = event_tx
            .send(AppEvent::OverviewResult { ticket, result })
            .await;
    });
}

/// Fetch top posts for the selected channel using the current query settings
pub(crate) fn fetch_top_posts(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, provider, channel_id, query) = {
        let mut state = state.write();
        let Some(channel_id) = state.channels.selected else {
            return;
        };
        if !state.analytics.top_posts.should_fetch(force) {
            return;
        }
        (
            state.analytics.top_posts.begin(),
            state.services.provider.clone(),
            channel_id,
            state.analytics.query,
        )
    };

    spawn(async move {
        let result = provider.get_top_posts(channel_id, query).await;
        let _ = event_tx
            .send(AppEvent::TopPostsResult { ticket, result })
            .await;
    });
}

/// Fetch engagement metrics for the selected channel
pub(crate) fn fetch_engagement(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, provider, channel_id, query) = {
        let mut state = state.write();
        let Some(channel_id) = state.channels.selected else {
            return;
        };
        if !state.analytics.engagement.should_fetch(force) {
            return;
        }
        (
            state.analytics.engagement.begin(),
            state.services.provider.clone(),
            channel_id,
            state.analytics.query,
        )
    };

    spawn(async move {
        let result = provider.get_engagement_metrics(channel_id, query).await;
        let _ = event_tx
            .send(AppEvent::EngagementResult { ticket, result })
            .await;
    });
}

/// Fetch content recommendations for the selected channel
pub(crate) fn fetch_recommendations(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    force: bool,
) {
    let (ticket, provider, channel_id) = {
        let mut state = state.write();
        let Some(channel_id) = state.channels.selected else {
            return;
        };
        if !state.analytics.recommendations.should_fetch(force) {
            return;
        }
        (
            state.analytics.recommendations.begin(),
            state.services.provider.clone(),
            channel_id,
        )
    };

    spawn(async move {
        let result = provider.get_recommendations(channel_id).await;
        let _ = event_tx
            .send(AppEvent::RecommendationsResult { ticket, result })
            .await;
    });
}

/// Force-refresh all four analytics resources for the selected channel
pub(crate) fn refetch_all(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    debug!("Refetching all analytics resources");
    fetch_overview(Arc::clone(&state), event_tx.clone(), true);
    fetch_top_posts(Arc::clone(&state), event_tx.clone(), true);
    fetch_engagement(Arc::clone(&state), event_tx.clone(), true);
    fetch_recommendations(state, event_tx, true);
}

/// Mount-style fetch: load whatever is missing without forcing refreshes
pub(crate) fn fetch_missing(state: Arc<RwLock<AppState>>, event_tx: Sender<AppEvent>) {
    fetch_overview(Arc::clone(&state), event_tx.clone(), false);
    fetch_top_posts(Arc::clone(&state), event_tx.clone(), false);
    fetch_engagement(Arc::clone(&state), event_tx.clone(), false);
    fetch_recommendations(state, event_tx, false);
}
