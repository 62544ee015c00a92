//! # Event Handler
//!
//! Applies [`AppEvent`]s drained by the main loop to application state.
//!
//! Every fetch completion goes through its resource's ticket check first, so
//! results from superseded fetches (channel switched, screen reset, a newer
//! request in flight) are recognized and dropped instead of overwriting fresh
//! state. Handlers that trigger follow-up fetches release the state lock
//! before spawning.

use crate::app::events::AppEvent;
use crate::app::state::{ChannelForm, ConnectionStatus, NoticeLevel, Screen, Session};
use crate::app::tasks;
use crate::app::App;
use crate::core::resource::FetchTicket;
use shared::dto::admin::{QueryStatsSummary, SlowQuery, TableStats, VacuumOutcome};
use shared::dto::analytics::{
    AnalyticsOverview, EngagementMetrics, Recommendation, TopPost,
};
use shared::dto::auth::{SessionResponse, StatusResponse};
use shared::dto::channel::Channel;
use shared::dto::media::{UploadMediaResponse, UploadStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Internal event dispatch, implemented on [`App`].
pub(crate) trait AppEventHandler {
    fn handle_event_impl(&mut self, event: AppEvent);
}

impl AppEventHandler for App {
    fn handle_event_impl(&mut self, event: AppEvent) {
        match event {
            AppEvent::SessionResult(result) => self.handle_session_result(result),
            AppEvent::AvailabilityChecked(available) => {
                self.handle_availability_checked(available)
            }
            AppEvent::ChannelsResult { ticket, result } => {
                self.handle_channels_result(ticket, result)
            }
            AppEvent::ChannelCreated(result) => self.handle_channel_created(result),
            AppEvent::ChannelUpdated(result) => self.handle_channel_updated(result),
            AppEvent::ChannelDeleted { channel_id, result } => {
                self.handle_channel_deleted(channel_id, result)
            }
            AppEvent::OverviewResult { ticket, result } => {
                self.handle_overview_result(ticket, result)
            }
            AppEvent::TopPostsResult { ticket, result } => {
                self.handle_top_posts_result(ticket, result)
            }
            AppEvent::EngagementResult { ticket, result } => {
                self.handle_engagement_result(ticket, result)
            }
            AppEvent::RecommendationsResult { ticket, result } => {
                self.handle_recommendations_result(ticket, result)
            }
            AppEvent::RealtimeSnapshot {
                poll_session,
                channel_id,
                result,
                retries_exhausted,
            } => self.handle_realtime_snapshot(poll_session, channel_id, result, retries_exhausted),
            AppEvent::QueryStatsResult { ticket, result } => {
                self.handle_query_stats_result(ticket, result)
            }
            AppEvent::SlowQueriesResult { ticket, result } => {
                self.handle_slow_queries_result(ticket, result)
            }
            AppEvent::StatsResetFinished(result) => self.handle_stats_reset_finished(result),
            AppEvent::TableStatsResult { ticket, result } => {
                self.handle_table_stats_result(ticket, result)
            }
            AppEvent::VacuumFinished(result) => self.handle_vacuum_finished(result),
            AppEvent::UploadProgress { id, uploaded_bytes } => {
                self.handle_upload_progress(id, uploaded_bytes)
            }
            AppEvent::UploadFinished { id, result } => self.handle_upload_finished(id, result),
        }
    }
}

impl App {
    // ========== Session ==========

    fn handle_session_result(&mut self, result: Result<SessionResponse, String>) {
        let mut state = self.state.write();
        state.connecting = false;
        match result {
            Ok(response) => {
                info!(user_id = response.user.id, "Session established");
                state
                    .services
                    .api
                    .set_session_token(Some(response.token.clone()));
                state.session = Some(Session {
                    token: response.token,
                    user: response.user,
                });
                state.connect_error = None;
                state.current_screen = Screen::Overview;
                drop(state); // CRITICAL: release before spawning follow-up work

                tasks::channels::fetch_channels(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    false,
                );
            }
            Err(e) => {
                warn!(error = %e, "Session establishment failed");
                state.connect_error = Some(e);
            }
        }
    }

    fn handle_availability_checked(&mut self, available: bool) {
        let mut state = self.state.write();
        if state.backend_available != Some(available) {
            info!(available, "Backend availability changed");
        }
        state.backend_available = Some(available);
    }

    // ========== Channels ==========

    /// Apply a channel list result and reconcile the selection with it.
    ///
    /// The previously selected channel wins if it still exists; otherwise the
    /// persisted choice for this user, otherwise the first channel.
    fn handle_channels_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Channel>, String>,
    ) {
        let mut state = self.state.write();
        let failed = result.is_err();
        if !state.channels.list.complete(ticket, result) {
            debug!("Discarding stale channel list result");
            return;
        }
        if failed {
            return;
        }

        let available: Vec<i64> = state
            .channels
            .list
            .data()
            .map(|list| list.iter().map(|c| c.id).collect())
            .unwrap_or_default();
        let user_id = state.user_id();

        let mut selected = state.channels.selected.filter(|id| available.contains(id));
        if selected.is_none() {
            if let Some(user_id) = user_id {
                selected = state
                    .services
                    .store
                    .restore_selection(user_id)
                    .filter(|id| available.contains(id));
            }
        }
        if selected.is_none() {
            selected = available.first().copied();
        }

        let selection_changed = state.channels.selected != selected;
        if selection_changed {
            info!(?selected, "Channel selection reconciled");
            state.channels.selected = selected;
            state.analytics.reset_all();
            state.realtime.connection = ConnectionStatus::Disconnected;
            if let (Some(user_id), Some(channel_id)) = (user_id, selected) {
                if let Err(e) = state.services.store.remember_selection(user_id, channel_id) {
                    warn!(error = %e, "Failed to persist channel selection");
                }
            }
        }
        let on_overview = state.current_screen == Screen::Overview;
        drop(state);

        if selection_changed {
            tasks::realtime::stop_poller(&self.state);
        }
        if on_overview {
            tasks::analytics::fetch_missing(Arc::clone(&self.state), self.event_tx.clone());
            tasks::realtime::ensure_poller(Arc::clone(&self.state), self.event_tx.clone());
        }
    }

    fn handle_channel_created(&mut self, result: Result<Channel, String>) {
        let mut state = self.state.write();
        state.channels.form.submitting = false;
        match result {
            Ok(channel) => {
                info!(channel_id = channel.id, username = %channel.username, "Channel created");
                state.channels.form = ChannelForm::default();
                state.notify(
                    NoticeLevel::Success,
                    format!("Channel @{} registered", channel.username),
                );
                drop(state);
                tasks::channels::fetch_channels(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    true,
                );
            }
            Err(e) => {
                state.channels.form.error = Some(e);
            }
        }
    }

    fn handle_channel_updated(&mut self, result: Result<Channel, String>) {
        let mut state = self.state.write();
        state.channels.form.submitting = false;
        match result {
            Ok(channel) => {
                info!(channel_id = channel.id, "Channel updated");
                state.channels.form = ChannelForm::default();
                state.notify(NoticeLevel::Success, format!("@{} updated", channel.username));
                drop(state);
                tasks::channels::fetch_channels(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    true,
                );
            }
            Err(e) => {
                state.channels.form.error = Some(e);
            }
        }
    }

    fn handle_channel_deleted(&mut self, channel_id: i64, result: Result<(), String>) {
        match result {
            Ok(()) => {
                let was_selected = {
                    let mut state = self.state.write();
                    info!(channel_id, "Channel deleted");
                    state.notify(NoticeLevel::Info, "Channel removed");

                    let was_selected = state.channels.selected == Some(channel_id);
                    if was_selected {
                        state.channels.selected = None;
                        state.analytics.reset_all();
                        state.realtime.connection = ConnectionStatus::Disconnected;
                        if let Some(user_id) = state.user_id() {
                            if let Err(e) = state.services.store.forget_selection(user_id) {
                                warn!(error = %e, "Failed to forget channel selection");
                            }
                        }
                    }
                    was_selected
                };

                if was_selected {
                    tasks::realtime::stop_poller(&self.state);
                }
                // The refetch re-runs selection reconciliation for the
                // remaining channels
                tasks::channels::fetch_channels(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    true,
                );
            }
            Err(e) => {
                let mut state = self.state.write();
                warn!(channel_id, error = %e, "Channel deletion failed");
                state.notify(NoticeLevel::Error, format!("Failed to delete channel: {}", e));
            }
        }
    }

    // ========== Analytics ==========

    fn handle_overview_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<AnalyticsOverview, String>,
    ) {
        let mut state = self.state.write();
        if !state.analytics.overview.complete(ticket, result) {
            debug!("Discarding stale overview result");
        }
    }

    fn handle_top_posts_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<TopPost>, String>,
    ) {
        let mut state = self.state.write();
        if !state.analytics.top_posts.complete(ticket, result) {
            debug!("Discarding stale top posts result");
        }
    }

    fn handle_engagement_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<EngagementMetrics, String>,
    ) {
        let mut state = self.state.write();
        if !state.analytics.engagement.complete(ticket, result) {
            debug!("Discarding stale engagement result");
        }
    }

    fn handle_recommendations_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Recommendation>, String>,
    ) {
        let mut state = self.state.write();
        if !state.analytics.recommendations.complete(ticket, result) {
            debug!("Discarding stale recommendations result");
        }
    }

    /// Apply one real-time poll tick.
    ///
    /// Snapshots from orphaned pollers (stale `poll_session`) are dropped
    /// outright. Successful ticks overwrite the overview without touching its
    /// loading flag; failures only degrade the connection status once the
    /// tick's whole retry budget is spent, and cached data keeps being shown.
    fn handle_realtime_snapshot(
        &mut self,
        poll_session: u64,
        channel_id: i64,
        result: Result<AnalyticsOverview, String>,
        retries_exhausted: bool,
    ) {
        let mut state = self.state.write();
        if state.realtime.poll_session != poll_session {
            debug!(poll_session, "Discarding snapshot from orphaned poller");
            return;
        }
        if state.channels.selected != Some(channel_id) {
            return;
        }

        match result {
            Ok(snapshot) => {
                state.analytics.overview.refresh(snapshot);
                state.realtime.connection = ConnectionStatus::Live;
                state.realtime.consecutive_failures = 0;
            }
            Err(e) => {
                state.realtime.consecutive_failures += 1;
                if retries_exhausted {
                    state.realtime.connection = if state.analytics.overview.data().is_some() {
                        ConnectionStatus::Cached
                    } else {
                        ConnectionStatus::Disconnected
                    };
                    warn!(
                        channel_id,
                        failures = state.realtime.consecutive_failures,
                        error = %e,
                        "Real-time feed degraded"
                    );
                }
            }
        }
    }

    // ========== Database Monitors ==========

    fn handle_query_stats_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<QueryStatsSummary, String>,
    ) {
        let mut state = self.state.write();
        if !state.admin.query.summary.complete(ticket, result) {
            debug!("Discarding stale query stats result");
        }
    }

    fn handle_slow_queries_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<SlowQuery>, String>,
    ) {
        let mut state = self.state.write();
        if !state.admin.query.slow_queries.complete(ticket, result) {
            debug!("Discarding stale slow queries result");
        }
    }

    fn handle_stats_reset_finished(&mut self, result: Result<StatusResponse, String>) {
        let mut state = self.state.write();
        state.admin.query.action_in_flight = false;
        match result {
            Ok(status) => {
                info!("Query statistics reset");
                let message = status
                    .message
                    .unwrap_or_else(|| "Query statistics reset".to_string());
                state.notify(NoticeLevel::Success, message);
                drop(state);
                tasks::admin::fetch_query_stats(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    true,
                );
                tasks::admin::fetch_slow_queries(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    true,
                );
            }
            Err(e) => {
                warn!(error = %e, "Query statistics reset failed");
                state.admin.query.last_action_error = Some(e.clone());
                state.notify(NoticeLevel::Error, format!("Reset failed: {}", e));
            }
        }
    }

    fn handle_table_stats_result(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<TableStats>, String>,
    ) {
        let mut state = self.state.write();
        if !state.admin.vacuum.tables.complete(ticket, result) {
            debug!("Discarding stale table stats result");
        }
    }

    /// A VACUUM either succeeded (notify + refetch the real numbers) or
    /// failed (record the error, leave the table list exactly as it was).
    fn handle_vacuum_finished(&mut self, result: Result<VacuumOutcome, String>) {
        let mut state = self.state.write();
        state.admin.vacuum.action_in_flight = false;
        match result {
            Ok(outcome) => {
                info!(
                    table = %outcome.table,
                    full = outcome.full,
                    duration_ms = outcome.duration_ms,
                    dead_tuples_before = outcome.dead_tuples_before,
                    "VACUUM finished"
                );
                state.notify(
                    NoticeLevel::Success,
                    format!(
                        "VACUUM{} on \"{}\" reclaimed {} dead tuples in {} ms",
                        if outcome.full { " FULL" } else { "" },
                        outcome.table,
                        outcome.dead_tuples_before - outcome.dead_tuples_after,
                        outcome.duration_ms
                    ),
                );
                drop(state);
                tasks::admin::fetch_table_stats(
                    Arc::clone(&self.state),
                    self.event_tx.clone(),
                    true,
                );
            }
            Err(e) => {
                warn!(error = %e, "VACUUM failed");
                state.admin.vacuum.last_action_error = Some(e.clone());
                state.notify(NoticeLevel::Error, format!("VACUUM failed: {}", e));
            }
        }
    }

    // ========== Media ==========

    fn handle_upload_progress(&mut self, id: Uuid, uploaded_bytes: u64) {
        let mut state = self.state.write();
        if let Some(upload) = state.uploads.find_mut(id) {
            // A late progress report must not resurrect a finished upload
            if !upload.status.is_terminal() {
                upload.uploaded_bytes = uploaded_bytes.min(upload.total_bytes);
                upload.status = UploadStatus::Uploading;
            }
        }
    }

    fn handle_upload_finished(&mut self, id: Uuid, result: Result<UploadMediaResponse, String>) {
        let mut state = self.state.write();
        match result {
            Ok(response) => {
                info!(upload_id = %id, url = %response.url, "Upload completed");
                if let Some(upload) = state.uploads.find_mut(id) {
                    upload.status = UploadStatus::Completed;
                    upload.uploaded_bytes = upload.total_bytes;
                }
                state.notify(NoticeLevel::Success, "Upload complete");
            }
            Err(e) => {
                warn!(upload_id = %id, error = %e, "Upload failed");
                if let Some(upload) = state.uploads.find_mut(id) {
                    upload.status = UploadStatus::Failed(e.clone());
                }
                state.notify(NoticeLevel::Error, format!("Upload failed: {}", e));
            }
        }
    }
}
