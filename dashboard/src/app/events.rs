//! # Application Events
//!
//! Events flowing from spawned async tasks back to the main loop.
//!
//! Tasks never touch [`crate::app::state::AppState`] directly once their
//! request is in flight; they send one of these through the app's event
//! channel and the handlers in [`crate::app::event_handler`] apply the result
//! under the state lock. Fetch results carry the [`FetchTicket`] issued when
//! the fetch began so stale completions can be recognized and dropped.

use crate::core::resource::FetchTicket;
use shared::dto::admin::{QueryStatsSummary, SlowQuery, TableStats, VacuumOutcome};
use shared::dto::analytics::{
    AnalyticsOverview, EngagementMetrics, Recommendation, TopPost,
};
use shared::dto::auth::{SessionResponse, StatusResponse};
use shared::dto::channel::Channel;
use shared::dto::media::UploadMediaResponse;
use uuid::Uuid;

/// Events sent from async tasks to the main application loop
#[derive(Debug, Clone)]
pub enum AppEvent {
    // ========== Session ==========
    /// Session establishment finished
    SessionResult(Result<SessionResponse, String>),
    /// Backend health probe finished
    AvailabilityChecked(bool),

    // ========== Channels ==========
    /// Channel list fetch finished (possibly after retries)
    ChannelsResult {
        ticket: FetchTicket,
        result: Result<Vec<Channel>, String>,
    },
    /// Channel creation finished
    ChannelCreated(Result<Channel, String>),
    /// Channel update finished
    ChannelUpdated(Result<Channel, String>),
    /// Channel deletion finished
    ChannelDeleted {
        channel_id: i64,
        result: Result<(), String>,
    },

    // ========== Analytics ==========
    /// Overview fetch finished
    OverviewResult {
        ticket: FetchTicket,
        result: Result<AnalyticsOverview, String>,
    },
    /// Top posts fetch finished
    TopPostsResult {
        ticket: FetchTicket,
        result: Result<Vec<TopPost>, String>,
    },
    /// Engagement metrics fetch finished
    EngagementResult {
        ticket: FetchTicket,
        result: Result<EngagementMetrics, String>,
    },
    /// Recommendations fetch finished
    RecommendationsResult {
        ticket: FetchTicket,
        result: Result<Vec<Recommendation>, String>,
    },
    /// One real-time poll tick resolved.
    ///
    /// `poll_session` identifies the poll loop that produced the tick;
    /// snapshots from orphaned loops are ignored. `retries_exhausted` marks a
    /// failure that already consumed its whole backoff budget.
    RealtimeSnapshot {
        poll_session: u64,
        channel_id: i64,
        result: Result<AnalyticsOverview, String>,
        retries_exhausted: bool,
    },

    // ========== Database Monitors ==========
    /// Query statistics summary fetch finished
    QueryStatsResult {
        ticket: FetchTicket,
        result: Result<QueryStatsSummary, String>,
    },
    /// Slow query report fetch finished
    SlowQueriesResult {
        ticket: FetchTicket,
        result: Result<Vec<SlowQuery>, String>,
    },
    /// Query statistics reset finished
    StatsResetFinished(Result<StatusResponse, String>),
    /// Table statistics fetch finished
    TableStatsResult {
        ticket: FetchTicket,
        result: Result<Vec<TableStats>, String>,
    },
    /// VACUUM run finished
    VacuumFinished(Result<VacuumOutcome, String>),

    // ========== Media ==========
    /// Upload progress report (cumulative bytes sent)
    UploadProgress { id: Uuid, uploaded_bytes: u64 },
    /// Upload finished
    UploadFinished {
        id: Uuid,
        result: Result<UploadMediaResponse, String>,
    },
}

impl AppEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::SessionResult(_) => "SessionResult",
            AppEvent::AvailabilityChecked(_) => "AvailabilityChecked",
            AppEvent::ChannelsResult { .. } => "ChannelsResult",
            AppEvent::ChannelCreated(_) => "ChannelCreated",
            AppEvent::ChannelUpdated(_) => "ChannelUpdated",
            AppEvent::ChannelDeleted { .. } => "ChannelDeleted",
            AppEvent::OverviewResult { .. } => "OverviewResult",
            AppEvent::TopPostsResult { .. } => "TopPostsResult",
            AppEvent::EngagementResult { .. } => "EngagementResult",
            AppEvent::RecommendationsResult { .. } => "RecommendationsResult",
            AppEvent::RealtimeSnapshot { .. } => "RealtimeSnapshot",
            AppEvent::QueryStatsResult { .. } => "QueryStatsResult",
            AppEvent::SlowQueriesResult { .. } => "SlowQueriesResult",
            AppEvent::StatsResetFinished(_) => "StatsResetFinished",
            AppEvent::TableStatsResult { .. } => "TableStatsResult",
            AppEvent::VacuumFinished(_) => "VacuumFinished",
            AppEvent::UploadProgress { .. } => "UploadProgress",
            AppEvent::UploadFinished { .. } => "UploadFinished",
        }
    }
}
