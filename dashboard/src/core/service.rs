//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.
//!
//! [`DataProvider`] is the read-only analytics contract: every method maps to
//! exactly one authenticated HTTP request and returns parsed JSON or an error
//! string for non-2xx responses. Retry, caching, and polling live above the
//! provider in the app layer, never inside it.
//!
//! [`ApiService`] covers the remaining backend surface: session establishment,
//! channel management, the database monitors, and media upload.

use async_trait::async_trait;
use shared::dto::admin::{
    QueryStatsSummary, SlowQuery, SlowQueryFilters, TableStats, VacuumOutcome, VacuumRequest,
};
use shared::dto::analytics::{
    AnalyticsOverview, AnalyticsQuery, EngagementMetrics, Recommendation, TopPost,
};
use shared::dto::auth::{SessionResponse, StatusResponse};
use shared::dto::channel::{Channel, CreateChannelRequest, UpdateChannelRequest};
use shared::dto::media::UploadMediaResponse;

/// Read-only analytics provider contract.
///
/// This trait allows for dependency injection and mocking in tests. The
/// production implementation is [`crate::services::api::ApiClient`]; demo mode
/// and tests use [`crate::services::mock::MockProvider`].
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch the headline analytics snapshot for a channel
    async fn get_analytics(&self, channel_id: i64) -> Result<AnalyticsOverview, String>;

    /// Fetch the best-performing posts for a channel
    async fn get_top_posts(
        &self,
        channel_id: i64,
        query: AnalyticsQuery,
    ) -> Result<Vec<TopPost>, String>;

    /// Fetch aggregated engagement metrics for a channel
    async fn get_engagement_metrics(
        &self,
        channel_id: i64,
        query: AnalyticsQuery,
    ) -> Result<EngagementMetrics, String>;

    /// Fetch AI content recommendations for a channel
    async fn get_recommendations(&self, channel_id: i64) -> Result<Vec<Recommendation>, String>;

    /// Cheap reachability probe against the backend health endpoint
    async fn is_available(&self) -> bool;
}

/// Trait for the non-analytics API surface.
///
/// This trait allows for dependency injection and mocking in tests.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Exchange Telegram Mini App init data for a session token
    async fn create_session(&self, init_data: String) -> Result<SessionResponse, String>;

    /// Install (or clear, with `None`) the bearer token used by every
    /// authenticated request that follows
    fn set_session_token(&self, token: Option<String>);

    /// List the authenticated user's channels
    async fn list_channels(&self) -> Result<Vec<Channel>, String>;

    /// Register a new channel
    async fn create_channel(&self, request: CreateChannelRequest) -> Result<Channel, String>;

    /// Update an existing channel
    async fn update_channel(
        &self,
        channel_id: i64,
        request: UpdateChannelRequest,
    ) -> Result<Channel, String>;

    /// Delete a channel by id
    async fn delete_channel(&self, channel_id: i64) -> Result<(), String>;

    /// Fetch the aggregate query statistics summary
    async fn get_query_stats(&self) -> Result<QueryStatsSummary, String>;

    /// Fetch the slow-query report with the given filters
    async fn get_slow_queries(&self, filters: SlowQueryFilters) -> Result<Vec<SlowQuery>, String>;

    /// Reset the collected query statistics
    async fn reset_query_stats(&self) -> Result<StatusResponse, String>;

    /// Fetch per-table bloat statistics
    async fn get_table_stats(&self) -> Result<Vec<TableStats>, String>;

    /// Run VACUUM (optionally FULL) on one table
    async fn run_vacuum(&self, request: VacuumRequest) -> Result<VacuumOutcome, String>;

    /// Upload a media file, reporting cumulative bytes sent on `progress`
    async fn upload_media(
        &self,
        file_name: String,
        data: Vec<u8>,
        progress: async_channel::Sender<u64>,
    ) -> Result<UploadMediaResponse, String>;
}
