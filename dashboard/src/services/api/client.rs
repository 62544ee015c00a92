//! # API Client
//!
//! Main HTTP client for backend API communication.

use crate::core::service::{ApiService, DataProvider};
use parking_lot::RwLock;
use reqwest::Client;

/// Default base URL for the backend API server
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3001";

/// HTTP client for communicating with the backend API server.
///
/// This client handles all REST API calls and maintains a connection pool
/// for efficient HTTP/2 multiplexing. The session token is stored on the
/// client so the [`DataProvider`] contract stays free of auth plumbing.
pub struct ApiClient {
    pub(crate) http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a new API client against the default local backend.
    ///
    /// The client is configured with a 10 second timeout to prevent freezing.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a new API client against a specific backend base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        // 10 second timeout so a dead backend cannot stall the app
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Install or clear the bearer token attached to subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    /// Build a full URL for an API path (path must start with '/').
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token to a request if a session is active.
    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().as_deref() {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

// Implement DataProvider trait for ApiClient
#[async_trait::async_trait]
impl DataProvider for ApiClient {
    async fn get_analytics(
        &self,
        channel_id: i64,
    ) -> Result<shared::dto::analytics::AnalyticsOverview, String> {
        crate::services::api::analytics::get_analytics(self, channel_id).await
    }

    async fn get_top_posts(
        &self,
        channel_id: i64,
        query: shared::dto::analytics::AnalyticsQuery,
    ) -> Result<Vec<shared::dto::analytics::TopPost>, String> {
        crate::services::api::analytics::get_top_posts(self, channel_id, query).await
    }

    async fn get_engagement_metrics(
        &self,
        channel_id: i64,
        query: shared::dto::analytics::AnalyticsQuery,
    ) -> Result<shared::dto::analytics::EngagementMetrics, String> {
        crate::services::api::analytics::get_engagement_metrics(self, channel_id, query).await
    }

    async fn get_recommendations(
        &self,
        channel_id: i64,
    ) -> Result<Vec<shared::dto::analytics::Recommendation>, String> {
        crate::services::api::analytics::get_recommendations(self, channel_id).await
    }

    async fn is_available(&self) -> bool {
        crate::services::api::analytics::health_check(self).await
    }
}

// Implement ApiService trait for ApiClient
#[async_trait::async_trait]
impl ApiService for ApiClient {
    async fn create_session(
        &self,
        init_data: String,
    ) -> Result<shared::dto::auth::SessionResponse, String> {
        crate::services::api::auth::create_session(self, init_data).await
    }

    fn set_session_token(&self, token: Option<String>) {
        self.set_token(token);
    }

    async fn list_channels(&self) -> Result<Vec<shared::dto::channel::Channel>, String> {
        crate::services::api::channels::list_channels(self).await
    }

    async fn create_channel(
        &self,
        request: shared::dto::channel::CreateChannelRequest,
    ) -> Result<shared::dto::channel::Channel, String> {
        crate::services::api::channels::create_channel(self, request).await
    }

    async fn update_channel(
        &self,
        channel_id: i64,
        request: shared::dto::channel::UpdateChannelRequest,
    ) -> Result<shared::dto::channel::Channel, String> {
        crate::services::api::channels::update_channel(self, channel_id, request).await
    }

    async fn delete_channel(&self, channel_id: i64) -> Result<(), String> {
        crate::services::api::channels::delete_channel(self, channel_id).await
    }

    async fn get_query_stats(&self) -> Result<shared::dto::admin::QueryStatsSummary, String> {
        crate::services::api::admin::get_query_stats(self).await
    }

    async fn get_slow_queries(
        &self,
        filters: shared::dto::admin::SlowQueryFilters,
    ) -> Result<Vec<shared::dto::admin::SlowQuery>, String> {
        crate::services::api::admin::get_slow_queries(self, filters).await
    }

    async fn reset_query_stats(&self) -> Result<shared::dto::auth::StatusResponse, String> {
        crate::services::api::admin::reset_query_stats(self).await
    }

    async fn get_table_stats(&self) -> Result<Vec<shared::dto::admin::TableStats>, String> {
        crate::services::api::admin::get_table_stats(self).await
    }

    async fn run_vacuum(
        &self,
        request: shared::dto::admin::VacuumRequest,
    ) -> Result<shared::dto::admin::VacuumOutcome, String> {
        crate::services::api::admin::run_vacuum(self, request).await
    }

    async fn upload_media(
        &self,
        file_name: String,
        data: Vec<u8>,
        progress: async_channel::Sender<u64>,
    ) -> Result<shared::dto::media::UploadMediaResponse, String> {
        crate::services::api::media::upload_media(self, file_name, data, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slashes_trimmed() {
        let client = ApiClient::with_base_url("http://localhost:3001///");
        assert_eq!(
            client.url("/api/channels"),
            "http://localhost:3001/api/channels"
        );
    }

    #[test]
    fn test_token_install_and_clear() {
        let client = ApiClient::new();
        assert!(!client.has_token());

        client.set_token(Some("abc".to_string()));
        assert!(client.has_token());

        client.set_token(None);
        assert!(!client.has_token());
    }
}
