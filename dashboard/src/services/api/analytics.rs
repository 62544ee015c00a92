//! # Analytics Endpoints
//!
//! Read-only analytics queries backing the [`crate::core::service::DataProvider`]
//! contract. Every function issues exactly one request; retry and caching are
//! the app layer's job.

use super::client::ApiClient;
use shared::dto::analytics::{
    AnalyticsOverview, AnalyticsQuery, EngagementMetrics, Recommendation, TopPost,
};

/// Fetch the headline analytics snapshot for a channel.
#[tracing::instrument(skip(client), fields(channel_id = channel_id))]
pub async fn get_analytics(
    client: &ApiClient,
    channel_id: i64,
) -> Result<AnalyticsOverview, String> {
    let start = std::time::Instant::now();
    let url = client.url(&format!("/api/channels/{}/analytics", channel_id));

    tracing::debug!("Fetching analytics overview");

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Analytics fetch network error");
            format!("Network error: {}", e)
        })?;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_success() {
        let result = response.json::<AnalyticsOverview>().await.map_err(|e| {
            tracing::error!(error = %e, "Analytics response parse error");
            format!("Failed to parse response: {}", e)
        });

        if result.is_ok() {
            tracing::debug!(
                duration_ms = duration.as_millis(),
                "Analytics overview fetched"
            );
        }
        result
    } else {
        tracing::warn!(
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Analytics fetch failed"
        );
        Err(format!("Failed to fetch analytics: {}", status))
    }
}

/// Fetch the best-performing posts for a channel.
#[tracing::instrument(skip(client), fields(channel_id = channel_id, period = query.period.as_str()))]
pub async fn get_top_posts(
    client: &ApiClient,
    channel_id: i64,
    query: AnalyticsQuery,
) -> Result<Vec<TopPost>, String> {
    let url = client.url(&format!(
        "/api/channels/{}/top-posts?period={}&limit={}",
        channel_id,
        query.period.as_str(),
        query.limit
    ));

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Vec<TopPost>>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!("Failed to fetch top posts: {}", response.status()))
    }
}

/// Fetch aggregated engagement metrics for a channel.
#[tracing::instrument(skip(client), fields(channel_id = channel_id, period = query.period.as_str()))]
pub async fn get_engagement_metrics(
    client: &ApiClient,
    channel_id: i64,
    query: AnalyticsQuery,
) -> Result<EngagementMetrics, String> {
    let url = client.url(&format!(
        "/api/channels/{}/engagement?period={}",
        channel_id,
        query.period.as_str()
    ));

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<EngagementMetrics>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!(
            "Failed to fetch engagement metrics: {}",
            response.status()
        ))
    }
}

/// Fetch AI content recommendations for a channel.
pub async fn get_recommendations(
    client: &ApiClient,
    channel_id: i64,
) -> Result<Vec<Recommendation>, String> {
    let url = client.url(&format!("/api/channels/{}/recommendations", channel_id));

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Vec<Recommendation>>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(format!(
            "Failed to fetch recommendations: {}",
            response.status()
        ))
    }
}

/// Probe the backend health endpoint. Any 2xx counts as available.
pub async fn health_check(client: &ApiClient) -> bool {
    let url = client.url("/api/health");

    match client.http.get(&url).send().await {
        Ok(response) => {
            let available = response.status().is_success();
            tracing::debug!(available, "Health check completed");
            available
        }
        Err(e) => {
            tracing::debug!(error = %e, "Health check failed");
            false
        }
    }
}
