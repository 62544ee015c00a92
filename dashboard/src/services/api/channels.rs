//! # Channel Endpoints
//!
//! CRUD operations for the authenticated user's channels.

use super::client::ApiClient;
use shared::dto::auth::ErrorResponse;
use shared::dto::channel::{Channel, CreateChannelRequest, UpdateChannelRequest};

/// List the authenticated user's channels.
#[tracing::instrument(skip(client))]
pub async fn list_channels(client: &ApiClient) -> Result<Vec<Channel>, String> {
    let start = std::time::Instant::now();
    let url = client.url("/api/channels");

    tracing::debug!("Fetching channel list");

    let response = client
        .authorize(client.http.get(&url))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Channel list network error");
            format!("Network error: {}", e)
        })?;

    let duration = start.elapsed();

    if response.status().is_success() {
        let result = response.json::<Vec<Channel>>().await.map_err(|e| {
            tracing::error!(error = %e, "Channel list parse error");
            format!("Failed to parse response: {}", e)
        });

        if let Ok(ref channels) = result {
            tracing::debug!(
                duration_ms = duration.as_millis(),
                channel_count = channels.len(),
                "Channel list fetched"
            );
        }
        result
    } else {
        let status = response.status();
        tracing::warn!(
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "Channel list fetch failed"
        );
        Err(format!("Failed to fetch channels: {}", status))
    }
}

/// Register a new channel.
#[tracing::instrument(skip(client, request), fields(username = %request.username))]
pub async fn create_channel(
    client: &ApiClient,
    request: CreateChannelRequest,
) -> Result<Channel, String> {
    let response = client
        .authorize(client.http.post(client.url("/api/channels")))
        .json(&request)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Channel>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let error = response
            .json::<ErrorResponse>()
            .await
            .map_err(|e| format!("Failed to parse error: {}", e))?;
        Err(error.error)
    }
}

/// Update an existing channel.
pub async fn update_channel(
    client: &ApiClient,
    channel_id: i64,
    request: UpdateChannelRequest,
) -> Result<Channel, String> {
    let url = client.url(&format!("/api/channels/{}", channel_id));

    let response = client
        .authorize(client.http.patch(&url))
        .json(&request)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Channel>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let error = response
            .json::<ErrorResponse>()
            .await
            .map_err(|e| format!("Failed to parse error: {}", e))?;
        Err(error.error)
    }
}

/// Delete a channel by id.
pub async fn delete_channel(client: &ApiClient, channel_id: i64) -> Result<(), String> {
    let url = client.url(&format!("/api/channels/{}", channel_id));

    let response = client
        .authorize(client.http.delete(&url))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        Ok(())
    } else {
        let error = response
            .json::<ErrorResponse>()
            .await
            .map_err(|e| format!("Failed to parse error: {}", e))?;
        Err(error.error)
    }
}
