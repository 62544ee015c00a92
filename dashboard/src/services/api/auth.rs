//! # Session Endpoints
//!
//! Handles session establishment from Telegram Mini App init data.

use super::client::ApiClient;
use shared::dto::auth::{ErrorResponse, SessionRequest, SessionResponse};

/// Exchange Telegram init data for a session token.
#[tracing::instrument(skip(client, init_data))]
pub async fn create_session(
    client: &ApiClient,
    init_data: String,
) -> Result<SessionResponse, String> {
    tracing::info!("Establishing session");
    let start = std::time::Instant::now();

    let request = SessionRequest { init_data };

    let response = client
        .http
        .post(client.url("/api/auth/session"))
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Session network error");
            format!("Network error: {}", e)
        })?;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_success() {
        let result = response.json::<SessionResponse>().await.map_err(|e| {
            tracing::error!(error = %e, "Session response parse error");
            format!("Failed to parse response: {}", e)
        });

        if let Ok(ref session) = result {
            tracing::info!(
                user_id = session.user.id,
                duration_ms = duration.as_millis(),
                "Session established"
            );
        }
        result
    } else {
        let error = response
            .json::<ErrorResponse>()
            .await
            .map_err(|e| format!("Failed to parse error: {}", e))?;

        tracing::warn!(
            status = status.as_u16(),
            error = %error.error,
            duration_ms = duration.as_millis(),
            "Session request rejected"
        );
        Err(error.error)
    }
}
