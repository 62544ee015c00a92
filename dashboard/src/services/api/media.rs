//! # Media Upload Endpoint
//!
//! Streams file bytes to the backend while reporting cumulative progress
//! through an `async_channel` so the app can update its pending-upload
//! records without waiting for the request to finish.

use super::client::ApiClient;
use futures_util::StreamExt;
use shared::dto::auth::ErrorResponse;
use shared::dto::media::UploadMediaResponse;

/// Upload body chunk size; one progress event is emitted per chunk
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Upload a media file, reporting cumulative bytes sent on `progress`.
#[tracing::instrument(skip(client, data, progress), fields(file_name = %file_name, total_bytes = data.len()))]
pub async fn upload_media(
    client: &ApiClient,
    file_name: String,
    data: Vec<u8>,
    progress: async_channel::Sender<u64>,
) -> Result<UploadMediaResponse, String> {
    let total_bytes = data.len() as u64;
    let start = std::time::Instant::now();

    tracing::info!("Starting media upload");

    let chunks: Vec<Vec<u8>> = data
        .chunks(UPLOAD_CHUNK_BYTES)
        .map(|chunk| chunk.to_vec())
        .collect();

    let mut sent: u64 = 0;
    let body_stream = futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        // Receiver may already be gone if the app dropped the upload record
        let _ = progress.try_send(sent);
        Ok::<Vec<u8>, std::io::Error>(chunk)
    });

    let response = client
        .authorize(client.http.post(client.url("/api/media")))
        .query(&[("file_name", file_name.as_str())])
        .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
        .header(reqwest::header::CONTENT_LENGTH, total_bytes)
        // Large uploads cannot fit the default client timeout
        .timeout(std::time::Duration::from_secs(300))
        .body(reqwest::Body::wrap_stream(body_stream))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Upload network error");
            format!("Network error: {}", e)
        })?;

    let status = response.status();
    let duration = start.elapsed();

    if status.is_success() {
        let result = response.json::<UploadMediaResponse>().await.map_err(|e| {
            tracing::error!(error = %e, "Upload response parse error");
            format!("Failed to parse response: {}", e)
        });

        if result.is_ok() {
            tracing::info!(
                duration_ms = duration.as_millis(),
                total_bytes,
                "Media upload completed"
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
            "Media upload rejected"
        );
        Err(error.error)
    }
}
