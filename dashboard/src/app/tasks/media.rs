//! # Media Upload Tasks
//!
//! Streaming media uploads with progress reporting. The API layer reports
//! cumulative bytes on a plain channel; a small forwarder task turns those
//! into [`AppEvent::UploadProgress`] so progress flows through the same event
//! loop as everything else.

use crate::app::events::AppEvent;
use crate::app::state::AppState;
use async_channel::Sender;
use parking_lot::RwLock;
use shared::dto::media::PendingMedia;
use std::sync::Arc;
use tokio::spawn;
use tracing::info;

/// Start uploading `data` as `file_name`, tracking it in the uploads list.
///
/// Returns the tracking id of the new upload.
pub(crate) fn start_upload(
    state: Arc<RwLock<AppState>>,
    event_tx: Sender<AppEvent>,
    file_name: String,
    data: Vec<u8>,
) -> uuid::Uuid {
    let media = PendingMedia::new(&file_name, data.len() as u64);
    let id = media.id;

    let api = {
        let mut state = state.write();
        state.uploads.pending.push(media);
        state.services.api.clone()
    };

    info!(upload_id = %id, file_name = %file_name, bytes = data.len(), "Upload started");

    let (progress_tx, progress_rx) = async_channel::unbounded::<u64>();

    // Forward raw byte counts into the event loop. Ends when the uploader
    // drops its sender.
    let progress_events = event_tx.clone();
    spawn(async move {
        while let Ok(uploaded_bytes) = progress_rx.recv().await {
            let _ = progress_events
                .send(AppEvent::UploadProgress { id, uploaded_bytes })
                .await;
        }
    });

    spawn(async move {
        let result = api.upload_media(file_name, data, progress_tx).await;
        let _ = event_tx.send(AppEvent::UploadFinished { id, result }).await;
    });

    id
}
