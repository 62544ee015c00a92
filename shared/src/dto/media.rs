use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response returned by the backend once an upload is stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadMediaResponse {
    pub media_id: String,
    pub url: String,
}

/// Lifecycle of a client-side upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Queued,
    Uploading,
    Completed,
    Failed(String),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed(_))
    }
}

/// Transient record tracking one in-flight media upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingMedia {
    pub id: Uuid,
    pub file_name: String,
    pub total_bytes: u64,
    pub uploaded_bytes: u64,
    pub status: UploadStatus,
}

impl PendingMedia {
    pub fn new(file_name: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            total_bytes,
            uploaded_bytes: 0,
            status: UploadStatus::Queued,
        }
    }

    /// Upload progress as a fraction in 0.0..=1.0
    pub fn progress(&self) -> f64 {
        if self.total_bytes == 0 {
            return if self.status == UploadStatus::Completed {
                1.0
            } else {
                0.0
            };
        }
        (self.uploaded_bytes as f64 / self.total_bytes as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        let mut media = PendingMedia::new("banner.png", 1000);
        assert_eq!(media.progress(), 0.0);

        media.uploaded_bytes = 250;
        assert!((media.progress() - 0.25).abs() < 1e-9);

        // Progress never exceeds 1.0 even if counters drift
        media.uploaded_bytes = 1500;
        assert_eq!(media.progress(), 1.0);
    }

    #[test]
    fn test_progress_zero_length_file() {
        let mut media = PendingMedia::new("empty.txt", 0);
        assert_eq!(media.progress(), 0.0);

        media.status = UploadStatus::Completed;
        assert_eq!(media.progress(), 1.0);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!UploadStatus::Queued.is_terminal());
        assert!(!UploadStatus::Uploading.is_terminal());
        assert!(UploadStatus::Completed.is_terminal());
        assert!(UploadStatus::Failed("disk full".to_string()).is_terminal());
    }
}
