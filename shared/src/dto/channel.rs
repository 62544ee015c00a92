use serde::{Deserialize, Serialize};

/// A Telegram channel registered by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    /// Public @username without the leading '@'
    pub username: String,
    /// Raw Telegram chat id (negative for channels/supergroups)
    pub telegram_id: i64,
    pub subscriber_count: i64,
}

/// Create channel request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateChannelRequest {
    pub name: String,
    pub username: String,
    pub telegram_id: i64,
}

/// Update channel request (all fields optional, only present ones change)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateChannelRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
