use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregation window for engagement metrics and top-post queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricsPeriod {
    Day,
    #[default]
    Week,
    Month,
}

impl MetricsPeriod {
    /// Query-string value expected by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsPeriod::Day => "day",
            MetricsPeriod::Week => "week",
            MetricsPeriod::Month => "month",
        }
    }
}

/// Query options for parameterized analytics endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub period: MetricsPeriod,
    pub limit: u32,
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self {
            period: MetricsPeriod::Week,
            limit: 10,
        }
    }
}

/// Headline analytics snapshot for one channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsOverview {
    pub channel_id: i64,
    pub subscriber_count: i64,
    /// Net subscriber change over the trailing 24 hours
    pub subscriber_delta_24h: i64,
    pub views_24h: i64,
    pub posts_week: i64,
    pub average_reach: f64,
    pub engagement_rate: f64,
    pub captured_at: DateTime<Utc>,
}

/// Aggregated engagement metrics over a period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngagementMetrics {
    pub channel_id: i64,
    pub period: MetricsPeriod,
    pub views: i64,
    pub reactions: i64,
    pub forwards: i64,
    pub replies: i64,
    pub engagement_rate: f64,
}

/// One row of the best-performing-posts list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopPost {
    pub message_id: i64,
    pub channel_id: i64,
    /// First ~100 characters of the post text
    pub preview: String,
    pub published_at: DateTime<Utc>,
    pub views: i64,
    pub forwards: i64,
    pub reactions: i64,
    pub engagement_rate: f64,
}

/// AI-generated content suggestion for a channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub kind: String,
    pub message: String,
    /// Model confidence in 0.0..=1.0
    pub score: f64,
}
