//! # Mock Backend
//!
//! In-process implementation of [`DataProvider`] and [`ApiService`] used for
//! demo mode and tests. Demo data is generated from a fixed seed so repeated
//! runs look alike; tests can additionally inject latency, force failures,
//! and read per-operation call counts.

use crate::core::service::{ApiService, DataProvider};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::dto::admin::{
    QueryStatsSummary, SlowQuery, SlowQueryFilters, TableStats, VacuumOutcome, VacuumRequest,
};
use shared::dto::analytics::{
    AnalyticsOverview, AnalyticsQuery, EngagementMetrics, Recommendation, TopPost,
};
use shared::dto::auth::{SessionResponse, StatusResponse, UserInfo};
use shared::dto::channel::{Channel, CreateChannelRequest, UpdateChannelRequest};
use shared::dto::media::UploadMediaResponse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

/// Mock backend holding its own channel table and knobs for tests.
pub struct MockProvider {
    seed: u64,
    user: RwLock<UserInfo>,
    channels: RwLock<Vec<Channel>>,
    tables: RwLock<Vec<TableStats>>,
    next_channel_id: AtomicI64,
    latency: RwLock<Duration>,
    failure: RwLock<Option<String>>,
    available: AtomicBool,
    session_token: RwLock<Option<String>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_seed(0xC0FFEE)
    }

    pub fn with_seed(seed: u64) -> Self {
        let channels = vec![
            Channel {
                id: 1,
                name: "Daily Digest".to_string(),
                username: "dailydigest".to_string(),
                telegram_id: -1001000000001,
                subscriber_count: 12_400,
            },
            Channel {
                id: 2,
                name: "Tech Brief".to_string(),
                username: "techbrief".to_string(),
                telegram_id: -1001000000002,
                subscriber_count: 3_180,
            },
        ];

        Self {
            seed,
            user: RwLock::new(UserInfo {
                id: 1,
                username: "demo".to_string(),
                display_name: Some("Demo User".to_string()),
            }),
            channels: RwLock::new(channels),
            tables: RwLock::new(Self::default_tables()),
            next_channel_id: AtomicI64::new(3),
            latency: RwLock::new(Duration::ZERO),
            failure: RwLock::new(None),
            available: AtomicBool::new(true),
            session_token: RwLock::new(None),
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn default_tables() -> Vec<TableStats> {
        vec![
            TableStats {
                schema: "public".to_string(),
                table: "posts".to_string(),
                live_tuples: 184_000,
                dead_tuples: 23_500,
                last_vacuum: None,
                last_autovacuum: None,
                size_bytes: 96 * 1024 * 1024,
            },
            TableStats {
                schema: "public".to_string(),
                table: "subscriber_events".to_string(),
                live_tuples: 2_410_000,
                dead_tuples: 410_000,
                last_vacuum: None,
                last_autovacuum: None,
                size_bytes: 512 * 1024 * 1024,
            },
            TableStats {
                schema: "public".to_string(),
                table: "channels".to_string(),
                live_tuples: 1_800,
                dead_tuples: 40,
                last_vacuum: None,
                last_autovacuum: None,
                size_bytes: 2 * 1024 * 1024,
            },
        ]
    }

    // ========== Test knobs ==========

    /// Identity returned by `create_session`.
    pub fn set_user(&self, user: UserInfo) {
        *self.user.write() = user;
    }

    /// Artificial delay applied to every operation.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Make every subsequent operation fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_channels(&self, channels: Vec<Channel>) {
        let max_id = channels.iter().map(|c| c.id).max().unwrap_or(0);
        self.next_channel_id.store(max_id + 1, Ordering::SeqCst);
        *self.channels.write() = channels;
    }

    pub fn set_tables(&self, tables: Vec<TableStats>) {
        *self.tables.write() = tables;
    }

    /// How many times `op` was invoked (by the names recorded internally,
    /// e.g. "list_channels", "get_analytics", "run_vacuum").
    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    /// Token last installed via [`ApiService::set_session_token`].
    pub fn session_token(&self) -> Option<String> {
        self.session_token.read().clone()
    }

    // ========== Internals ==========

    fn record(&self, op: &'static str) {
        *self.calls.lock().entry(op).or_insert(0) += 1;
    }

    /// Common prelude: count the call, apply latency, honor forced failure.
    async fn route(&self, op: &'static str) -> Result<(), String> {
        self.record(op);

        let latency = *self.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let failure = self.failure.read().clone();
        if let Some(message) = failure {
            return Err(message);
        }
        Ok(())
    }

    fn rng_for(&self, channel_id: i64, salt: u64) -> StdRng {
        StdRng::seed_from_u64(
            self.seed ^ (channel_id as u64).wrapping_mul(0x9E37_79B9) ^ salt,
        )
    }

    fn channel_subscribers(&self, channel_id: i64) -> i64 {
        self.channels
            .read()
            .iter()
            .find(|c| c.id == channel_id)
            .map(|c| c.subscriber_count)
            .unwrap_or(5_000)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataProvider for MockProvider {
    async fn get_analytics(&self, channel_id: i64) -> Result<AnalyticsOverview, String> {
        self.route("get_analytics").await?;

        let mut rng = self.rng_for(channel_id, 1);
        let subscribers = self.channel_subscribers(channel_id);
        Ok(AnalyticsOverview {
            channel_id,
            subscriber_count: subscribers,
            subscriber_delta_24h: rng.random_range(-40..120),
            views_24h: rng.random_range(500..50_000),
            posts_week: rng.random_range(3..25),
            average_reach: rng.random_range(0.2..0.9) * subscribers as f64,
            engagement_rate: rng.random_range(0.01..0.12),
            captured_at: Utc::now(),
        })
    }

    async fn get_top_posts(
        &self,
        channel_id: i64,
        query: AnalyticsQuery,
    ) -> Result<Vec<TopPost>, String> {
        self.route("get_top_posts").await?;

        let mut rng = self.rng_for(channel_id, 2);
        let posts = (0..query.limit as i64)
            .map(|i| {
                let views = rng.random_range(800..30_000);
                TopPost {
                    message_id: 1_000 + i,
                    channel_id,
                    preview: format!("Demo post #{} for channel {}", i + 1, channel_id),
                    published_at: Utc::now() - chrono::Duration::hours(rng.random_range(1..168)),
                    views,
                    forwards: rng.random_range(0..views / 20),
                    reactions: rng.random_range(0..views / 10),
                    engagement_rate: rng.random_range(0.01..0.2),
                }
            })
            .collect();
        Ok(posts)
    }

    async fn get_engagement_metrics(
        &self,
        channel_id: i64,
        query: AnalyticsQuery,
    ) -> Result<EngagementMetrics, String> {
        self.route("get_engagement_metrics").await?;

        let mut rng = self.rng_for(channel_id, 3);
        let views = rng.random_range(5_000..200_000);
        Ok(EngagementMetrics {
            channel_id,
            period: query.period,
            views,
            reactions: rng.random_range(0..views / 8),
            forwards: rng.random_range(0..views / 25),
            replies: rng.random_range(0..views / 40),
            engagement_rate: rng.random_range(0.01..0.15),
        })
    }

    async fn get_recommendations(&self, channel_id: i64) -> Result<Vec<Recommendation>, String> {
        self.route("get_recommendations").await?;

        let mut rng = self.rng_for(channel_id, 4);
        Ok(vec![
            Recommendation {
                id: 1,
                kind: "posting_time".to_string(),
                message: "Your audience is most active between 18:00 and 21:00. Schedule posts in that window.".to_string(),
                score: rng.random_range(0.6..0.95),
            },
            Recommendation {
                id: 2,
                kind: "content_mix".to_string(),
                message: "Posts with media get roughly twice the forwards of text-only posts.".to_string(),
                score: rng.random_range(0.5..0.9),
            },
            Recommendation {
                id: 3,
                kind: "cadence".to_string(),
                message: "Channels of your size posting daily grow 1.4x faster than weekly posters.".to_string(),
                score: rng.random_range(0.4..0.8),
            },
        ])
    }

    async fn is_available(&self) -> bool {
        self.record("is_available");
        self.available.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiService for MockProvider {
    async fn create_session(&self, _init_data: String) -> Result<SessionResponse, String> {
        self.route("create_session").await?;
        Ok(SessionResponse {
            token: "mock-session-token".to_string(),
            user: self.user.read().clone(),
        })
    }

    fn set_session_token(&self, token: Option<String>) {
        *self.session_token.write() = token;
    }

    async fn list_channels(&self) -> Result<Vec<Channel>, String> {
        self.route("list_channels").await?;
        Ok(self.channels.read().clone())
    }

    async fn create_channel(&self, request: CreateChannelRequest) -> Result<Channel, String> {
        self.route("create_channel").await?;

        let mut channels = self.channels.write();
        if channels.iter().any(|c| c.username == request.username) {
            return Err(format!(
                "Channel @{} is already registered",
                request.username
            ));
        }

        let channel = Channel {
            id: self.next_channel_id.fetch_add(1, Ordering::SeqCst),
            name: request.name,
            username: request.username,
            telegram_id: request.telegram_id,
            subscriber_count: 0,
        };
        channels.push(channel.clone());
        Ok(channel)
    }

    async fn update_channel(
        &self,
        channel_id: i64,
        request: UpdateChannelRequest,
    ) -> Result<Channel, String> {
        self.route("update_channel").await?;

        let mut channels = self.channels.write();
        let channel = channels
            .iter_mut()
            .find(|c| c.id == channel_id)
            .ok_or_else(|| "Channel not found".to_string())?;

        if let Some(name) = request.name {
            channel.name = name;
        }
        if let Some(username) = request.username {
            channel.username = username;
        }
        Ok(channel.clone())
    }

    async fn delete_channel(&self, channel_id: i64) -> Result<(), String> {
        self.route("delete_channel").await?;

        let mut channels = self.channels.write();
        let before = channels.len();
        channels.retain(|c| c.id != channel_id);
        if channels.len() == before {
            return Err("Channel not found".to_string());
        }
        Ok(())
    }

    async fn get_query_stats(&self) -> Result<QueryStatsSummary, String> {
        self.route("get_query_stats").await?;

        let mut rng = StdRng::seed_from_u64(self.seed ^ 0xDB);
        let total_queries = rng.random_range(50_000..2_000_000);
        let mean = rng.random_range(0.4..8.0);
        Ok(QueryStatsSummary {
            total_queries,
            total_exec_ms: total_queries as f64 * mean,
            mean_exec_ms: mean,
            cache_hit_ratio: rng.random_range(0.86..0.999),
            captured_at: Utc::now(),
        })
    }

    async fn get_slow_queries(&self, filters: SlowQueryFilters) -> Result<Vec<SlowQuery>, String> {
        self.route("get_slow_queries").await?;

        let candidates = vec![
            SlowQuery {
                query: "SELECT * FROM subscriber_events WHERE channel_id = $1 ORDER BY at DESC"
                    .to_string(),
                calls: 48_210,
                total_ms: 1_927_000.0,
                mean_ms: 39.9,
                max_ms: 2_410.0,
                rows: 12_400_000,
            },
            SlowQuery {
                query: "SELECT count(*) FROM posts WHERE published_at > $1".to_string(),
                calls: 9_310,
                total_ms: 214_000.0,
                mean_ms: 22.9,
                max_ms: 512.0,
                rows: 9_310,
            },
            SlowQuery {
                query: "UPDATE channels SET subscriber_count = $2 WHERE id = $1".to_string(),
                calls: 310_000,
                total_ms: 341_000.0,
                mean_ms: 1.1,
                max_ms: 45.0,
                rows: 310_000,
            },
        ];

        Ok(candidates
            .into_iter()
            .filter(|q| q.mean_ms >= filters.min_mean_ms && q.calls >= filters.min_calls)
            .take(filters.limit as usize)
            .collect())
    }

    async fn reset_query_stats(&self) -> Result<StatusResponse, String> {
        self.route("reset_query_stats").await?;
        Ok(StatusResponse {
            status: "ok".to_string(),
            message: Some("Query statistics reset".to_string()),
        })
    }

    async fn get_table_stats(&self) -> Result<Vec<TableStats>, String> {
        self.route("get_table_stats").await?;
        Ok(self.tables.read().clone())
    }

    async fn run_vacuum(&self, request: VacuumRequest) -> Result<VacuumOutcome, String> {
        self.route("run_vacuum").await?;

        let mut tables = self.tables.write();
        let table = tables
            .iter_mut()
            .find(|t| t.table == request.table)
            .ok_or_else(|| format!("Unknown table: {}", request.table))?;

        let dead_before = table.dead_tuples;
        table.dead_tuples = 0;
        table.last_vacuum = Some(Utc::now());

        Ok(VacuumOutcome {
            table: request.table,
            full: request.full,
            duration_ms: 40 + dead_before / 100,
            dead_tuples_before: dead_before,
            dead_tuples_after: 0,
        })
    }

    async fn upload_media(
        &self,
        _file_name: String,
        data: Vec<u8>,
        progress: async_channel::Sender<u64>,
    ) -> Result<UploadMediaResponse, String> {
        self.route("upload_media").await?;

        // Report progress in quarters so the UI path gets exercised
        let total = data.len() as u64;
        for step in 1..=4u64 {
            let _ = progress.try_send(total * step / 4);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let media_id = uuid::Uuid::new_v4().to_string();
        Ok(UploadMediaResponse {
            url: format!("https://cdn.chanlytics.dev/media/{}", media_id),
            media_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Channel CRUD ==========

    #[tokio::test]
    async fn test_channel_crud_flow() {
        let mock = MockProvider::new();

        let created = mock
            .create_channel(CreateChannelRequest {
                name: "News".to_string(),
                username: "newsfeed".to_string(),
                telegram_id: -100123,
            })
            .await
            .unwrap();
        assert_eq!(created.subscriber_count, 0);

        let updated = mock
            .update_channel(
                created.id,
                UpdateChannelRequest {
                    name: Some("World News".to_string()),
                    username: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "World News");
        assert_eq!(updated.username, "newsfeed");

        mock.delete_channel(created.id).await.unwrap();
        let channels = mock.list_channels().await.unwrap();
        assert!(!channels.iter().any(|c| c.id == created.id));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let mock = MockProvider::new();
        let err = mock
            .create_channel(CreateChannelRequest {
                name: "Copycat".to_string(),
                username: "dailydigest".to_string(),
                telegram_id: -100999,
            })
            .await
            .unwrap_err();
        assert!(err.contains("already registered"));
    }

    // ========== Failure Injection And Counters ==========

    #[tokio::test]
    async fn test_forced_failure_and_recovery() {
        let mock = MockProvider::new();

        mock.fail_with("backend down");
        assert_eq!(
            mock.get_analytics(1).await.unwrap_err(),
            "backend down".to_string()
        );

        mock.clear_failure();
        assert!(mock.get_analytics(1).await.is_ok());
        assert_eq!(mock.call_count("get_analytics"), 2);
    }

    #[tokio::test]
    async fn test_availability_toggle() {
        let mock = MockProvider::new();
        assert!(mock.is_available().await);
        mock.set_available(false);
        assert!(!mock.is_available().await);
    }

    // ========== Demo Data ==========

    #[tokio::test]
    async fn test_top_posts_honor_limit() {
        let mock = MockProvider::new();
        let query = AnalyticsQuery {
            limit: 5,
            ..Default::default()
        };
        let posts = mock.get_top_posts(1, query).await.unwrap();
        assert_eq!(posts.len(), 5);
        assert!(posts.iter().all(|p| p.channel_id == 1));
    }

    #[tokio::test]
    async fn test_vacuum_clears_dead_tuples() {
        let mock = MockProvider::new();

        let before = mock.get_table_stats().await.unwrap();
        let target = before.iter().find(|t| t.table == "posts").unwrap();
        assert!(target.dead_tuples > 0);

        let outcome = mock
            .run_vacuum(VacuumRequest {
                table: "posts".to_string(),
                full: false,
            })
            .await
            .unwrap();
        assert_eq!(outcome.dead_tuples_after, 0);

        let after = mock.get_table_stats().await.unwrap();
        let target = after.iter().find(|t| t.table == "posts").unwrap();
        assert_eq!(target.dead_tuples, 0);
        assert!(target.last_vacuum.is_some());
    }

    #[tokio::test]
    async fn test_upload_reports_progress() {
        let mock = MockProvider::new();
        let (tx, rx) = async_channel::unbounded();

        let response = mock
            .upload_media("banner.png".to_string(), vec![0u8; 1000], tx)
            .await
            .unwrap();
        assert!(response.url.contains(&response.media_id));

        let mut last = 0;
        while let Ok(sent) = rx.try_recv() {
            assert!(sent >= last);
            last = sent;
        }
        assert_eq!(last, 1000);
    }
}
