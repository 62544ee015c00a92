//! # Application Core
//!
//! Central orchestrator for the dashboard: owns the shared state, the event
//! channel, and the tick loop that stitches them together.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Main Loop (App)                         │
//! │   actions ──► handlers ──► state mutation + task spawn      │
//! │   on_tick ──► drain events ──► event_handler ──► state      │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │ Arc<RwLock<AppState>>
//!                            │ async_channel<AppEvent>
//! ┌──────────────────────────┴──────────────────────────────────┐
//! │                      Async Tasks                            │
//! │   channel list (dedup + retry)   analytics fetches          │
//! │   real-time poller               monitor auto-refresh       │
//! │   media uploads                                             │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │ DataProvider / ApiService
//! ┌──────────────────────────┴──────────────────────────────────┐
//! │        ApiClient (HTTP)  /  MockProvider (demo, tests)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Components
//!
//! - **[`AppState`]**: All mutable state, behind `Arc<RwLock<...>>`
//! - **[`AppEvent`]**: Results flowing back from async tasks
//! - **handlers**: Synchronous action entry points (validate, mutate, spawn)
//! - **tasks**: Fetch/poll/upload machinery with tickets, dedup, and retry
//!
//! ## Event Flow
//!
//! 1. An action handler runs its guards under the state write lock and marks
//!    the affected [`crate::core::resource::Resource`] as loading, receiving
//!    a ticket.
//! 2. The spawned task performs the request without holding any lock.
//! 3. The task sends an [`AppEvent`] carrying the ticket and result.
//! 4. [`App::on_tick`] drains the channel and applies each event; completions
//!    whose ticket went stale are dropped.
//!
//! ## State Management Pattern
//!
//! Locks are held briefly and never across an await:
//!
//! ```rust,ignore
//! let (ticket, api) = {
//!     let mut state = state.write();
//!     if !state.channels.list.should_fetch(force) {
//!         return;
//!     }
//!     (state.channels.list.begin(), state.services.api.clone())
//! }; // Lock released here
//!
//! tokio::spawn(async move {
//!     let result = api.list_channels().await;
//!     let _ = event_tx.send(AppEvent::ChannelsResult { ticket, result }).await;
//! });
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dashboard::app::{App, Screen};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut app = App::new();
//!     app.handle_connect_click("telegram-init-data");
//!
//!     loop {
//!         app.on_tick();
//!         tokio::time::sleep(std::time::Duration::from_millis(250)).await;
//!     }
//! }
//! ```

pub mod event_handler;
pub mod events;
pub mod handlers;
pub mod state;
pub mod tasks;

pub use events::AppEvent;
pub use state::{
    AdminAction, AppState, ConfirmDialog, ConnectionStatus, Notification, NoticeLevel, Screen,
    Services, Session,
};

use crate::config::Config;
use crate::services::api::ApiClient;
use crate::services::mock::MockProvider;
use crate::services::storage::LocalStore;
use async_channel::{Receiver, Sender};
use event_handler::AppEventHandler;
use parking_lot::RwLock;
use shared::dto::admin::SlowQueryFilters;
use shared::dto::analytics::MetricsPeriod;
use shared::dto::auth::UserInfo;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Main application orchestrator.
///
/// Owns the state and both ends of the event channel. The sender side is
/// cloned into every spawned task; the receiver is drained by [`App::on_tick`]
/// on the main loop.
pub struct App {
    pub state: Arc<RwLock<AppState>>,
    event_rx: Receiver<AppEvent>,
    event_tx: Sender<AppEvent>,
}

impl App {
    /// Create the app with default configuration (HTTP client against the
    /// local backend, state file in the working directory).
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Create the app from a [`Config`].
    ///
    /// Demo mode swaps the HTTP client for the in-process mock. A pre-issued
    /// API token skips the init-data exchange entirely and starts the app
    /// authenticated.
    pub fn with_config(config: &Config) -> Self {
        let store = LocalStore::with_path(config.state_file.clone());
        let services = if config.demo {
            info!("Demo mode: using the in-process mock backend");
            let mock = Arc::new(MockProvider::new());
            Services::new(mock.clone(), mock, store)
        } else {
            let client = Arc::new(ApiClient::with_base_url(config.api_url.clone()));
            Services::new(client.clone(), client, store)
        };

        let app = Self::with_services(services);
        {
            let mut state = app.state.write();
            state.realtime.poll_interval = config.poll_interval;
            if let Some(init_data) = &config.init_data {
                state.init_data = init_data.clone();
            }
            if let Some(token) = &config.api_token {
                info!("Using pre-issued API token, skipping session exchange");
                state.services.api.set_session_token(Some(token.clone()));
                state.session = Some(Session {
                    token: token.clone(),
                    user: UserInfo {
                        id: 0,
                        username: "service".to_string(),
                        display_name: None,
                    },
                });
                state.current_screen = Screen::Overview;
            }
        }
        app
    }

    /// Create the app around externally constructed services.
    ///
    /// This is the dependency-injection seam used by tests and by demo mode.
    /// No tasks are spawned here; fetching starts with the first action.
    pub fn with_services(services: Services) -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        let state = Arc::new(RwLock::new(AppState::new(services)));
        info!("App initialized");
        Self {
            state,
            event_rx,
            event_tx,
        }
    }

    /// One main-loop iteration: apply every pending event, then make sure the
    /// background loops the current screen needs are alive.
    pub fn on_tick(&mut self) {
        let tick_start = Instant::now();
        let mut events_processed = 0u32;

        while let Ok(event) = self.event_rx.try_recv() {
            tracing::trace!(event = event.name(), "Processing event");
            self.handle_event_impl(event);
            events_processed += 1;
        }

        if events_processed > 0 {
            let elapsed = tick_start.elapsed();
            if elapsed.as_millis() > 5 {
                warn!(
                    events_processed,
                    processing_time_ms = elapsed.as_millis() as u64,
                    "Slow event batch"
                );
            } else {
                debug!(events_processed, "Processed events");
            }
        }

        self.ensure_background_loops();
    }

    /// Restart any background loop that should be running but is not
    /// (a poller that exited on error, a toggle flipped while off-screen).
    fn ensure_background_loops(&self) {
        let (need_poller, need_query_refresh, need_vacuum_refresh) = {
            let state = self.state.read();
            (
                state.current_screen == Screen::Overview
                    && state.channels.selected.is_some()
                    && !state.realtime.polling,
                state.current_screen == Screen::QueryStats
                    && state.admin.query.auto_refresh
                    && !state.admin.query.refresh_running,
                state.current_screen == Screen::Vacuum
                    && state.admin.vacuum.auto_refresh
                    && !state.admin.vacuum.refresh_running,
            )
        };

        if need_poller {
            tasks::realtime::ensure_poller(Arc::clone(&self.state), self.event_tx.clone());
        }
        if need_query_refresh {
            tasks::admin::ensure_query_refresh(Arc::clone(&self.state), self.event_tx.clone());
        }
        if need_vacuum_refresh {
            tasks::admin::ensure_vacuum_refresh(Arc::clone(&self.state), self.event_tx.clone());
        }
    }

    /// Events waiting in the channel (diagnostics)
    pub fn pending_events(&self) -> usize {
        self.event_rx.len()
    }

    /// Drain the notification feed for display
    pub fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.write().notifications)
    }

    // ========== Action Methods - Delegating to Handlers ==========

    pub fn handle_connect_click(&self, init_data: impl Into<String>) {
        handlers::session::handle_connect_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            init_data.into(),
        );
    }

    pub fn handle_disconnect_click(&self) {
        handlers::session::handle_disconnect_click(Arc::clone(&self.state));
    }

    pub fn check_availability(&self) {
        handlers::session::check_availability(Arc::clone(&self.state), self.event_tx.clone());
    }

    pub fn handle_screen_change(&self, screen: Screen) {
        handlers::navigation::handle_screen_change(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            screen,
        );
    }

    pub fn handle_select_channel(&self, channel_id: i64) {
        handlers::channels::handle_select_channel(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            channel_id,
        );
    }

    pub fn open_create_form(&self) {
        handlers::channels::open_create_form(Arc::clone(&self.state));
    }

    pub fn open_edit_form(&self, channel_id: i64) {
        handlers::channels::open_edit_form(Arc::clone(&self.state), channel_id);
    }

    pub fn handle_submit_channel_form(&self) {
        handlers::channels::handle_submit_channel_form(
            Arc::clone(&self.state),
            self.event_tx.clone(),
        );
    }

    pub fn handle_delete_channel(&self, channel_id: i64) {
        handlers::channels::handle_delete_channel(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            channel_id,
        );
    }

    pub fn handle_set_period(&self, period: MetricsPeriod) {
        handlers::analytics::handle_set_period(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            period,
        );
    }

    pub fn handle_set_post_limit(&self, limit: u32) {
        handlers::analytics::handle_set_post_limit(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            limit,
        );
    }

    /// Force-refresh all analytics for the selected channel
    pub fn refresh_analytics(&self) {
        tasks::analytics::refetch_all(Arc::clone(&self.state), self.event_tx.clone());
    }

    /// Force-refresh the channel list
    pub fn refresh_channels(&self) {
        tasks::channels::fetch_channels(Arc::clone(&self.state), self.event_tx.clone(), true);
    }

    /// Force-refresh both query monitor resources
    pub fn refresh_query_monitor(&self) {
        tasks::admin::fetch_query_stats(Arc::clone(&self.state), self.event_tx.clone(), true);
        tasks::admin::fetch_slow_queries(Arc::clone(&self.state), self.event_tx.clone(), true);
    }

    /// Force-refresh the table statistics
    pub fn refresh_table_stats(&self) {
        tasks::admin::fetch_table_stats(Arc::clone(&self.state), self.event_tx.clone(), true);
    }

    pub fn handle_set_slow_query_filters(&self, filters: SlowQueryFilters) {
        handlers::admin::handle_set_slow_query_filters(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            filters,
        );
    }

    pub fn handle_toggle_query_auto_refresh(&self) {
        handlers::admin::handle_toggle_query_auto_refresh(
            Arc::clone(&self.state),
            self.event_tx.clone(),
        );
    }

    pub fn handle_toggle_vacuum_auto_refresh(&self) {
        handlers::admin::handle_toggle_vacuum_auto_refresh(
            Arc::clone(&self.state),
            self.event_tx.clone(),
        );
    }

    /// Request a destructive admin action; opens the confirmation dialog
    pub fn request_admin_action(&self, action: AdminAction) {
        handlers::admin::handle_request_action(Arc::clone(&self.state), action);
    }

    pub fn handle_confirm_dialog(&self) {
        handlers::admin::handle_confirm_dialog(Arc::clone(&self.state), self.event_tx.clone());
    }

    pub fn handle_cancel_dialog(&self) {
        handlers::admin::handle_cancel_dialog(Arc::clone(&self.state));
    }

    /// Start a media upload; returns the tracking id
    pub fn upload_media(&self, file_name: impl Into<String>, data: Vec<u8>) -> Uuid {
        tasks::media::start_upload(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            file_name.into(),
            data,
        )
    }

    pub fn clear_finished_uploads(&self) {
        self.state.write().uploads.clear_finished();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::dto::media::UploadStatus;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    static NEXT_USER: AtomicI64 = AtomicI64::new(1000);

    fn unique_user() -> i64 {
        NEXT_USER.fetch_add(1, Ordering::SeqCst)
    }

    fn temp_store_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("dashboard-app-test-{}.json", Uuid::new_v4()))
    }

    fn temp_store() -> LocalStore {
        LocalStore::with_path(temp_store_path())
    }

    /// Mock-backed app with a unique user so the global channel fetch guard
    /// never couples parallel tests.
    fn mock_app() -> (App, Arc<MockProvider>, i64) {
        mock_app_with_store(temp_store())
    }

    fn mock_app_with_store(store: LocalStore) -> (App, Arc<MockProvider>, i64) {
        let user_id = unique_user();
        let mock = Arc::new(MockProvider::new());
        mock.set_user(UserInfo {
            id: user_id,
            username: format!("user{}", user_id),
            display_name: None,
        });
        let app = App::with_services(Services::new(mock.clone(), mock.clone(), store));
        (app, mock, user_id)
    }

    /// Advance virtual time in small steps, ticking the app each step.
    async fn settle(app: &mut App, total: Duration) {
        let step = Duration::from_millis(25);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            tokio::time::sleep(step).await;
            app.on_tick();
            elapsed += step;
        }
    }

    async fn connect(app: &mut App) {
        app.handle_connect_click("test-init-data");
        settle(app, Duration::from_millis(300)).await;
    }

    /// Put a session in place without going through the connect flow.
    fn install_session(app: &App, user_id: i64) {
        let mut state = app.state.write();
        state.session = Some(Session {
            token: "test-token".to_string(),
            user: UserInfo {
                id: user_id,
                username: format!("user{}", user_id),
                display_name: None,
            },
        });
        state.current_screen = Screen::Channels;
    }

    // ========== Construction ==========

    #[test]
    fn test_app_creation() {
        let (app, _mock, _) = mock_app();
        let state = app.state.read();
        assert_eq!(state.current_screen, Screen::Connect);
        assert!(!state.is_authenticated());
        assert_eq!(app.pending_events(), 0);
    }

    #[test]
    fn test_default_app_starts_on_connect_screen() {
        let app = App::new();
        assert_eq!(app.state.read().current_screen, Screen::Connect);
    }

    #[test]
    fn test_with_config_token_bypass() {
        let config = Config {
            api_token: Some("service-token".to_string()),
            demo: true,
            poll_interval: Duration::from_secs(7),
            state_file: temp_store_path(),
            ..Default::default()
        };
        let app = App::with_config(&config);

        let state = app.state.read();
        assert!(state.is_authenticated());
        assert_eq!(state.current_screen, Screen::Overview);
        assert_eq!(
            state.session.as_ref().map(|s| s.token.as_str()),
            Some("service-token")
        );
        assert_eq!(state.realtime.poll_interval, Duration::from_secs(7));
    }

    // ========== Session Flow ==========

    #[tokio::test(start_paused = true)]
    async fn test_connect_establishes_session() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;

        let state = app.state.read();
        assert!(state.is_authenticated());
        assert_eq!(state.current_screen, Screen::Overview);
        assert!(!state.connecting);
        assert_eq!(mock.session_token(), Some("mock-session-token".to_string()));
        assert_eq!(mock.call_count("create_session"), 1);

        // The channel list loads right after the session, and the first
        // channel becomes the selection
        assert_eq!(state.channels.list.data().map(|l| l.len()), Some(2));
        assert_eq!(state.channels.selected, Some(1));
    }

    #[test]
    fn test_connect_with_empty_init_data_never_calls_api() {
        let (app, mock, _) = mock_app();
        app.handle_connect_click("   ");

        let state = app.state.read();
        assert!(state.connect_error.is_some());
        assert!(!state.connecting);
        assert_eq!(mock.call_count("create_session"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_failure_surfaces_error() {
        let (mut app, mock, _) = mock_app();
        mock.fail_with("Invalid init data signature");

        connect(&mut app).await;

        let state = app.state.read();
        assert!(!state.is_authenticated());
        assert!(!state.connecting);
        assert_eq!(
            state.connect_error.as_deref(),
            Some("Invalid init data signature")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_clears_session_state() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        assert!(app.state.read().is_authenticated());

        app.handle_disconnect_click();

        let state = app.state.read();
        assert!(!state.is_authenticated());
        assert_eq!(state.current_screen, Screen::Connect);
        assert!(state.channels.list.data().is_none());
        assert!(state.channels.selected.is_none());
        assert_eq!(mock.session_token(), None);
    }

    // ========== Navigation ==========

    #[test]
    fn test_protected_screens_redirect_to_connect() {
        let (app, _mock, _) = mock_app();
        app.handle_screen_change(Screen::Overview);
        assert_eq!(app.state.read().current_screen, Screen::Connect);

        app.handle_screen_change(Screen::Vacuum);
        assert_eq!(app.state.read().current_screen, Screen::Connect);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_screens_mount_their_data_once() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;

        app.handle_screen_change(Screen::QueryStats);
        settle(&mut app, Duration::from_millis(200)).await;
        assert_eq!(mock.call_count("get_query_stats"), 1);
        assert_eq!(mock.call_count("get_slow_queries"), 1);
        assert!(app.state.read().admin.query.summary.data().is_some());

        // Leaving and coming back serves from cache, no second request
        app.handle_screen_change(Screen::Channels);
        settle(&mut app, Duration::from_millis(100)).await;
        app.handle_screen_change(Screen::QueryStats);
        settle(&mut app, Duration::from_millis(200)).await;
        assert_eq!(mock.call_count("get_query_stats"), 1);
        assert_eq!(mock.call_count("get_slow_queries"), 1);
    }

    // ========== Channel List: Dedup ==========

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_channel_fetches_collapse_to_one_request() {
        let user_id = unique_user();
        let mock = Arc::new(MockProvider::new());
        mock.set_latency(Duration::from_millis(100));

        let mut app1 =
            App::with_services(Services::new(mock.clone(), mock.clone(), temp_store()));
        let mut app2 =
            App::with_services(Services::new(mock.clone(), mock.clone(), temp_store()));
        install_session(&app1, user_id);
        install_session(&app2, user_id);

        tasks::channels::fetch_channels(Arc::clone(&app1.state), app1.event_tx.clone(), false);
        tasks::channels::fetch_channels(Arc::clone(&app2.state), app2.event_tx.clone(), false);

        // Only the first caller claimed the per-user slot
        assert!(app1.state.read().channels.list.is_loading());
        assert!(!app2.state.read().channels.list.is_loading());

        settle(&mut app1, Duration::from_millis(500)).await;
        settle(&mut app2, Duration::from_millis(500)).await;

        assert_eq!(mock.call_count("list_channels"), 1);
        assert!(app1.state.read().channels.list.data().is_some());
        assert!(app2.state.read().channels.list.data().is_none());

        // The claim is released once the fetch finishes
        tasks::channels::fetch_channels(Arc::clone(&app2.state), app2.event_tx.clone(), false);
        settle(&mut app2, Duration::from_millis(500)).await;
        assert_eq!(mock.call_count("list_channels"), 2);
        assert!(app2.state.read().channels.list.data().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_users_do_not_share_the_fetch_guard() {
        let mock = Arc::new(MockProvider::new());
        mock.set_latency(Duration::from_millis(100));

        let mut app1 =
            App::with_services(Services::new(mock.clone(), mock.clone(), temp_store()));
        let mut app2 =
            App::with_services(Services::new(mock.clone(), mock.clone(), temp_store()));
        install_session(&app1, unique_user());
        install_session(&app2, unique_user());

        tasks::channels::fetch_channels(Arc::clone(&app1.state), app1.event_tx.clone(), false);
        tasks::channels::fetch_channels(Arc::clone(&app2.state), app2.event_tx.clone(), false);

        settle(&mut app1, Duration::from_millis(500)).await;
        settle(&mut app2, Duration::from_millis(500)).await;
        assert_eq!(mock.call_count("list_channels"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_refresh_bypasses_cache_but_not_inflight_guard() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        assert_eq!(mock.call_count("list_channels"), 1);

        // Cached: a plain mount fetch is a no-op
        app.handle_screen_change(Screen::Channels);
        settle(&mut app, Duration::from_millis(100)).await;
        assert_eq!(mock.call_count("list_channels"), 1);

        // Forced: goes out again
        mock.set_latency(Duration::from_millis(100));
        app.refresh_channels();
        // While the forced fetch is in flight a second force is ignored
        app.refresh_channels();
        settle(&mut app, Duration::from_millis(500)).await;
        assert_eq!(mock.call_count("list_channels"), 2);
    }

    // ========== Channel List: Retry ==========

    #[tokio::test(start_paused = true)]
    async fn test_channel_fetch_retries_after_transient_failure() {
        let (mut app, mock, user_id) = mock_app();
        install_session(&app, user_id);

        mock.fail_with("connection refused");
        tasks::channels::fetch_channels(Arc::clone(&app.state), app.event_tx.clone(), false);
        settle(&mut app, Duration::from_millis(100)).await;
        assert_eq!(mock.call_count("list_channels"), 1);

        // Heal the backend before the 1s retry fires
        mock.clear_failure();
        settle(&mut app, Duration::from_millis(1200)).await;
        assert_eq!(mock.call_count("list_channels"), 2);
        assert!(app.state.read().channels.list.data().is_some());
        assert!(app.state.read().channels.list.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_fetch_gives_up_after_three_retries() {
        let (mut app, mock, user_id) = mock_app();
        install_session(&app, user_id);

        mock.fail_with("backend down");
        tasks::channels::fetch_channels(Arc::clone(&app.state), app.event_tx.clone(), false);

        // Backoff schedule is 1s, 2s, 4s; 8 virtual seconds covers all of it
        settle(&mut app, Duration::from_secs(8)).await;

        assert_eq!(mock.call_count("list_channels"), 4); // initial + 3 retries
        let state = app.state.read();
        assert!(state.channels.list.data().is_none());
        assert_eq!(state.channels.list.error(), Some("backend down"));
        assert!(!state.channels.list.is_loading());
        drop(state);

        // The guard slot was released; a later fetch starts a fresh cycle
        tasks::channels::fetch_channels(Arc::clone(&app.state), app.event_tx.clone(), false);
        settle(&mut app, Duration::from_secs(8)).await;
        assert_eq!(mock.call_count("list_channels"), 8);
    }

    // ========== Selection Persistence ==========

    #[tokio::test(start_paused = true)]
    async fn test_selection_survives_restart_via_state_file() {
        let path = temp_store_path();
        let user_id = unique_user();
        let user = UserInfo {
            id: user_id,
            username: format!("user{}", user_id),
            display_name: None,
        };

        {
            let mock = Arc::new(MockProvider::new());
            mock.set_user(user.clone());
            let mut app = App::with_services(Services::new(
                mock.clone(),
                mock,
                LocalStore::with_path(&path),
            ));
            connect(&mut app).await;
            assert_eq!(app.state.read().channels.selected, Some(1));

            app.handle_select_channel(2);
            settle(&mut app, Duration::from_millis(200)).await;
            assert_eq!(app.state.read().channels.selected, Some(2));
        }

        // Fresh app, same user, same state file: selection comes back
        {
            let mock = Arc::new(MockProvider::new());
            mock.set_user(user);
            let mut app = App::with_services(Services::new(
                mock.clone(),
                mock,
                LocalStore::with_path(&path),
            ));
            connect(&mut app).await;
            assert_eq!(app.state.read().channels.selected, Some(2));
        }

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_remembered_channel_falls_back_to_first() {
        let path = temp_store_path();
        let (mut app, _mock, user_id) = mock_app_with_store(LocalStore::with_path(&path));

        // Remember a channel that no longer exists
        LocalStore::with_path(&path)
            .remember_selection(user_id, 99)
            .expect("seed state file");

        connect(&mut app).await;
        assert_eq!(app.state.read().channels.selected, Some(1));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_switch_resets_analytics() {
        let (mut app, _mock, _) = mock_app();
        connect(&mut app).await;
        assert!(app.state.read().analytics.overview.data().is_some());

        app.handle_select_channel(2);
        // Before any fetch resolves, the previous channel's analytics are gone
        {
            let state = app.state.read();
            assert_eq!(state.channels.selected, Some(2));
            assert_eq!(state.realtime.connection, ConnectionStatus::Disconnected);
        }

        settle(&mut app, Duration::from_millis(300)).await;
        let state = app.state.read();
        assert_eq!(
            state.analytics.overview.data().map(|o| o.channel_id),
            Some(2)
        );
    }

    // ========== Real-Time Polling ==========

    #[tokio::test(start_paused = true)]
    async fn test_realtime_tick_goes_live() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        assert_eq!(app.state.read().realtime.connection, ConnectionStatus::Disconnected);
        let calls_before = mock.call_count("get_analytics");

        // One 30s poll interval
        settle(&mut app, Duration::from_secs(35)).await;

        let state = app.state.read();
        assert_eq!(state.realtime.connection, ConnectionStatus::Live);
        assert_eq!(state.realtime.consecutive_failures, 0);
        assert!(mock.call_count("get_analytics") > calls_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_falls_back_to_cached_snapshot() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        assert!(app.state.read().analytics.overview.data().is_some());

        mock.fail_with("gateway timeout");
        // Tick at 30s, then backoff retries at +1s, +2s, +4s
        settle(&mut app, Duration::from_secs(45)).await;

        let state = app.state.read();
        assert_eq!(state.realtime.connection, ConnectionStatus::Cached);
        assert_eq!(state.realtime.consecutive_failures, 4);
        // The stale snapshot is still being served
        assert!(state.analytics.overview.data().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_poller_stops_off_screen() {
        let (mut app, _mock, _) = mock_app();
        connect(&mut app).await;
        assert!(app.state.read().realtime.polling);

        app.handle_screen_change(Screen::Channels);
        settle(&mut app, Duration::from_secs(35)).await;
        assert!(!app.state.read().realtime.polling);
    }

    // ========== Channel Form ==========

    #[tokio::test(start_paused = true)]
    async fn test_empty_username_blocks_submission() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;

        app.open_create_form();
        {
            let mut state = app.state.write();
            state.channels.form.name = "My Channel".to_string();
            state.channels.form.username = String::new();
            state.channels.form.telegram_id = "-1001".to_string();
        }
        app.handle_submit_channel_form();
        settle(&mut app, Duration::from_millis(100)).await;

        let state = app.state.read();
        assert!(state
            .channels
            .form
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("username"));
        assert!(!state.channels.form.submitting);
        assert_eq!(mock.call_count("create_channel"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_form_creates_channel_and_refreshes_list() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;

        app.open_create_form();
        {
            let mut state = app.state.write();
            state.channels.form.name = "World News".to_string();
            state.channels.form.username = "@worldnews".to_string();
            state.channels.form.telegram_id = "-1009988".to_string();
        }
        app.handle_submit_channel_form();
        settle(&mut app, Duration::from_millis(300)).await;

        assert_eq!(mock.call_count("create_channel"), 1);
        // Mutation success refreshes the list
        assert_eq!(mock.call_count("list_channels"), 2);

        let notifications = app.take_notifications();
        assert!(notifications
            .iter()
            .any(|n| n.level == NoticeLevel::Success && n.message.contains("worldnews")));
        assert!(app.take_notifications().is_empty());

        let state = app.state.read();
        assert!(state
            .channels
            .list
            .data()
            .map(|l| l.iter().any(|c| c.username == "worldnews"))
            .unwrap_or(false));
        assert!(state.channels.form.name.is_empty());
        assert!(state.channels.form.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_username_error_lands_in_form() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;

        app.open_create_form();
        {
            let mut state = app.state.write();
            state.channels.form.name = "Copycat".to_string();
            state.channels.form.username = "dailydigest".to_string();
            state.channels.form.telegram_id = "-1007".to_string();
        }
        app.handle_submit_channel_form();
        settle(&mut app, Duration::from_millis(300)).await;

        let state = app.state.read();
        assert!(state
            .channels
            .form
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("already registered"));
        assert!(!state.channels.form.submitting);
        assert_eq!(mock.call_count("create_channel"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_selected_channel_moves_selection_on() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        assert_eq!(app.state.read().channels.selected, Some(1));

        app.handle_delete_channel(1);
        settle(&mut app, Duration::from_millis(300)).await;

        assert_eq!(mock.call_count("delete_channel"), 1);
        let state = app.state.read();
        // Reconciliation against the refreshed list picked the next channel
        assert_eq!(state.channels.selected, Some(2));
        assert!(state
            .channels
            .list
            .data()
            .map(|l| !l.iter().any(|c| c.id == 1))
            .unwrap_or(false));
    }

    // ========== Analytics Controls ==========

    #[tokio::test(start_paused = true)]
    async fn test_period_change_refetches_period_scoped_resources() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        assert_eq!(mock.call_count("get_top_posts"), 1);
        assert_eq!(mock.call_count("get_engagement_metrics"), 1);

        app.handle_set_period(MetricsPeriod::Month);
        settle(&mut app, Duration::from_millis(200)).await;

        assert_eq!(app.state.read().analytics.query.period, MetricsPeriod::Month);
        assert_eq!(mock.call_count("get_top_posts"), 2);
        assert_eq!(mock.call_count("get_engagement_metrics"), 2);
        // Overview and recommendations are period-independent
        assert_eq!(mock.call_count("get_recommendations"), 1);

        // Setting the same period again is a no-op
        app.handle_set_period(MetricsPeriod::Month);
        settle(&mut app, Duration::from_millis(200)).await;
        assert_eq!(mock.call_count("get_top_posts"), 2);
    }

    // ========== Admin Confirmation Gate ==========

    #[tokio::test(start_paused = true)]
    async fn test_admin_actions_require_confirmation() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        app.handle_screen_change(Screen::QueryStats);
        settle(&mut app, Duration::from_millis(200)).await;

        app.request_admin_action(AdminAction::ResetQueryStats);
        assert!(app.state.read().admin.dialog.is_some());
        assert_eq!(mock.call_count("reset_query_stats"), 0);

        // Cancelling runs nothing
        app.handle_cancel_dialog();
        settle(&mut app, Duration::from_millis(200)).await;
        assert!(app.state.read().admin.dialog.is_none());
        assert_eq!(mock.call_count("reset_query_stats"), 0);

        // Confirming runs the action and refreshes the monitor
        app.request_admin_action(AdminAction::ResetQueryStats);
        app.handle_confirm_dialog();
        settle(&mut app, Duration::from_millis(300)).await;
        assert_eq!(mock.call_count("reset_query_stats"), 1);
        assert_eq!(mock.call_count("get_query_stats"), 2);
        assert!(app.state.read().admin.query.last_action_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_vacuum_runs_and_refreshes_tables() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        app.handle_screen_change(Screen::Vacuum);
        settle(&mut app, Duration::from_millis(200)).await;
        assert_eq!(mock.call_count("get_table_stats"), 1);

        app.request_admin_action(AdminAction::RunVacuum {
            table: "posts".to_string(),
            full: false,
        });
        app.handle_confirm_dialog();
        settle(&mut app, Duration::from_millis(300)).await;

        assert_eq!(mock.call_count("run_vacuum"), 1);
        assert_eq!(mock.call_count("get_table_stats"), 2);

        let state = app.state.read();
        let posts = state
            .admin
            .vacuum
            .tables
            .data()
            .and_then(|tables| tables.iter().find(|t| t.table == "posts").cloned());
        assert_eq!(posts.map(|t| t.dead_tuples), Some(0));
        assert!(state.admin.vacuum.last_action_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_vacuum_leaves_table_list_untouched() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;
        app.handle_screen_change(Screen::Vacuum);
        settle(&mut app, Duration::from_millis(200)).await;

        let before = app
            .state
            .read()
            .admin
            .vacuum
            .tables
            .data()
            .cloned()
            .expect("tables loaded");

        mock.fail_with("relation is locked");
        app.request_admin_action(AdminAction::RunVacuum {
            table: "posts".to_string(),
            full: true,
        });
        app.handle_confirm_dialog();
        settle(&mut app, Duration::from_millis(300)).await;

        let state = app.state.read();
        assert_eq!(
            state.admin.vacuum.last_action_error.as_deref(),
            Some("relation is locked")
        );
        assert!(!state.admin.vacuum.action_in_flight);
        // No optimistic update, no refetch: the list is exactly as loaded
        assert_eq!(state.admin.vacuum.tables.data(), Some(&before));
        assert_eq!(mock.call_count("get_table_stats"), 1);
        drop(state);

        let notifications = app.take_notifications();
        assert!(notifications
            .iter()
            .any(|n| n.level == NoticeLevel::Error && n.message.contains("VACUUM failed")));
    }

    // ========== Uploads ==========

    #[tokio::test(start_paused = true)]
    async fn test_upload_lifecycle() {
        let (mut app, mock, _) = mock_app();
        connect(&mut app).await;

        let id = app.upload_media("banner.png", vec![0u8; 1000]);
        settle(&mut app, Duration::from_millis(300)).await;

        assert_eq!(mock.call_count("upload_media"), 1);
        {
            let mut state = app.state.write();
            let upload = state.uploads.find_mut(id).expect("upload tracked");
            assert_eq!(upload.status, UploadStatus::Completed);
            assert_eq!(upload.uploaded_bytes, 1000);
            assert!((upload.progress() - 1.0).abs() < f64::EPSILON);
        }

        app.clear_finished_uploads();
        assert!(app.state.read().uploads.pending.is_empty());
    }
}
