//! # Application State
//!
//! Central state management for the dashboard.
//!
//! All mutable state lives in [`AppState`] behind an `Arc<RwLock<...>>` owned
//! by [`crate::app::App`]. Handlers take the write lock, mutate, and release
//! it before spawning async work; spawned tasks report back through the event
//! channel instead of holding the lock across awaits.
//!
//! Every remotely-fetched value is a [`Resource`] so the loading/error/data
//! triple and the stale-completion protection work the same way everywhere.

use crate::core::resource::{Resource, RetryPolicy};
use crate::core::service::{ApiService, DataProvider};
use crate::services::storage::LocalStore;
use shared::dto::admin::{QueryStatsSummary, SlowQuery, SlowQueryFilters, TableStats};
use shared::dto::analytics::{
    AnalyticsOverview, AnalyticsQuery, EngagementMetrics, Recommendation, TopPost,
};
use shared::dto::auth::UserInfo;
use shared::dto::channel::Channel;
use shared::dto::media::PendingMedia;
use std::sync::Arc;
use std::time::Duration;

/// Default interval between real-time poll ticks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Session establishment (Telegram init data entry)
    Connect,
    /// Analytics overview for the selected channel
    Overview,
    /// Channel list and create/edit forms
    Channels,
    /// Database query statistics monitor
    QueryStats,
    /// Table bloat and VACUUM monitor
    Vacuum,
}

impl Screen {
    /// All screens in display order
    pub fn all() -> Vec<Screen> {
        vec![
            Screen::Connect,
            Screen::Overview,
            Screen::Channels,
            Screen::QueryStats,
            Screen::Vacuum,
        ]
    }

    /// Get display title for the screen
    pub fn title(&self) -> &str {
        match self {
            Screen::Connect => "Connect",
            Screen::Overview => "Overview",
            Screen::Channels => "Channels",
            Screen::QueryStats => "Query Stats",
            Screen::Vacuum => "Vacuum",
        }
    }

    /// Whether the screen needs an established session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Screen::Connect)
    }
}

/// Freshness of the real-time overview feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Last poll tick succeeded
    Live,
    /// Polling is failing but a previous snapshot is still being shown
    Cached,
    /// No snapshot available
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Live => "LIVE",
            ConnectionStatus::Cached => "CACHED",
            ConnectionStatus::Disconnected => "DISCONNECTED",
        }
    }
}

/// An established backend session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
}

/// Severity attached to a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "INFO",
            NoticeLevel::Success => "OK",
            NoticeLevel::Error => "ERROR",
        }
    }
}

/// One entry in the dashboard's notification feed
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

/// Service handles shared by handlers and spawned tasks.
///
/// Cloning is cheap: the provider and API are `Arc`s and the store only
/// carries its file path.
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn DataProvider>,
    pub api: Arc<dyn ApiService>,
    pub store: LocalStore,
}

impl Services {
    pub fn new(provider: Arc<dyn DataProvider>, api: Arc<dyn ApiService>, store: LocalStore) -> Self {
        Self {
            provider,
            api,
            store,
        }
    }
}

/// Channel create/edit form state
#[derive(Debug, Clone, Default)]
pub struct ChannelForm {
    /// `Some(id)` when editing an existing channel, `None` when creating
    pub editing_id: Option<i64>,
    pub name: String,
    pub username: String,
    /// Raw text input, parsed on submit
    pub telegram_id: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl ChannelForm {
    /// Prefill the form for editing `channel`
    pub fn for_edit(channel: &Channel) -> Self {
        Self {
            editing_id: Some(channel.id),
            name: channel.name.clone(),
            username: channel.username.clone(),
            telegram_id: channel.telegram_id.to_string(),
            error: None,
            submitting: false,
        }
    }
}

/// Channel list state
#[derive(Debug, Default)]
pub struct ChannelsState {
    pub list: Resource<Vec<Channel>>,
    /// Currently selected channel id (persisted per user)
    pub selected: Option<i64>,
    pub form: ChannelForm,
}

impl ChannelsState {
    pub fn selected_channel(&self) -> Option<&Channel> {
        let selected = self.selected?;
        self.list.data()?.iter().find(|c| c.id == selected)
    }

    /// Whether `channel_id` exists in the loaded list
    pub fn contains(&self, channel_id: i64) -> bool {
        self.list
            .data()
            .map(|list| list.iter().any(|c| c.id == channel_id))
            .unwrap_or(false)
    }
}

/// Per-channel analytics state
#[derive(Debug)]
pub struct AnalyticsState {
    pub overview: Resource<AnalyticsOverview>,
    pub top_posts: Resource<Vec<TopPost>>,
    pub engagement: Resource<EngagementMetrics>,
    pub recommendations: Resource<Vec<Recommendation>>,
    /// Period/limit applied to top posts and engagement fetches
    pub query: AnalyticsQuery,
}

impl Default for AnalyticsState {
    fn default() -> Self {
        Self {
            overview: Resource::new(),
            top_posts: Resource::new(),
            engagement: Resource::new(),
            recommendations: Resource::new(),
            query: AnalyticsQuery::default(),
        }
    }
}

impl AnalyticsState {
    /// Drop all four resources, invalidating any in-flight fetches.
    ///
    /// Called when the selected channel changes so stale results for the
    /// previous channel can never land in the new channel's view.
    pub fn reset_all(&mut self) {
        self.overview.reset();
        self.top_posts.reset();
        self.engagement.reset();
        self.recommendations.reset();
    }
}

/// Real-time poller state
#[derive(Debug)]
pub struct RealtimeState {
    pub connection: ConnectionStatus,
    /// Ownership stamp; bumping it orphans any running poll loop
    pub poll_session: u64,
    /// Whether a poll loop is currently alive
    pub polling: bool,
    pub consecutive_failures: u32,
    pub poll_interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for RealtimeState {
    fn default() -> Self {
        Self {
            connection: ConnectionStatus::default(),
            poll_session: 0,
            polling: false,
            consecutive_failures: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry: RetryPolicy::realtime(),
        }
    }
}

/// Destructive admin operations that require confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    ResetQueryStats,
    RunVacuum { table: String, full: bool },
}

/// Pending confirmation dialog for an [`AdminAction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub action: AdminAction,
}

impl ConfirmDialog {
    pub fn new(action: AdminAction) -> Self {
        Self { action }
    }

    /// Human-readable description of what will happen on confirm
    pub fn describe(&self) -> String {
        match &self.action {
            AdminAction::ResetQueryStats => {
                "Reset all collected query statistics? This cannot be undone.".to_string()
            }
            AdminAction::RunVacuum { table, full } => {
                if *full {
                    format!(
                        "Run VACUUM FULL on \"{}\"? The table will be locked while it is rewritten.",
                        table
                    )
                } else {
                    format!("Run VACUUM on \"{}\"?", table)
                }
            }
        }
    }
}

/// Query statistics monitor state
#[derive(Debug)]
pub struct QueryMonitorState {
    pub summary: Resource<QueryStatsSummary>,
    pub slow_queries: Resource<Vec<SlowQuery>>,
    pub filters: SlowQueryFilters,
    pub auto_refresh: bool,
    /// Ownership stamp for the auto-refresh loop
    pub refresh_session: u64,
    pub refresh_running: bool,
    pub action_in_flight: bool,
    pub last_action_error: Option<String>,
}

impl Default for QueryMonitorState {
    fn default() -> Self {
        Self {
            summary: Resource::new(),
            slow_queries: Resource::new(),
            filters: SlowQueryFilters::default(),
            auto_refresh: false,
            refresh_session: 0,
            refresh_running: false,
            action_in_flight: false,
            last_action_error: None,
        }
    }
}

/// Table bloat monitor state
#[derive(Debug)]
pub struct VacuumMonitorState {
    pub tables: Resource<Vec<TableStats>>,
    pub auto_refresh: bool,
    pub refresh_session: u64,
    pub refresh_running: bool,
    pub action_in_flight: bool,
    pub last_action_error: Option<String>,
}

impl Default for VacuumMonitorState {
    fn default() -> Self {
        Self {
            tables: Resource::new(),
            auto_refresh: false,
            refresh_session: 0,
            refresh_running: false,
            action_in_flight: false,
            last_action_error: None,
        }
    }
}

/// Database monitor state (query stats + vacuum screens)
#[derive(Debug, Default)]
pub struct AdminState {
    pub query: QueryMonitorState,
    pub vacuum: VacuumMonitorState,
    /// At most one confirmation dialog at a time
    pub dialog: Option<ConfirmDialog>,
}

/// Media upload tracking
#[derive(Debug, Default)]
pub struct UploadsState {
    pub pending: Vec<PendingMedia>,
}

impl UploadsState {
    pub fn find_mut(&mut self, id: uuid::Uuid) -> Option<&mut PendingMedia> {
        self.pending.iter_mut().find(|u| u.id == id)
    }

    /// Drop uploads that have completed or failed
    pub fn clear_finished(&mut self) {
        self.pending.retain(|u| !u.status.is_terminal());
    }
}

/// Main application state
pub struct AppState {
    pub current_screen: Screen,

    // Session
    pub session: Option<Session>,
    /// Connect-screen input (Telegram Mini App init data)
    pub init_data: String,
    pub connecting: bool,
    pub connect_error: Option<String>,
    /// Result of the last backend health probe, `None` until one runs
    pub backend_available: Option<bool>,

    // Domain state
    pub channels: ChannelsState,
    pub analytics: AnalyticsState,
    pub realtime: RealtimeState,
    pub admin: AdminState,
    pub uploads: UploadsState,

    // Cross-screen notification feed
    pub notifications: Vec<Notification>,

    // Service handles for spawned tasks
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            current_screen: Screen::Connect,
            session: None,
            init_data: String::new(),
            connecting: false,
            connect_error: None,
            backend_available: None,
            channels: ChannelsState::default(),
            analytics: AnalyticsState::default(),
            realtime: RealtimeState::default(),
            admin: AdminState::default(),
            uploads: UploadsState::default(),
            notifications: Vec::new(),
            services,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session.as_ref().map(|s| s.user.id)
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        self.channels.selected_channel()
    }

    /// Append to the notification feed
    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockProvider;

    fn test_services() -> Services {
        let mock = Arc::new(MockProvider::new());
        let store = LocalStore::with_path(
            std::env::temp_dir().join(format!("state-test-{}.json", uuid::Uuid::new_v4())),
        );
        Services::new(mock.clone(), mock, store)
    }

    // ========== Screens ==========

    #[test]
    fn test_all_screens_have_titles() {
        let screens = Screen::all();
        assert_eq!(screens.len(), 5);
        for screen in screens {
            assert!(!screen.title().is_empty());
        }
    }

    #[test]
    fn test_only_connect_skips_session_requirement() {
        assert!(!Screen::Connect.requires_session());
        assert!(Screen::Overview.requires_session());
        assert!(Screen::Channels.requires_session());
        assert!(Screen::QueryStats.requires_session());
        assert!(Screen::Vacuum.requires_session());
    }

    // ========== State Defaults ==========

    #[test]
    fn test_initial_state() {
        let state = AppState::new(test_services());
        assert_eq!(state.current_screen, Screen::Connect);
        assert!(!state.is_authenticated());
        assert!(state.channels.list.data().is_none());
        assert_eq!(state.realtime.connection, ConnectionStatus::Disconnected);
        assert_eq!(state.realtime.poll_interval, DEFAULT_POLL_INTERVAL);
        assert!(state.admin.dialog.is_none());
    }

    // ========== Channel Selection ==========

    #[test]
    fn test_selected_channel_lookup() {
        let mut state = AppState::new(test_services());
        let ticket = state.channels.list.begin();
        state.channels.list.complete(
            ticket,
            Ok(vec![Channel {
                id: 7,
                name: "News".to_string(),
                username: "news".to_string(),
                telegram_id: -100,
                subscriber_count: 10,
            }]),
        );

        assert!(state.selected_channel().is_none());
        state.channels.selected = Some(7);
        assert_eq!(state.selected_channel().map(|c| c.id), Some(7));
        assert!(state.channels.contains(7));
        assert!(!state.channels.contains(8));
    }

    // ========== Analytics Reset ==========

    #[test]
    fn test_reset_all_invalidates_inflight_analytics() {
        let mut state = AppState::new(test_services());
        let ticket = state.analytics.overview.begin();

        state.analytics.reset_all();
        assert!(!state
            .analytics
            .overview
            .complete(ticket, Err("late".to_string())));
        assert!(state.analytics.overview.error().is_none());
    }

    // ========== Dialogs And Notifications ==========

    #[test]
    fn test_confirm_dialog_describes_vacuum_full() {
        let dialog = ConfirmDialog::new(AdminAction::RunVacuum {
            table: "posts".to_string(),
            full: true,
        });
        assert!(dialog.describe().contains("VACUUM FULL"));
        assert!(dialog.describe().contains("posts"));
    }

    #[test]
    fn test_notify_appends_to_feed() {
        let mut state = AppState::new(test_services());
        state.notify(NoticeLevel::Success, "Channel created");
        state.notify(NoticeLevel::Error, "Vacuum failed");
        assert_eq!(state.notifications.len(), 2);
        assert_eq!(state.notifications[0].level, NoticeLevel::Success);
    }
}
