//! Headless dashboard runner.
//!
//! Drives [`dashboard::app::App`] on a fixed tick without any UI attached:
//! connects from the environment-supplied init data (or a pre-issued token),
//! processes events, and prints notifications to stdout. Mini App shells and
//! integration harnesses embed the library crate directly instead.

use dashboard::app::App;
use dashboard::config::Config;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Ticks between state snapshot log lines when `debug-mode` is enabled
const SNAPSHOT_EVERY: u64 = 40;

fn log_state_snapshot(app: &App) {
    let state = app.state.read();
    debug!(
        screen = ?state.current_screen,
        authenticated = state.is_authenticated(),
        selected_channel = ?state.channels.selected,
        connection = state.realtime.connection.label(),
        consecutive_failures = state.realtime.consecutive_failures,
        pending_events = app.pending_events(),
        uploads = state.uploads.pending.len(),
        "State snapshot"
    );
}

#[tokio::main]
async fn main() {
    dashboard::debug::init();

    let config = Config::from_env();
    info!(
        api_url = %config.api_url,
        demo = config.demo,
        poll_secs = config.poll_interval.as_secs(),
        "Starting dashboard"
    );
    if let Some(dsn) = &config.error_dsn {
        info!(dsn = %dsn, "Error reporting endpoint configured");
    }

    let mut app = App::with_config(&config);

    if config.full_health_check && !config.demo {
        let provider = app.state.read().services.provider.clone();
        if provider.is_available().await {
            info!("Backend health check passed");
        } else {
            error!(api_url = %config.api_url, "Backend is unreachable, refusing to start");
            std::process::exit(1);
        }
    }

    // Without a token, connect from init data when we have it
    let authenticated = app.state.read().is_authenticated();
    match (&config.init_data, authenticated) {
        (_, true) => {}
        (Some(init_data), false) => app.handle_connect_click(init_data.clone()),
        (None, false) => {
            warn!("No DASHBOARD_INIT_DATA or DASHBOARD_API_TOKEN set; waiting on Connect screen");
        }
    }

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    let mut tick_count: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                app.on_tick();
                for notice in app.take_notifications() {
                    println!("[{}] {}", notice.level.label(), notice.message);
                }
                tick_count += 1;
                if dashboard::debug::is_debug_mode() && tick_count % SNAPSHOT_EVERY == 0 {
                    log_state_snapshot(&app);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }
}
