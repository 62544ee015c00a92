//! File-based logging initialization

use super::config::DebugConfig;
use std::fs;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Sets up file-based logging with:
/// - Daily log rotation for the main debug log
/// - Optional realtime debug log (truncated on startup, for live monitoring)
/// - Non-blocking writes so logging never stalls the event loop
/// - Panic hook integration for crash logging
///
/// Logs are written to `logs/dashboard-debug.log` by default.
pub fn init() {
    let config = DebugConfig::from_env();

    // Create logs directory if it doesn't exist
    if let Err(e) = fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
        return;
    }

    // Main log with daily rotation
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "dashboard-debug.log");
    let (non_blocking_main, _guard_main) = tracing_appender::non_blocking(file_appender);

    // Configure log filter from environment
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("dashboard=info,warn"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_main)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI codes in log files

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config.enable_realtime_log {
        // Truncate the realtime log on startup for a fresh session
        let realtime_path = config.log_dir.join("debug-realtime.log");
        if let Err(e) = fs::File::create(&realtime_path) {
            eprintln!("Warning: Failed to create realtime log file: {}", e);
        }

        match fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&realtime_path)
        {
            Ok(realtime_appender) => {
                let (non_blocking_realtime, _guard_realtime) =
                    tracing_appender::non_blocking(realtime_appender);

                let realtime_layer = fmt::layer()
                    .with_writer(non_blocking_realtime)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .pretty();

                subscriber.with(realtime_layer).init();
                std::mem::forget(_guard_realtime);
            }
            Err(e) => {
                eprintln!("Warning: Failed to open realtime log file: {}", e);
                subscriber.init();
            }
        }
    } else {
        subscriber.init();
    }

    tracing::info!(
        log_dir = %config.log_dir.display(),
        log_level = %config.log_level,
        realtime_log = config.enable_realtime_log,
        "Debug logging initialized"
    );

    setup_panic_hook();

    // Keep the main guard alive for the lifetime of the program
    std::mem::forget(_guard_main);
}

/// Set up panic hook to log panics with full context
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        eprintln!("\n!!!!! PANIC DETECTED !!!!!");
        eprintln!("Location: {}", location);
        eprintln!("Message: {}", message);
        let backtrace = std::backtrace::Backtrace::force_capture();
        eprintln!("Backtrace:\n{:?}", backtrace);

        tracing::error!(
            location = %location,
            message = %message,
            "!!!!! APPLICATION PANIC !!!!!"
        );
        tracing::error!(backtrace = %format!("{:?}", backtrace), "Panic backtrace");

        default_panic(panic_info);
    }));
}
