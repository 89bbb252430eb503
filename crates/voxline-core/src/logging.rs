//! Logging configuration and initialization
//!
//! Provides structured logging with tracing-subscriber and optional JSON output

use anyhow::Result;
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CoreError;

/// Initialize logging with default configuration
pub fn init() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let json_logs = std::env::var("VOXLINE_JSON_LOGS")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);

    init_with_config(&log_level, json_logs)
}

/// Initialize logging with custom configuration.
///
/// Fails if a global subscriber is already installed.
pub fn init_with_config(log_level: &str, json_logs: bool) -> Result<()> {
    let env_filter = EnvFilter::from_str(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_level(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true),
            )
            .try_init()
    };
    installed.map_err(|e| CoreError::Logging(e.to_string()))?;

    tracing::info!(
        log_level = %log_level,
        json_logs = %json_logs,
        "Logging initialized"
    );

    Ok(())
}

/// Log an outbound request and return the start instant
pub fn log_request_start(method: &str, url: &str) -> std::time::Instant {
    tracing::debug!(http_method = %method, url = %url, "Request started");
    std::time::Instant::now()
}

/// Log a request completion with timing
pub fn log_request_end(method: &str, url: &str, status: u16, start: std::time::Instant) {
    tracing::debug!(
        http_method = %method,
        url = %url,
        http_status = %status,
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );
}
