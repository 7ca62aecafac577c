//! Prometheus metrics for the Locker server.
//!
//! Exposes counters for account, session and file operations plus the
//! metadata store's commit version.
//!
//! # Security Note
//!
//! The `/metrics` endpoint is unauthenticated to allow Prometheus scraping.
//! Metrics carry no usernames, filenames or tokens, only aggregate counts.
//! Restrict the endpoint to scraper addresses at the network level.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{self, Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Account metrics
pub static REGISTRATIONS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "locker_registrations_total",
            "Total number of registration attempts by result",
        ),
        &["result"],
    )
    .expect("metric creation failed")
});

pub static LOGINS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("locker_logins_total", "Total number of login attempts by result"),
        &["result"],
    )
    .expect("metric creation failed")
});

// Session metrics
pub static SESSIONS_REJECTED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "locker_sessions_rejected_total",
            "Total number of requests refused for a missing or invalid session token",
        ),
        &["reason"],
    )
    .expect("metric creation failed")
});

// File metrics
pub static FILES_STORED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("locker_files_stored_total", "Total number of files stored")
        .expect("metric creation failed")
});

pub static FILES_SUPERSEDED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "locker_files_superseded_total",
        "Total number of files removed because their owner uploaded another",
    )
    .expect("metric creation failed")
});

pub static FILES_DELETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("locker_files_deleted_total", "Total number of files deleted")
        .expect("metric creation failed")
});

pub static BYTES_STORED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("locker_bytes_stored_total", "Total bytes accepted by uploads")
        .expect("metric creation failed")
});

// Store metrics
pub static STORE_VERSION: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "locker_store_version",
        "Version of the latest committed metadata snapshot",
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent, so tests can build any number of routers.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(REGISTRATIONS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(LOGINS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(SESSIONS_REJECTED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(FILES_STORED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(FILES_SUPERSEDED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(FILES_DELETED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(BYTES_STORED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(STORE_VERSION.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record the store version reached by a commit.
pub fn record_store_version(version: u64) {
    STORE_VERSION.set(i64::try_from(version).unwrap_or(i64::MAX));
}
