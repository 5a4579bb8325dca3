// src/metrics.rs
use anyhow::{Context, Result};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;

pub const ENV_METRICS_ADDR: &str = "PTWC_METRICS_ADDR";

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("bulletin_candidates_total", "Candidate documents tried.");
        describe_counter!(
            "bulletin_fetch_errors_total",
            "Candidate fetches that failed (transport or HTTP status)."
        );
        describe_counter!(
            "bulletin_garbage_total",
            "Candidates whose extracted text looked like encoded garbage."
        );
        describe_counter!("bulletin_resolved_total", "Resolutions with a readable bulletin.");
        describe_counter!(
            "bulletin_degraded_total",
            "Resolutions that fell back to the last attempted candidate."
        );
        describe_histogram!("bulletin_resolve_ms", "Resolution time in milliseconds.");
        describe_counter!("poller_cycles_total", "Feed poll cycles run.");
        describe_counter!("poller_errors_total", "Feed poll cycles that failed.");
        describe_counter!("notify_errors_total", "Push-channel send failures.");
    });
}

/// Serve Prometheus exposition on `addr` (must run inside the tokio runtime).
pub fn install_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .context("prometheus: install exporter")?;
    ensure_described();
    Ok(())
}

/// Install the exporter when `PTWC_METRICS_ADDR` is set. Returns whether it was.
pub fn install_from_env() -> Result<bool> {
    let Ok(raw) = std::env::var(ENV_METRICS_ADDR) else {
        return Ok(false);
    };
    let addr: SocketAddr = raw
        .trim()
        .parse()
        .with_context(|| format!("{ENV_METRICS_ADDR}={raw} is not a socket address"))?;
    install_exporter(addr)?;
    tracing::info!(target: "metrics", %addr, "prometheus exporter listening");
    Ok(true)
}
