//! Prometheus metrics for the proxy.

use std::time::Duration;

use metrics::{counter, histogram};

/// Record an incoming fetch request.
pub fn record_request() {
    counter!("cloud_proxy_requests_total").increment(1);
}

/// Record a failed upstream round trip.
pub fn record_upstream_failure() {
    counter!("cloud_proxy_upstream_failures_total").increment(1);
}

/// Record the time until the upstream response headers arrived.
pub fn record_upstream_duration(elapsed: Duration) {
    histogram!("cloud_proxy_upstream_duration_seconds").record(elapsed.as_secs_f64());
}
