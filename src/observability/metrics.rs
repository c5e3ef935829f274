//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define request and registration metrics
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `routekit_requests_total` (counter): requests by method, status
//! - `routekit_request_duration_seconds` (histogram): latency distribution
//! - `routekit_registrations_total` (counter): registrar calls by kind
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op
//! - Labels stay low-cardinality (no paths)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "routekit_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "routekit_request_duration_seconds";
pub const REGISTRATIONS_TOTAL: &str = "routekit_registrations_total";

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, Unit::Count, "Requests served");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Request latency, including middleware"
    );
    describe_counter!(REGISTRATIONS_TOTAL, Unit::Count, "Registrar calls at startup");
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!(REQUESTS_TOTAL, "method" => method.clone(), "status" => status.clone()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

/// Record one registrar call: `plugin`, `middleware` or `route`.
pub fn record_registration(kind: &'static str) {
    counter!(REGISTRATIONS_TOTAL, "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_into_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_registration("route");
            record_registration("route");
            record_request("GET", 200, Instant::now());
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"routekit_registrations_total{kind="route"} 2"#));
        assert!(rendered.contains(r#"routekit_requests_total{method="GET",status="200"} 1"#));
    }
}
