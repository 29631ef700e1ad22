use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total slot queries served.
pub const SLOT_QUERIES_TOTAL: &str = "creneau_slot_queries_total";

/// Histogram: slot query latency in seconds.
pub const SLOT_QUERY_DURATION_SECONDS: &str = "creneau_slot_query_duration_seconds";

/// Histogram: slots returned per query.
pub const SLOTS_RETURNED: &str = "creneau_slots_returned";

/// Histogram: days walked per available-dates scan.
pub const DATE_SCAN_DAYS: &str = "creneau_date_scan_days";

// ── Booking workflow ────────────────────────────────────────────

/// Counter: bookings created (PENDING inserts).
pub const BOOKINGS_CREATED_TOTAL: &str = "creneau_bookings_created_total";

/// Counter: booking attempts rejected at re-validation or insert.
pub const BOOKING_CONFLICTS_TOTAL: &str = "creneau_booking_conflicts_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Install the fmt tracing subscriber. Embedding binaries call this once
/// at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
