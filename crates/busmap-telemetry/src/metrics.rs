//! Prometheus metrics for the busmap client.
//!
//! Covers connectivity, frame decoding and marker lifecycle.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration
//! fails, it indicates a fatal configuration error (e.g., duplicate metric
//! names) that should crash immediately at startup rather than fail
//! silently. These panics only occur during static initialization, never
//! at runtime.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_int_gauge, Counter,
    CounterVec, Gauge, IntGauge, TextEncoder,
};

/// WebSocket connection state (1 = connected, 0 = disconnected).
pub static WS_CONNECTED: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "busmap_ws_connected",
        "WebSocket connection state (1=connected)"
    )
    .unwrap()
});

/// Total WebSocket reconnects scheduled.
pub static WS_RECONNECT_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "busmap_ws_reconnect_total",
        "Total WebSocket reconnects scheduled"
    )
    .unwrap()
});

/// Frames decoded, by message kind (INI/POS/EXP).
pub static FRAMES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "busmap_frames_total",
        "Decoded feed frames by message kind",
        &["kind"]
    )
    .unwrap()
});

/// Frames dropped because they failed to decode.
pub static DECODE_ERRORS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "busmap_decode_errors_total",
        "Feed frames dropped as undecodable"
    )
    .unwrap()
});

/// Live markers on the map.
pub static MARKERS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("busmap_markers_active", "Live markers on the map").unwrap()
});

/// Markers created over the process lifetime.
pub static MARKERS_CREATED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("busmap_markers_created_total", "Markers created").unwrap()
});

/// Markers removed by expiry or reset.
pub static MARKERS_EXPIRED_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("busmap_markers_expired_total", "Markers removed").unwrap()
});

/// Metrics facade.
pub struct Metrics;

impl Metrics {
    /// Record WebSocket connected.
    pub fn ws_connected() {
        WS_CONNECTED.set(1.0);
    }

    /// Record WebSocket disconnected.
    pub fn ws_disconnected() {
        WS_CONNECTED.set(0.0);
    }

    /// Record a scheduled reconnect.
    pub fn ws_reconnect() {
        WS_RECONNECT_TOTAL.inc();
    }

    /// Record one decoded frame.
    pub fn frame_decoded(kind: &str) {
        FRAMES_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record one dropped, undecodable frame.
    pub fn decode_error() {
        DECODE_ERRORS_TOTAL.inc();
    }

    /// Set the live marker count.
    pub fn markers_active(count: usize) {
        MARKERS_ACTIVE.set(count as i64);
    }

    /// Record created markers.
    pub fn markers_created(count: usize) {
        MARKERS_CREATED_TOTAL.inc_by(count as f64);
    }

    /// Record removed markers.
    pub fn markers_expired(count: usize) {
        MARKERS_EXPIRED_TOTAL.inc_by(count as f64);
    }
}

/// Render all registered metrics in the Prometheus text exposition format.
pub fn gather() -> TelemetryResult<String> {
    let encoder = TextEncoder::new();
    Ok(encoder.encode_to_string(&prometheus::gather())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        Metrics::frame_decoded("POS");
        Metrics::frame_decoded("POS");
        Metrics::frame_decoded("EXP");
        Metrics::decode_error();
        Metrics::markers_active(7);

        assert!(FRAMES_TOTAL.with_label_values(&["POS"]).get() >= 2.0);
        assert!(FRAMES_TOTAL.with_label_values(&["EXP"]).get() >= 1.0);
        assert!(DECODE_ERRORS_TOTAL.get() >= 1.0);
        assert_eq!(MARKERS_ACTIVE.get(), 7);
    }

    #[test]
    fn test_gather_renders_text_format() {
        Metrics::ws_connected();
        let text = gather().unwrap();
        assert!(text.contains("busmap_ws_connected"));
    }
}
