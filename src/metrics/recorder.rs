//! Metrics recorder for link operations
//!
//! Records packet and transmission metrics through the `metrics` facade.
//! Without an installed recorder every call is a no-op.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(
        "deepspace_packets_created_total",
        "Total number of packets accepted into the queue"
    );
    describe_counter!(
        "deepspace_payload_bytes_total",
        "Total payload bytes accepted, before compression"
    );
    describe_counter!(
        "deepspace_transmissions_started_total",
        "Total number of packets dispatched onto the link"
    );
    describe_counter!(
        "deepspace_transmissions_finished_total",
        "Total number of transmissions that reached a terminal status"
    );
    describe_counter!("deepspace_bytes_sent_total", "Total bytes put on the link");
    describe_counter!(
        "deepspace_packets_cleared_total",
        "Total number of queued packets removed by a clear"
    );

    describe_gauge!(
        "deepspace_queue_depth",
        "Current number of packets waiting for the link"
    );

    describe_histogram!(
        "deepspace_transmission_seconds",
        "Simulated time a packet occupied the link"
    );
    describe_histogram!(
        "deepspace_compression_ratio",
        "Fraction of payload removed by compression"
    );
}

// ============== Packet Operations ==============

/// Record a packet being accepted into the queue
pub fn record_packet_created(packet_type: &str, size_bytes: usize, compressed_size: usize) {
    counter!("deepspace_packets_created_total", "type" => packet_type.to_string()).increment(1);
    counter!("deepspace_payload_bytes_total", "type" => packet_type.to_string())
        .increment(size_bytes as u64);

    let ratio = crate::packet::compression_ratio(size_bytes, compressed_size);
    histogram!("deepspace_compression_ratio", "type" => packet_type.to_string()).record(ratio);
}

/// Record queued packets being dropped by a clear
pub fn record_packets_cleared(count: usize) {
    counter!("deepspace_packets_cleared_total").increment(count as u64);
}

// ============== Transmission Operations ==============

/// Record a packet taking the channel
pub fn record_transmission_started(packet_type: &str) {
    counter!("deepspace_transmissions_started_total", "type" => packet_type.to_string())
        .increment(1);
}

/// Record a transmission reaching `transmitted` or `failed`
pub fn record_transmission_finished(
    packet_type: &str,
    outcome: &str,
    bytes_sent: usize,
    duration: Duration,
) {
    counter!(
        "deepspace_transmissions_finished_total",
        "type" => packet_type.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    counter!("deepspace_bytes_sent_total", "type" => packet_type.to_string())
        .increment(bytes_sent as u64);
    histogram!("deepspace_transmission_seconds", "type" => packet_type.to_string())
        .record(duration.as_secs_f64());
}

// ============== Queue Metrics ==============

/// Update queue depth gauge
pub fn set_queue_depth(depth: usize) {
    gauge!("deepspace_queue_depth").set(depth as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics() {
        // Should not panic when called multiple times
        init_metrics();
        init_metrics();
    }

    #[test]
    fn test_recording_without_recorder() {
        record_packet_created("science", 1000, 700);
        record_transmission_started("science");
        record_transmission_finished("science", "transmitted", 700, Duration::from_millis(5612));
        record_packets_cleared(3);
        set_queue_depth(0);
    }
}
