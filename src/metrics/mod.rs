//! Metrics and observability module
//!
//! Provides Prometheus-compatible metrics for the simulated link.
//!
//! Key metrics exposed:
//! - Packets created, by type
//! - Transmissions started and finished, by type and outcome
//! - Bytes put on the link and simulated transmission time
//! - Queue depth

pub mod exporter;
pub mod recorder;

pub use exporter::{install_recorder, metrics_route, render_metrics, MetricsError};
pub use recorder::{
    init_metrics, record_packet_created, record_packets_cleared, record_transmission_finished,
    record_transmission_started, set_queue_depth,
};
