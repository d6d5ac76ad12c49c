use serde::{Deserialize, Serialize};

/// Summary metrics derived from the queue and history on every read
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LinkStats {
    pub total_packets: usize,
    pub packets_transmitted: usize,
    pub packets_queued: usize,
    pub bandwidth_utilization: f64,
    pub average_compression_ratio: f64,
    pub transmission_efficiency: f64,
}
