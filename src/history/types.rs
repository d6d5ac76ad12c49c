use crate::packet::{PacketId, PacketStatus, PacketType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one finished transmission.
///
/// `size` is the number of bytes put on the link (the compressed size) and
/// `transmission_time` the full committed time in simulated seconds. A
/// failed packet is only detected when its completion timer fires, so its
/// entry carries the same full time as a successful one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub packet_id: PacketId,
    pub packet_type: PacketType,
    pub outcome: PacketStatus,
    pub size: usize,
    pub original_size: usize,
    pub transmission_time: f64,
    pub propagation_delay: f64,
    pub serialization_delay: f64,
    pub bandwidth_bps: u32,
    pub started_at: f64,
    pub finished_at: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn is_failed(&self) -> bool {
        self.outcome == PacketStatus::Failed
    }
}
