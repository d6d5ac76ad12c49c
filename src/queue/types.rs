use crate::packet::PacketType;
use serde::{Deserialize, Serialize};

pub(crate) const LANE_COUNT: usize = 3;

pub(crate) fn lane_index(packet_type: PacketType) -> usize {
    match packet_type {
        PacketType::Emergency => 0,
        PacketType::Science => 1,
        PacketType::Logs => 2,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueStats {
    pub emergency_pending: usize,
    pub science_pending: usize,
    pub logs_pending: usize,
    pub total_enqueued: u64,
    pub total_dispatched: u64,
    pub total_cleared: u64,
}

impl QueueStats {
    pub(crate) fn pending_mut(&mut self, packet_type: PacketType) -> &mut usize {
        match packet_type {
            PacketType::Emergency => &mut self.emergency_pending,
            PacketType::Science => &mut self.science_pending,
            PacketType::Logs => &mut self.logs_pending,
        }
    }
}
