use crate::packet::{Packet, PacketId, PacketStatus, PacketType};
use crate::queue::types::{lane_index, QueueStats, LANE_COUNT};
use std::collections::VecDeque;

/// Priority-ordered holding area for packets waiting for the channel.
///
/// One lane per packet type, drained Emergency -> Science -> Logs. Each lane
/// is kept sorted by creation sequence, so a packet that was created first
/// leaves its lane first even if it was enqueued a moment later.
///
/// The queue has no interior locking: it lives inside the engine's single
/// state lock together with the in-flight slot and history.
#[derive(Debug, Default)]
pub struct TransmissionQueue {
    lanes: [VecDeque<Packet>; LANE_COUNT],
    stats: QueueStats,
}

impl TransmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a packet into its priority lane
    pub fn enqueue(&mut self, packet: Packet) {
        let packet_type = packet.packet_type;
        let lane = &mut self.lanes[lane_index(packet_type)];

        // Almost always appends; only concurrent creators can arrive out of order
        let position = lane
            .iter()
            .rposition(|queued| queued.sequence < packet.sequence)
            .map_or(0, |i| i + 1);
        lane.insert(position, packet);

        self.stats.total_enqueued += 1;
        *self.stats.pending_mut(packet_type) += 1;
    }

    /// Remove and return the next packet in priority order
    pub fn dequeue_next(&mut self) -> Option<Packet> {
        for packet_type in PacketType::ALL {
            if let Some(packet) = self.lanes[lane_index(packet_type)].pop_front() {
                self.stats.total_dispatched += 1;
                let pending = self.stats.pending_mut(packet_type);
                *pending = pending.saturating_sub(1);
                return Some(packet);
            }
        }
        None
    }

    /// Queued packets in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &Packet> {
        self.lanes.iter().flat_map(|lane| lane.iter())
    }

    pub fn get(&self, id: &PacketId) -> Option<&Packet> {
        self.iter().find(|p| p.id == *id)
    }

    /// Remove every queued packet, returning how many were dropped.
    ///
    /// The in-flight packet is not held here, so it is never affected.
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        for lane in &mut self.lanes {
            let before = lane.len();
            lane.retain(|p| p.status != PacketStatus::Queued);
            removed += before - lane.len();
        }

        self.stats.total_cleared += removed as u64;
        for packet_type in PacketType::ALL {
            *self.stats.pending_mut(packet_type) = self.lanes[lane_index(packet_type)].len();
        }
        removed
    }

    pub fn stats(&self) -> QueueStats {
        self.stats.clone()
    }

    pub fn len(&self) -> usize {
        self.lanes.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
