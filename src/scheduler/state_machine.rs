use crate::packet::{Packet, PacketStatus};
use crate::scheduler::error::{SchedulerError, SchedulerResult};

/// Whether a packet may move from `from` to `to`.
///
/// queued -> transmitting -> transmitted | failed. Terminal states have no
/// outgoing edges.
pub fn can_transition(from: PacketStatus, to: PacketStatus) -> bool {
    matches!(
        (from, to),
        (PacketStatus::Queued, PacketStatus::Transmitting)
            | (PacketStatus::Transmitting, PacketStatus::Transmitted)
            | (PacketStatus::Transmitting, PacketStatus::Failed)
    )
}

/// Apply a status transition, leaving the packet untouched on error
pub fn transition(packet: &mut Packet, to: PacketStatus) -> SchedulerResult<PacketStatus> {
    let from = packet.status;
    if !can_transition(from, to) {
        return Err(SchedulerError::InvalidTransition { from, to });
    }
    packet.status = to;
    Ok(to)
}
