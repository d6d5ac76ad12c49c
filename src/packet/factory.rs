use crate::packet::compression;
use crate::packet::error::{PacketError, PacketResult};
use crate::packet::types::{Packet, PacketStatus, PacketType};
use bytes::Bytes;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Validates creation requests and builds queued packets.
///
/// Sequence numbers are handed out in creation order and are what the
/// transmission queue uses for FIFO ordering inside a priority lane.
#[derive(Debug, Default)]
pub struct PacketFactory {
    next_sequence: AtomicU64,
}

impl PacketFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a packet from an already-typed request
    pub fn create(
        &self,
        packet_type: PacketType,
        payload: impl Into<Bytes>,
        compression_enabled: bool,
    ) -> PacketResult<Packet> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(PacketError::EmptyPayload);
        }

        let size_bytes = payload.len();
        let compressed_size =
            compression::compressed_size(packet_type, size_bytes, compression_enabled);

        Ok(Packet {
            id: Uuid::new_v4(),
            sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
            packet_type,
            payload,
            size_bytes,
            compressed_size,
            status: PacketStatus::Queued,
            created_at: chrono::Utc::now(),
        })
    }

    /// Build a packet from the textual form used at the API boundary
    pub fn create_from_text(
        &self,
        packet_type: &str,
        data: &str,
        compression_enabled: bool,
    ) -> PacketResult<Packet> {
        let packet_type: PacketType = packet_type.parse()?;
        self.create(
            packet_type,
            Bytes::copy_from_slice(data.as_bytes()),
            compression_enabled,
        )
    }
}
