//! Compression model for outbound packets
//!
//! Packets are never actually compressed on the simulated link. The model
//! estimates the on-air size from a fixed per-type reduction policy, so the
//! same payload always yields the same compressed size and compression
//! statistics are reproducible.

use crate::packet::types::PacketType;

/// Compressed size as a fraction of the original, in permille.
///
/// Logs are structured text and shrink the most. Science frames are dense
/// sensor data with little redundancy. Emergency messages are short and
/// irregular, so they get the smallest reduction.
pub const fn retained_permille(packet_type: PacketType) -> usize {
    match packet_type {
        PacketType::Emergency => 850,
        PacketType::Science => 700,
        PacketType::Logs => 350,
    }
}

/// Estimate the on-air size of a payload.
///
/// Returns `payload_len` unchanged when compression is disabled. Otherwise
/// the size is reduced by the per-type policy, rounded up, and kept within
/// `1..=payload_len`.
pub fn compressed_size(packet_type: PacketType, payload_len: usize, enabled: bool) -> usize {
    if !enabled {
        return payload_len;
    }

    let permille = retained_permille(packet_type);
    let estimate = payload_len.saturating_mul(permille).div_ceil(1000);
    estimate.clamp(1, payload_len.max(1))
}

/// Calculate compression ratio
pub fn compression_ratio(original_size: usize, compressed_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (1.0 - (compressed_size as f64 / original_size as f64)).clamp(0.0, 1.0)
}
