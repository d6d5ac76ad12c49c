//! Stats aggregation
//!
//! Ratios are measured over an observation window that opens at the first
//! dispatch and closes at the moment of the read, in simulated seconds.
//!
//! - `bandwidth_utilization`: channel busy time over the window
//! - `average_compression_ratio`: mean of `1 - compressed/size` over every
//!   packet still held plus every history entry
//! - `transmission_efficiency`: link-time the raw payloads of delivered
//!   packets would have needed, over that same time plus every second of
//!   the window not spent serializing delivered bits. Compression raises
//!   it; idle gaps, propagation and failed sends lower it.

use crate::history::HistoryEntry;
use crate::link::serialization_delay;
use crate::packet::{compression_ratio, Packet, PacketStatus};
use crate::stats::types::LinkStats;

/// Everything the aggregator reads, taken from one consistent snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StatsInput<'a> {
    /// Queued packets plus the in-flight one, if any
    pub packets: &'a [Packet],
    pub history: &'a [HistoryEntry],
    /// How long the in-flight packet has been on the link
    pub in_flight_elapsed: f64,
    /// Length of the observation window, 0.0 before the first dispatch
    pub window: f64,
}

pub fn aggregate(input: &StatsInput<'_>) -> LinkStats {
    let history = input.history;

    let packets_transmitted = history.iter().filter(|e| !e.is_failed()).count();
    let packets_queued = input
        .packets
        .iter()
        .filter(|p| p.status == PacketStatus::Queued)
        .count();

    let busy: f64 =
        history.iter().map(|e| e.transmission_time).sum::<f64>() + input.in_flight_elapsed.max(0.0);
    let bandwidth_utilization = bounded_ratio(busy, input.window);

    let ratios = input
        .packets
        .iter()
        .map(|p| compression_ratio(p.size_bytes, p.compressed_size))
        .chain(
            history
                .iter()
                .map(|e| compression_ratio(e.original_size, e.size)),
        );
    let (sum, count) = ratios.fold((0.0, 0usize), |(s, n), r| (s + r, n + 1));
    let average_compression_ratio = bounded_ratio(sum, count as f64);

    let (useful, delivered) = history
        .iter()
        .filter(|e| !e.is_failed())
        .fold((0.0, 0.0), |(useful, sent), e| {
            (
                useful + serialization_delay(e.original_size, e.bandwidth_bps),
                sent + e.serialization_delay,
            )
        });
    let overhead = (input.window - delivered).max(0.0);
    let transmission_efficiency = if input.window > 0.0 {
        bounded_ratio(useful, useful + overhead)
    } else {
        0.0
    };

    LinkStats {
        total_packets: history.len() + input.packets.len(),
        packets_transmitted,
        packets_queued,
        bandwidth_utilization,
        average_compression_ratio,
        transmission_efficiency,
    }
}

/// `numerator / denominator` clamped to [0, 1]; 0 for an empty or broken denominator
fn bounded_ratio(numerator: f64, denominator: f64) -> f64 {
    if !denominator.is_finite() || denominator <= 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
