use crate::history::HistoryLog;
use crate::link::{LinkConfig, LinkTiming};
use crate::packet::{Packet, PacketId};
use crate::queue::TransmissionQueue;
use crate::scheduler::failure::FailureModel;
use crate::stats::{aggregate, LinkStats, StatsInput};
use std::time::Duration;

/// The packet currently occupying the channel
#[derive(Debug, Clone)]
pub struct InFlight {
    pub packet: Packet,
    pub timing: LinkTiming,
    pub bandwidth_bps: u32,
    pub started_at: Duration,
}

/// Everything guarded by the engine's single lock: configuration, queue
/// membership, the channel slot, packet status and history.
#[derive(Debug, Default)]
pub struct LinkState {
    pub(crate) config: LinkConfig,
    pub(crate) queue: TransmissionQueue,
    pub(crate) in_flight: Option<InFlight>,
    pub(crate) history: HistoryLog,
    pub(crate) first_dispatch_at: Option<Duration>,
    pub(crate) failure: FailureModel,
}

impl LinkState {
    pub fn new(config: LinkConfig, failure: FailureModel) -> Self {
        Self {
            config,
            failure,
            ..Self::default()
        }
    }

    /// All packets not yet terminal, in dispatch order: the in-flight
    /// packet first, then the queue.
    pub fn packets(&self) -> Vec<Packet> {
        self.in_flight
            .iter()
            .map(|f| &f.packet)
            .chain(self.queue.iter())
            .cloned()
            .collect()
    }

    pub fn find_packet(&self, id: &PacketId) -> Option<&Packet> {
        self.in_flight
            .as_ref()
            .map(|f| &f.packet)
            .filter(|p| p.id == *id)
            .or_else(|| self.queue.get(id))
    }

    pub fn stats(&self, now: Duration) -> LinkStats {
        let packets = self.packets();

        let window = self
            .first_dispatch_at
            .map(|first| now.saturating_sub(first).as_secs_f64())
            .unwrap_or(0.0);

        let in_flight_elapsed = self
            .in_flight
            .as_ref()
            .map(|f| {
                now.saturating_sub(f.started_at)
                    .as_secs_f64()
                    .min(f.timing.total_seconds())
            })
            .unwrap_or(0.0);

        aggregate(&StatsInput {
            packets: &packets,
            history: self.history.entries(),
            in_flight_elapsed,
            window,
        })
    }
}
