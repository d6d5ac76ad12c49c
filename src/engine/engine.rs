use crate::engine::error::{LinkError, LinkResult};
use crate::events::{LinkEvent, DEFAULT_EVENT_CAPACITY};
use crate::history::HistoryEntry;
use crate::link::LinkConfig;
use crate::metrics;
use crate::packet::{Packet, PacketFactory, PacketId, PacketType};
use crate::queue::QueueStats;
use crate::scheduler::{
    Clock, FailureModel, FailurePolicy, LinkState, StartOutcome, TokioClock, TransmissionScheduler,
};
use crate::stats::LinkStats;
use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Simulated deep-space link: packet creation, the transmission queue,
/// the scheduler, history and stats behind one lock.
///
/// Cheap to clone; clones share the same link.
pub struct LinkEngine {
    state: Arc<RwLock<LinkState>>,
    factory: Arc<PacketFactory>,
    scheduler: TransmissionScheduler,
    events: broadcast::Sender<LinkEvent>,
}

pub struct LinkEngineBuilder {
    config: LinkConfig,
    clock: Option<Arc<dyn Clock>>,
    failure: FailurePolicy,
    event_capacity: usize,
}

impl Default for LinkEngineBuilder {
    fn default() -> Self {
        Self {
            config: LinkConfig::default(),
            clock: None,
            failure: FailurePolicy::Never,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl LinkEngineBuilder {
    pub fn config(mut self, config: LinkConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn failure_policy(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> LinkResult<LinkEngine> {
        self.config.validate()?;
        let failure = FailureModel::new(self.failure)?;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(TokioClock::new()) as Arc<dyn Clock>);

        let state = Arc::new(RwLock::new(LinkState::new(self.config, failure)));
        let (events, _) = broadcast::channel(self.event_capacity);
        let scheduler = TransmissionScheduler::new(state.clone(), clock, events.clone());

        Ok(LinkEngine {
            state,
            factory: Arc::new(PacketFactory::new()),
            scheduler,
            events,
        })
    }
}

impl Default for LinkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkEngine {
    /// Engine with the default Earth-Moon link and a real-time clock
    pub fn new() -> Self {
        let failure = FailureModel::default();
        let state = Arc::new(RwLock::new(LinkState::new(LinkConfig::default(), failure)));
        let (events, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        let scheduler =
            TransmissionScheduler::new(state.clone(), Arc::new(TokioClock::new()), events.clone());

        Self {
            state,
            factory: Arc::new(PacketFactory::new()),
            scheduler,
            events,
        }
    }

    pub fn builder() -> LinkEngineBuilder {
        LinkEngineBuilder::default()
    }

    /// Validate, build and enqueue a packet.
    ///
    /// Compression follows the configuration current at the moment of
    /// creation. On error nothing is enqueued.
    pub fn create_packet(
        &self,
        packet_type: PacketType,
        payload: impl Into<Bytes>,
    ) -> LinkResult<Packet> {
        let packet = {
            let mut state = self.state.write();
            let packet =
                self.factory
                    .create(packet_type, payload, state.config.compression_enabled)?;
            state.queue.enqueue(packet.clone());
            metrics::set_queue_depth(state.queue.len());
            packet
        };

        debug!(
            packet_id = %packet.id,
            packet_type = %packet.packet_type,
            size = packet.size_bytes,
            compressed = packet.compressed_size,
            "Packet queued"
        );
        metrics::record_packet_created(
            packet.packet_type.as_str(),
            packet.size_bytes,
            packet.compressed_size,
        );
        let _ = self.events.send(LinkEvent::PacketQueued {
            packet_id: packet.id,
            packet_type: packet.packet_type,
            compressed_size: packet.compressed_size,
        });
        Ok(packet)
    }

    /// [`create_packet`](Self::create_packet) from the textual API form
    pub fn create_packet_from_text(&self, packet_type: &str, data: &str) -> LinkResult<Packet> {
        let packet_type: PacketType = packet_type.parse()?;
        self.create_packet(packet_type, Bytes::copy_from_slice(data.as_bytes()))
    }

    /// Every packet not yet terminal, in dispatch order
    pub fn list_packets(&self) -> Vec<Packet> {
        self.state.read().packets()
    }

    pub fn get_packet(&self, id: &PacketId) -> LinkResult<Packet> {
        self.state
            .read()
            .find_packet(id)
            .cloned()
            .ok_or(LinkError::PacketNotFound(*id))
    }

    /// Drop every packet still waiting. The in-flight packet is untouched.
    pub fn clear_queue(&self) -> usize {
        let removed = {
            let mut state = self.state.write();
            let removed = state.queue.clear();
            metrics::set_queue_depth(state.queue.len());
            removed
        };

        info!(removed, "Queue cleared");
        metrics::record_packets_cleared(removed);
        let _ = self.events.send(LinkEvent::QueueCleared { removed });
        removed
    }

    /// Trigger the drain; returns without waiting for any transmission
    pub fn start_transmission(&self) -> StartOutcome {
        self.scheduler.start()
    }

    pub fn is_transmitting(&self) -> bool {
        self.scheduler.is_draining()
    }

    pub fn stats(&self) -> LinkStats {
        let now = self.scheduler.clock().now();
        self.state.read().stats(now)
    }

    pub fn queue_stats(&self) -> QueueStats {
        self.state.read().queue.stats()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().history.entries().to_vec()
    }

    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.state.read().history.recent(limit).to_vec()
    }

    pub fn config(&self) -> LinkConfig {
        self.state.read().config
    }

    /// Replace the whole configuration, or reject it and keep the old one
    pub fn update_config(&self, config: LinkConfig) -> LinkResult<()> {
        config.validate()?;
        self.state.write().config = config;

        info!(
            distance_km = config.distance_km,
            bandwidth_bps = config.bandwidth_bps,
            compression = config.compression_enabled,
            latency_scale = config.latency_scale_factor,
            "Link config updated"
        );
        let _ = self.events.send(LinkEvent::ConfigUpdated(config));
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LinkEvent> {
        self.events.subscribe()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.scheduler.clock().clone()
    }
}

impl Clone for LinkEngine {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            factory: self.factory.clone(),
            scheduler: self.scheduler.clone(),
            events: self.events.clone(),
        }
    }
}
