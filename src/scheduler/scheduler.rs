use crate::events::LinkEvent;
use crate::history::HistoryEntry;
use crate::link::LinkTiming;
use crate::metrics;
use crate::packet::{PacketId, PacketStatus, PacketType};
use crate::scheduler::clock::Clock;
use crate::scheduler::state::{InFlight, LinkState};
use crate::scheduler::state_machine;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// What a call to [`TransmissionScheduler::start`] did
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    QueueEmpty,
}

/// Commitment made when a packet takes the channel
#[derive(Debug, Clone, Copy)]
struct Dispatch {
    packet_id: PacketId,
    packet_type: PacketType,
    timing: LinkTiming,
    started_at: Duration,
}

impl Dispatch {
    fn deadline(&self) -> Duration {
        self.started_at.saturating_add(self.timing.total())
    }
}

/// Drains the queue over the single simulated channel.
///
/// At most one drain task exists at a time, and it holds at most one packet
/// in flight. The state lock is taken only to dispatch and to commit a
/// completion; it is never held across the transmission delay.
pub struct TransmissionScheduler {
    state: Arc<RwLock<LinkState>>,
    clock: Arc<dyn Clock>,
    draining: Arc<AtomicBool>,
    events: broadcast::Sender<LinkEvent>,
}

impl TransmissionScheduler {
    pub fn new(
        state: Arc<RwLock<LinkState>>,
        clock: Arc<dyn Clock>,
        events: broadcast::Sender<LinkEvent>,
    ) -> Self {
        Self {
            state,
            clock,
            draining: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    /// Start draining, or do nothing if a drain is already running or
    /// there is nothing to send. Returns immediately; must be called from
    /// within a Tokio runtime.
    pub fn start(&self) -> StartOutcome {
        if self.draining.load(Ordering::Acquire) {
            return StartOutcome::AlreadyRunning;
        }
        if self.state.read().queue.is_empty() {
            return StartOutcome::QueueEmpty;
        }
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return StartOutcome::AlreadyRunning;
        }

        info!("Starting transmission drain");
        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.drain().await;
        });
        StartOutcome::Started
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    async fn drain(self) {
        while let Some(dispatch) = self.dispatch_next() {
            self.clock.sleep_until(dispatch.deadline()).await;
            self.complete(dispatch);
        }
        debug!("Transmission drain idle");
        let _ = self.events.send(LinkEvent::DrainIdle);
    }

    /// Move the queue head onto the channel. Clears the draining flag under
    /// the lock when the queue is empty, so an enqueue can never slip
    /// between the last check and the drain exiting.
    fn dispatch_next(&self) -> Option<Dispatch> {
        let now = self.clock.now();
        let mut state = self.state.write();

        while let Some(mut packet) = state.queue.dequeue_next() {
            if let Err(e) = state_machine::transition(&mut packet, PacketStatus::Transmitting) {
                error!(packet_id = %packet.id, "Dropping packet: {e}");
                continue;
            }

            let config = state.config;
            let timing = LinkTiming::for_packet(&config, packet.compressed_size);
            let dispatch = Dispatch {
                packet_id: packet.id,
                packet_type: packet.packet_type,
                timing,
                started_at: now,
            };

            state.first_dispatch_at.get_or_insert(now);
            state.in_flight = Some(InFlight {
                packet,
                timing,
                bandwidth_bps: config.bandwidth_bps,
                started_at: now,
            });
            metrics::set_queue_depth(state.queue.len());
            drop(state);

            info!(
                packet_id = %dispatch.packet_id,
                packet_type = %dispatch.packet_type,
                seconds = timing.total_seconds(),
                "Transmitting packet"
            );
            metrics::record_transmission_started(dispatch.packet_type.as_str());
            let _ = self.events.send(LinkEvent::TransmissionStarted {
                packet_id: dispatch.packet_id,
                packet_type: dispatch.packet_type,
                started_at: now.as_secs_f64(),
                expected_duration: timing.total_seconds(),
            });
            return Some(dispatch);
        }

        self.draining.store(false, Ordering::Release);
        None
    }

    /// Commit the outcome of the in-flight packet and free the channel
    fn complete(&self, dispatch: Dispatch) {
        let entry = {
            let mut state = self.state.write();

            let Some(mut in_flight) = state.in_flight.take() else {
                error!(packet_id = %dispatch.packet_id, "Completion fired with an empty channel");
                return;
            };

            let outcome = if state.failure.should_fail() {
                PacketStatus::Failed
            } else {
                PacketStatus::Transmitted
            };
            if let Err(e) = state_machine::transition(&mut in_flight.packet, outcome) {
                error!(packet_id = %in_flight.packet.id, "{e}");
            }

            let started_at = in_flight.started_at.as_secs_f64();
            let entry = HistoryEntry {
                packet_id: in_flight.packet.id,
                packet_type: in_flight.packet.packet_type,
                outcome: in_flight.packet.status,
                size: in_flight.packet.compressed_size,
                original_size: in_flight.packet.size_bytes,
                transmission_time: in_flight.timing.total_seconds(),
                propagation_delay: in_flight.timing.propagation_delay,
                serialization_delay: in_flight.timing.serialization_delay,
                bandwidth_bps: in_flight.bandwidth_bps,
                started_at,
                finished_at: started_at + in_flight.timing.total_seconds(),
                timestamp: chrono::Utc::now(),
            };
            state.history.append(entry.clone());
            entry
        };

        if entry.is_failed() {
            warn!(packet_id = %entry.packet_id, "Transmission failed");
        } else {
            info!(
                packet_id = %entry.packet_id,
                bytes = entry.size,
                seconds = entry.transmission_time,
                "Packet transmitted"
            );
        }
        metrics::record_transmission_finished(
            entry.packet_type.as_str(),
            entry.outcome.as_str(),
            entry.size,
            Duration::from_secs_f64(entry.transmission_time.max(0.0)),
        );
        let _ = self.events.send(LinkEvent::TransmissionFinished(entry));
    }
}

impl Clone for TransmissionScheduler {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            clock: self.clock.clone(),
            draining: self.draining.clone(),
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkConfig;
    use crate::packet::PacketFactory;
    use crate::scheduler::clock::ManualClock;
    use crate::scheduler::failure::{FailureModel, FailurePolicy};

    struct Harness {
        scheduler: TransmissionScheduler,
        state: Arc<RwLock<LinkState>>,
        clock: ManualClock,
        events: broadcast::Receiver<LinkEvent>,
        factory: PacketFactory,
    }

    fn harness(failure: FailurePolicy) -> Harness {
        let config = LinkConfig {
            distance_km: 384_400.0,
            bandwidth_bps: 1000,
            compression_enabled: true,
            latency_scale_factor: 0.01,
        };
        let state = Arc::new(RwLock::new(LinkState::new(
            config,
            FailureModel::new(failure).unwrap(),
        )));
        let clock = ManualClock::new();
        let (tx, events) = broadcast::channel(64);
        let scheduler = TransmissionScheduler::new(state.clone(), Arc::new(clock.clone()), tx);

        Harness {
            scheduler,
            state,
            clock,
            events,
            factory: PacketFactory::new(),
        }
    }

    impl Harness {
        fn enqueue(&self, packet_type: PacketType, len: usize) -> PacketId {
            let packet = self
                .factory
                .create(packet_type, vec![0x5a; len], true)
                .unwrap();
            let id = packet.id;
            self.state.write().queue.enqueue(packet);
            id
        }

        async fn next_event(&mut self) -> LinkEvent {
            tokio::time::timeout(Duration::from_secs(5), self.events.recv())
                .await
                .expect("timed out waiting for event")
                .expect("event channel closed")
        }

        async fn expect_started(&mut self) -> (PacketId, f64) {
            match self.next_event().await {
                LinkEvent::TransmissionStarted {
                    packet_id,
                    expected_duration,
                    ..
                } => (packet_id, expected_duration),
                other => panic!("Expected TransmissionStarted, got {other:?}"),
            }
        }

        async fn expect_finished(&mut self) -> HistoryEntry {
            match self.next_event().await {
                LinkEvent::TransmissionFinished(entry) => entry,
                other => panic!("Expected TransmissionFinished, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_start_with_empty_queue() {
        let h = harness(FailurePolicy::Never);
        assert_eq!(h.scheduler.start(), StartOutcome::QueueEmpty);
        assert!(!h.scheduler.is_draining());
    }

    #[tokio::test]
    async fn test_single_packet_lifecycle() {
        let mut h = harness(FailurePolicy::Never);
        let id = h.enqueue(PacketType::Science, 1000);

        assert_eq!(h.scheduler.start(), StartOutcome::Started);
        let (started_id, expected) = h.expect_started().await;
        assert_eq!(started_id, id);

        {
            let state = h.state.read();
            let in_flight = state.in_flight.as_ref().unwrap();
            assert_eq!(in_flight.packet.status, PacketStatus::Transmitting);
            assert!(state.queue.is_empty());
            assert!(state.history.is_empty());
        }

        h.clock.advance_secs(expected);
        let entry = h.expect_finished().await;
        assert_eq!(entry.packet_id, id);
        assert_eq!(entry.outcome, PacketStatus::Transmitted);
        assert_eq!(entry.size, 700);

        assert!(matches!(h.next_event().await, LinkEvent::DrainIdle));
        assert!(!h.scheduler.is_draining());
        assert!(h.state.read().in_flight.is_none());
        assert_eq!(h.state.read().history.len(), 1);
    }

    #[tokio::test]
    async fn test_not_complete_before_deadline() {
        let mut h = harness(FailurePolicy::Never);
        h.enqueue(PacketType::Logs, 500);

        h.scheduler.start();
        let (_, expected) = h.expect_started().await;

        h.clock.advance_secs(expected / 2.0);
        tokio::task::yield_now().await;
        assert!(h.state.read().in_flight.is_some());
        assert!(h.state.read().history.is_empty());

        h.clock.advance_secs(expected);
        h.expect_finished().await;
    }

    #[tokio::test]
    async fn test_second_start_is_noop() {
        let mut h = harness(FailurePolicy::Never);
        h.enqueue(PacketType::Science, 100);
        h.enqueue(PacketType::Science, 100);

        assert_eq!(h.scheduler.start(), StartOutcome::Started);
        assert_eq!(h.scheduler.start(), StartOutcome::AlreadyRunning);

        for _ in 0..2 {
            let (_, expected) = h.expect_started().await;
            assert_eq!(h.scheduler.start(), StartOutcome::AlreadyRunning);
            h.clock.advance_secs(expected);
            h.expect_finished().await;
        }
        assert!(matches!(h.next_event().await, LinkEvent::DrainIdle));
        assert_eq!(h.state.read().history.len(), 2);
    }

    #[tokio::test]
    async fn test_channel_is_serial_and_priority_ordered() {
        let mut h = harness(FailurePolicy::Never);
        let logs = h.enqueue(PacketType::Logs, 64);
        let science = h.enqueue(PacketType::Science, 64);
        let emergency = h.enqueue(PacketType::Emergency, 64);

        h.scheduler.start();

        let mut order = Vec::new();
        for _ in 0..3 {
            let (id, expected) = h.expect_started().await;
            order.push(id);
            {
                let state = h.state.read();
                let transmitting = state
                    .packets()
                    .iter()
                    .filter(|p| p.status == PacketStatus::Transmitting)
                    .count();
                assert_eq!(transmitting, 1);
            }
            h.clock.advance_secs(expected);
            h.expect_finished().await;
        }

        assert_eq!(order, vec![emergency, science, logs]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_drain() {
        let mut h = harness(FailurePolicy::Probability {
            probability: 1.0,
            seed: 1,
        });
        h.enqueue(PacketType::Science, 10);
        h.enqueue(PacketType::Science, 10);

        h.scheduler.start();
        for _ in 0..2 {
            let (_, expected) = h.expect_started().await;
            h.clock.advance_secs(expected);
            let entry = h.expect_finished().await;
            assert_eq!(entry.outcome, PacketStatus::Failed);
            assert!(entry.transmission_time > 0.0);
        }
        let state = h.state.read();
        assert_eq!(state.history.len(), 2);
        assert!(state.history.entries().iter().all(|e| e.is_failed()));
    }

    #[tokio::test]
    async fn test_config_change_applies_to_next_packet() {
        let mut h = harness(FailurePolicy::Never);
        h.enqueue(PacketType::Science, 1000);
        h.enqueue(PacketType::Science, 1000);

        h.scheduler.start();
        let (_, first_expected) = h.expect_started().await;

        h.state.write().config.bandwidth_bps = 2000;

        h.clock.advance_secs(first_expected);
        let first = h.expect_finished().await;
        assert_eq!(first.bandwidth_bps, 1000);
        assert!((first.serialization_delay - 5.6).abs() < 1e-9);

        let (_, second_expected) = h.expect_started().await;
        h.clock.advance_secs(second_expected);
        let second = h.expect_finished().await;
        assert_eq!(second.bandwidth_bps, 2000);
        assert!((second.serialization_delay - 2.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_enqueue_while_draining_is_picked_up() {
        let mut h = harness(FailurePolicy::Never);
        h.enqueue(PacketType::Logs, 10);

        h.scheduler.start();
        let (_, expected) = h.expect_started().await;

        let late = h.enqueue(PacketType::Emergency, 10);
        assert_eq!(h.scheduler.start(), StartOutcome::AlreadyRunning);

        h.clock.advance_secs(expected);
        h.expect_finished().await;

        let (next, _) = h.expect_started().await;
        assert_eq!(next, late);
    }
}
