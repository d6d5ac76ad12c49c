//! Concurrent engine stress tests
//!
//! Producers, readers and clears hammer one engine while a fast clock
//! drains it on a multi-threaded runtime.

use deepspace_link::link::LinkConfig;
use deepspace_link::packet::{PacketStatus, PacketType};
use deepspace_link::scheduler::{FailurePolicy, TokioClock};
use deepspace_link::LinkEngine;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::{timeout, Duration};

fn fast_engine(failure: FailurePolicy) -> LinkEngine {
    LinkEngine::builder()
        .config(LinkConfig {
            distance_km: 384_400.0,
            bandwidth_bps: 1_000_000,
            compression_enabled: true,
            latency_scale_factor: 0.001,
        })
        .clock(Arc::new(TokioClock::with_rate(10_000.0).unwrap()))
        .failure_policy(failure)
        .event_capacity(16_384)
        .build()
        .unwrap()
}

async fn wait_until_idle(engine: &LinkEngine) {
    timeout(Duration::from_secs(30), async {
        loop {
            engine.start_transmission();
            if !engine.is_transmitting() && engine.list_packets().is_empty() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("drain did not finish");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_deliver_everything_once() {
    println!("\n=== Concurrent producers ===\n");
    let engine = fast_engine(FailurePolicy::Never);
    let start = Instant::now();

    let mut producers = Vec::new();
    for worker in 0..8 {
        let engine = engine.clone();
        producers.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for i in 0..50 {
                let packet_type = PacketType::ALL[(worker + i) % 3];
                let packet = engine
                    .create_packet(packet_type, format!("w{worker} p{i}").into_bytes())
                    .unwrap();
                ids.push(packet.id);
                engine.start_transmission();
                if i % 10 == 0 {
                    tokio::task::yield_now().await;
                }
            }
            ids
        }));
    }

    let mut created = HashSet::new();
    for producer in producers {
        created.extend(producer.await.unwrap());
    }
    wait_until_idle(&engine).await;

    let history = engine.history();
    let delivered: HashSet<_> = history.iter().map(|e| e.packet_id).collect();
    assert_eq!(history.len(), 400, "duplicate or missing history entries");
    assert_eq!(delivered, created);
    assert!(history
        .iter()
        .all(|e| e.outcome == PacketStatus::Transmitted));

    // One channel: transmissions never overlap
    for pair in history.windows(2) {
        assert!(pair[1].started_at >= pair[0].finished_at - 1e-6);
    }

    let stats = engine.stats();
    assert_eq!(stats.total_packets, 400);
    assert_eq!(stats.packets_transmitted, 400);
    println!("✓ 400 packets delivered in {:?}", start.elapsed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_packet_in_flight_under_load() {
    let engine = fast_engine(FailurePolicy::Probability {
        probability: 0.2,
        seed: 99,
    });
    let done = Arc::new(AtomicBool::new(false));

    let observer = {
        let engine = engine.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let mut max_in_flight = 0;
            while !done.load(Ordering::Acquire) {
                let in_flight = engine
                    .list_packets()
                    .iter()
                    .filter(|p| p.status == PacketStatus::Transmitting)
                    .count();
                max_in_flight = max_in_flight.max(in_flight);

                let stats = engine.stats();
                assert!((0.0..=1.0).contains(&stats.bandwidth_utilization));
                assert!((0.0..=1.0).contains(&stats.transmission_efficiency));
                tokio::task::yield_now().await;
            }
            max_in_flight
        })
    };

    let clearer = {
        let engine = engine.clone();
        tokio::spawn(async move {
            let mut removed = 0;
            for _ in 0..20 {
                removed += engine.clear_queue();
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            removed
        })
    };

    for i in 0..300 {
        engine
            .create_packet_from_text("science", &format!("frame {i}"))
            .unwrap();
        engine.start_transmission();
    }

    let removed = clearer.await.unwrap();
    wait_until_idle(&engine).await;
    done.store(true, Ordering::Release);
    let max_in_flight = observer.await.unwrap();

    assert!(max_in_flight <= 1);
    assert_eq!(engine.history().len() + removed, 300);
    assert_eq!(engine.queue_stats().total_cleared as usize, removed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_lagging_subscriber_does_not_stall_drain() {
    let engine = LinkEngine::builder()
        .clock(Arc::new(TokioClock::with_rate(100_000.0).unwrap()))
        .event_capacity(4)
        .build()
        .unwrap();
    let mut rx = engine.subscribe();

    for i in 0..50 {
        engine
            .create_packet_from_text("logs", &format!("line {i}"))
            .unwrap();
    }
    engine.start_transmission();
    wait_until_idle(&engine).await;

    assert_eq!(engine.history().len(), 50);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(_))));
}
