use deepspace_link::events::LinkEvent;
use deepspace_link::link::LinkConfig;
use deepspace_link::packet::PacketType;
use deepspace_link::scheduler::TokioClock;
use deepspace_link::LinkEngine;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    println!("\n🛰  Deep-Space Link Demo");
    println!("========================\n");

    // Mars at closest approach, sped up 20x so the demo finishes quickly
    let config = LinkConfig {
        distance_km: 54_600_000.0,
        bandwidth_bps: 4096,
        compression_enabled: true,
        latency_scale_factor: 0.05,
    };
    let engine = LinkEngine::builder()
        .config(config)
        .clock(Arc::new(TokioClock::with_rate(20.0).unwrap()))
        .build()
        .unwrap();

    println!("📡 Link: {:.0} km, {} bps, latency scale {}", config.distance_km, config.bandwidth_bps, config.latency_scale_factor);

    // Demo 1: Queue packets out of priority order
    println!("\n📦 Demo 1: Queue packets");
    println!("-----------------------------------");
    let packets = [
        (PacketType::Logs, "boot sequence nominal; heater 2 cycling; battery 94%"),
        (PacketType::Science, "spectrometer frame 0042: 512 channels, 16-bit samples"),
        (PacketType::Emergency, "SAFE MODE ENTERED"),
        (PacketType::Logs, "attitude control: reaction wheel 3 temp 41C"),
    ];
    for (packet_type, data) in packets {
        let packet = engine.create_packet(packet_type, data.as_bytes().to_vec()).unwrap();
        println!(
            "   + {:<9} {:>3} B -> {:>3} B  ({})",
            packet.packet_type, packet.size_bytes, packet.compressed_size, packet.id
        );
    }

    println!("\n   Dispatch order:");
    for packet in engine.list_packets() {
        println!("   {} {}", packet.priority(), packet.packet_type);
    }

    // Demo 2: Drain the queue
    println!("\n🚀 Demo 2: Transmit");
    println!("-----------------------------------");
    let mut events = engine.subscribe();
    println!("   start: {:?}", engine.start_transmission());

    while let Ok(event) = events.recv().await {
        match event {
            LinkEvent::TransmissionStarted { packet_type, expected_duration, .. } => {
                println!("   -> {packet_type:<9} on the link for {expected_duration:.2}s simulated");
            }
            LinkEvent::TransmissionFinished(entry) => {
                println!("   <- {:<9} {} ({} B)", entry.packet_type, entry.outcome, entry.size);
            }
            LinkEvent::DrainIdle => break,
            _ => {}
        }
    }

    // Demo 3: Stats
    println!("\n📊 Demo 3: Link stats");
    println!("-----------------------------------");
    let stats = engine.stats();
    println!("   Packets transmitted:   {}", stats.packets_transmitted);
    println!("   Packets queued:        {}", stats.packets_queued);
    println!("   Bandwidth utilization: {:.1}%", stats.bandwidth_utilization * 100.0);
    println!("   Avg compression:       {:.1}%", stats.average_compression_ratio * 100.0);
    println!("   Efficiency:            {:.1}%", stats.transmission_efficiency * 100.0);

    println!("\n✅ Demo complete\n");
}
