use anyhow::Context;
use clap::Parser;
use deepspace_link::api::create_api_server;
use deepspace_link::config::ServerSettings;
use deepspace_link::metrics;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = ServerSettings::parse();

    if settings.metrics {
        metrics::install_recorder().context("Failed to install metrics recorder")?;
        info!("Prometheus metrics enabled on /metrics");
    }

    let engine = settings
        .build_engine()
        .context("Invalid server settings")?;
    let config = engine.config();
    info!(
        distance_km = config.distance_km,
        bandwidth_bps = config.bandwidth_bps,
        compression = config.compression_enabled,
        latency_scale = config.latency_scale_factor,
        time_rate = settings.time_rate,
        "Link engine ready"
    );

    let app = create_api_server(engine);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    println!("\nDeep-space link server listening on http://{addr}");
    println!("   GET    /health                  - Liveness check");
    println!("   POST   /api/packets             - Create and queue a packet");
    println!("   GET    /api/packets             - List packets awaiting delivery");
    println!("   GET    /api/packets/:id         - Get one packet");
    println!("   DELETE /api/packets/clear       - Drop every queued packet");
    println!("   POST   /api/transmission/start  - Start draining the queue");
    println!("   GET    /api/config              - Current link config");
    println!("   POST   /api/config              - Replace link config");
    println!("   GET    /api/stats               - Link statistics");
    println!("   GET    /api/history             - Transmission history (?limit=N)");
    println!("   WS     /ws                      - Live link events\n");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
