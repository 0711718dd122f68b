//! Battlefield Server - authoritative arena-shooter simulation
//!
//! This is the main entry point for the simulation server. It handles:
//! - Loading the static tile map and validating it
//! - Running the fixed-tick catch-up simulation loop
//! - Draining externally supplied intents once per iteration
//! - Handing snapshots and events to the publication seam

mod config;
mod game;
mod map;
mod transport;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::game::World;
use crate::map::TileMap;
use crate::transport::{BroadcastPublisher, IntentQueue, SharedPublisher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Battlefield Server");
    info!(map = %config.map_path.display(), tick_rate = config.tick_rate, "loading map");

    // An invalid or fully blocked map is a fatal configuration error
    let map = TileMap::load_json(&config.map_path, config.map_height, config.map_width)?;

    let seed = config.sim_seed.unwrap_or_else(rand::random);
    info!(seed, "seeding simulation");

    let world = World::new(
        map,
        config.tick_rate,
        Duration::from_secs(config.idle_timeout_secs),
        seed,
    );

    // The intent queue and publisher are the seams the transport layer
    // attaches to; the simulation never learns who is on the other side.
    let intents = Arc::new(IntentQueue::new());
    let (publisher, _updates) = BroadcastPublisher::new(64);
    let publisher: SharedPublisher = Arc::new(publisher);

    let sim = tokio::spawn(world.run(intents.clone(), publisher));

    tokio::select! {
        _ = sim => {}
        _ = shutdown_signal() => {
            info!("Server shutdown complete");
        }
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
