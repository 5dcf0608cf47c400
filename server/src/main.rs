use clap::Parser;
use log::{error, info, warn};
use server::config::{DEFAULT_LIVENESS_TIMEOUT, DEFAULT_MAP_PATH, DEFAULT_SWEEP_INTERVAL};
use server::{spawn_liveness_monitor, Grid, Server, ServerConfig, StateStore};
use shared::{DEFAULT_PORT, SPAWN_X, SPAWN_Y};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map file, one grid row per line
    #[arg(default_value = DEFAULT_MAP_PATH)]
    map: PathBuf,

    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Seconds between liveness sweeps
    #[arg(long, default_value_t = DEFAULT_SWEEP_INTERVAL.as_secs())]
    sweep_interval_secs: u64,

    /// Seconds without keep-alive before a participant is evicted
    #[arg(long, default_value_t = DEFAULT_LIVENESS_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Spawn column for new participants
    #[arg(long, default_value_t = SPAWN_X)]
    spawn_x: i32,

    /// Spawn row for new participants
    #[arg(long, default_value_t = SPAWN_Y)]
    spawn_y: i32,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind_addr: format!("{}:{}", args.host, args.port),
            map_path: args.map,
            sweep_interval: Duration::from_secs(args.sweep_interval_secs.max(1)),
            liveness_timeout: Duration::from_secs(args.timeout_secs),
            spawn: (args.spawn_x, args.spawn_y),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ServerConfig::from(Args::parse());

    let grid = match Grid::load(&config.map_path) {
        Ok(grid) => grid,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let (spawn_x, spawn_y) = config.spawn;
    if !grid.is_passable(spawn_x, spawn_y) {
        warn!(
            "Spawn point ({}, {}) is outside the map or not passable",
            spawn_x, spawn_y
        );
    }

    let store = StateStore::new(grid, config.spawn);
    let monitor = spawn_liveness_monitor(
        store.clone(),
        config.sweep_interval,
        config.liveness_timeout,
    );
    info!(
        "Liveness sweep every {:?}, timeout {:?}",
        config.sweep_interval, config.liveness_timeout
    );

    let server = Server::bind(&config.bind_addr, store).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    monitor.abort();
    Ok(())
}
