//! Server configuration with the defaults used by the stock deployment

use shared::{DEFAULT_PORT, SPAWN_X, SPAWN_Y};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAP_PATH: &str = "map.txt";
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);
/// Three missed keep-alives at the client's 5 second cadence
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub map_path: PathBuf,
    pub sweep_interval: Duration,
    pub liveness_timeout: Duration,
    pub spawn: (i32, i32),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            map_path: PathBuf::from(DEFAULT_MAP_PATH),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
            spawn: (SPAWN_X, SPAWN_Y),
        }
    }
}
