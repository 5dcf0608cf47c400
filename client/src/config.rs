//! Client configuration: server address and the polling cadence

use shared::DEFAULT_PORT;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_CELL_SIZE: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_addr: String,
    pub poll_interval: Duration,
    pub keepalive_interval: Duration,
    /// Pause before retrying a failed state poll
    pub retry_delay: Duration,
    pub cell_size: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: format!("127.0.0.1:{}", DEFAULT_PORT),
            poll_interval: DEFAULT_POLL_INTERVAL,
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            retry_delay: DEFAULT_RETRY_DELAY,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}
