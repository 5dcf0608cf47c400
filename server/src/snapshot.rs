//! Read-only export of the world for polling consumers

use crate::state::StateStore;
use shared::Snapshot;

impl StateStore {
    /// Full copy of the current grid and participants. Never fails.
    pub async fn get_state(&self) -> Snapshot {
        self.snapshot().await
    }
}
