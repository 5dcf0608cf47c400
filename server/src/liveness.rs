//! Keep-alive bookkeeping and eviction of silent participants
//!
//! Clients confirm they are alive with periodic keep-alives. A background
//! task sweeps the roster on a fixed interval and removes everyone whose
//! last keep-alive is older than the timeout, exactly as an explicit
//! disconnect would.

use crate::state::{Roster, StateStore};
use log::{debug, info};
use shared::ParticipantId;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

impl Roster {
    /// Refreshes a participant's liveness timestamp; false if unknown
    pub fn touch(&mut self, id: ParticipantId, now: Instant) -> bool {
        match self.get_mut(id) {
            Some(participant) => {
                participant.last_seen = now;
                true
            }
            None => false,
        }
    }

    /// Removes every participant idle for longer than `timeout`
    pub fn evict_idle(&mut self, now: Instant, timeout: Duration) -> Vec<ParticipantId> {
        let idle: Vec<ParticipantId> = self
            .iter()
            .filter(|p| p.is_timed_out(now, timeout))
            .map(|p| p.id)
            .collect();

        for id in &idle {
            self.release(*id);
        }

        idle
    }
}

impl StateStore {
    pub async fn keep_alive(&self, id: ParticipantId) {
        let known = self
            .with_state(|_, roster| roster.touch(id, Instant::now()))
            .await;
        if !known {
            debug!("Keep-alive for unknown participant {} ignored", id);
        }
    }

    /// One eviction pass; returns the ids that were removed
    pub async fn sweep(&self, timeout: Duration) -> Vec<ParticipantId> {
        let evicted = self
            .with_state(|_, roster| roster.evict_idle(Instant::now(), timeout))
            .await;

        for id in &evicted {
            info!("Participant {} disconnected due to inactivity", id);
        }

        evicted
    }
}

/// Spawns the periodic sweep task
pub fn spawn_liveness_monitor(
    store: StateStore,
    sweep_interval: Duration,
    timeout: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // the first tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            store.sweep(timeout).await;
        }
    })
}
