//! Joining and leaving the world

use crate::state::{Participant, Roster, StateStore};
use log::{info, warn};
use shared::{Attr, Cell, ParticipantId, Snapshot};
use tokio::time::Instant;

pub const DEFAULT_APPEARANCE: Cell = Cell::new('☺', Attr::WHITE, Attr::DEFAULT, false);

impl Roster {
    /// Creates a participant at the spawn point and returns its new id.
    ///
    /// The spawn cell is not checked for occupancy or passability, so two
    /// fresh participants can share it until one of them moves away. The
    /// overlap is logged rather than prevented.
    pub fn admit(&mut self, now: Instant) -> ParticipantId {
        let id = self.allocate_id();
        let (x, y) = self.spawn();

        if let Some(other) = self.occupant_at(x, y) {
            warn!(
                "Participant {} spawns at ({}, {}) already occupied by participant {}",
                id, x, y, other
            );
        }

        self.insert(Participant::new(id, x, y, DEFAULT_APPEARANCE, now));
        id
    }

    /// Drops a participant with all of its bookkeeping; false if unknown
    pub fn release(&mut self, id: ParticipantId) -> bool {
        self.remove(id).is_some()
    }
}

impl StateStore {
    /// Issues a new identity and returns it with the resulting world state
    pub async fn connect(&self) -> (ParticipantId, Snapshot) {
        let (id, participants) = self
            .with_state(|_, roster| {
                let id = roster.admit(Instant::now());
                (id, roster.views())
            })
            .await;

        info!("Participant {} connected", id);

        let state = Snapshot {
            grid: self.grid().to_rows(),
            participants,
        };
        (id, state)
    }

    /// Removes a participant; unknown ids are ignored
    pub async fn disconnect(&self, id: ParticipantId) {
        let removed = self.with_state(|_, roster| roster.release(id)).await;
        if removed {
            info!("Participant {} disconnected", id);
        }
    }
}
