//! Authoritative world state behind a single exclusive lock
//!
//! The grid is shared read-only and never locked. Everything that changes at
//! runtime (participant positions, sequence bookkeeping, liveness timestamps
//! and the id counter) lives in one [`Roster`] guarded by one mutex, so a
//! participant's record and all of its bookkeeping are always created,
//! updated and removed together.

use crate::grid::Grid;
use shared::{Cell, ParticipantId, ParticipantView, Snapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// A connected participant and its command/liveness bookkeeping
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub x: i32,
    pub y: i32,
    pub appearance: Cell,
    /// Highest sequence number of a move that was actually applied
    pub last_applied_sequence: i64,
    /// Last time a keep-alive was received
    pub last_seen: Instant,
}

impl Participant {
    pub fn new(id: ParticipantId, x: i32, y: i32, appearance: Cell, now: Instant) -> Self {
        Self {
            id,
            x,
            y,
            appearance,
            last_applied_sequence: 0,
            last_seen: now,
        }
    }

    pub fn view(&self) -> ParticipantView {
        ParticipantView {
            id: self.id,
            x: self.x,
            y: self.y,
            appearance: self.appearance,
        }
    }

    pub fn is_timed_out(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > timeout
    }
}

/// Live participants plus the id counter
#[derive(Debug)]
pub struct Roster {
    participants: HashMap<ParticipantId, Participant>,
    /// Next id to hand out; only ever increases
    next_id: ParticipantId,
    spawn: (i32, i32),
}

impl Roster {
    pub fn new(spawn: (i32, i32)) -> Self {
        Self {
            participants: HashMap::new(),
            next_id: 1,
            spawn,
        }
    }

    pub fn spawn(&self) -> (i32, i32) {
        self.spawn
    }

    pub(crate) fn allocate_id(&mut self) -> ParticipantId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, participant: Participant) {
        self.participants.insert(participant.id, participant);
    }

    pub(crate) fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        self.participants.remove(&id)
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.get_mut(&id)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Any participant standing on (x, y)
    pub fn occupant_at(&self, x: i32, y: i32) -> Option<ParticipantId> {
        self.participants
            .values()
            .find(|p| p.x == x && p.y == y)
            .map(|p| p.id)
    }

    pub fn views(&self) -> HashMap<ParticipantId, ParticipantView> {
        self.participants
            .iter()
            .map(|(id, participant)| (*id, participant.view()))
            .collect()
    }
}

/// Sole owner of the grid and the roster.
///
/// Cloning is cheap and every clone refers to the same state. Each public
/// operation takes the roster lock exactly once, runs synchronously to
/// completion and releases it before returning.
#[derive(Debug, Clone)]
pub struct StateStore {
    grid: Arc<Grid>,
    roster: Arc<Mutex<Roster>>,
}

impl StateStore {
    pub fn new(grid: Grid, spawn: (i32, i32)) -> Self {
        Self {
            grid: Arc::new(grid),
            roster: Arc::new(Mutex::new(Roster::new(spawn))),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Runs `f` with exclusive access to the roster and returns its result
    pub async fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Grid, &mut Roster) -> R,
    {
        let mut roster = self.roster.lock().await;
        f(&self.grid, &mut roster)
    }

    /// Consistent copy of grid and participants.
    ///
    /// Participants are captured inside one critical section; the grid is
    /// immutable, so it is copied after the lock is released.
    pub async fn snapshot(&self) -> Snapshot {
        let participants = self.with_state(|_, roster| roster.views()).await;
        Snapshot {
            grid: self.grid.to_rows(),
            participants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::DEFAULT_APPEARANCE;

    fn test_store() -> StateStore {
        StateStore::new(Grid::parse("   \n   "), (1, 1))
    }

    #[test]
    fn test_participant_timeout_boundary() {
        let start = Instant::now();
        let participant = Participant::new(1, 0, 0, DEFAULT_APPEARANCE, start);
        let timeout = Duration::from_secs(15);

        assert!(!participant.is_timed_out(start + Duration::from_secs(15), timeout));
        assert!(participant.is_timed_out(start + Duration::from_secs(16), timeout));
        // a clock reading older than last_seen never counts as idle
        if let Some(earlier) = start.checked_sub(Duration::from_secs(1)) {
            assert!(!participant.is_timed_out(earlier, timeout));
        }
    }

    #[test]
    fn test_roster_ids_increase() {
        let mut roster = Roster::new((0, 0));
        assert_eq!(roster.allocate_id(), 1);
        assert_eq!(roster.allocate_id(), 2);
        assert_eq!(roster.allocate_id(), 3);
    }

    #[test]
    fn test_roster_occupant_lookup() {
        let now = Instant::now();
        let mut roster = Roster::new((0, 0));
        roster.insert(Participant::new(4, 2, 1, DEFAULT_APPEARANCE, now));

        assert_eq!(roster.occupant_at(2, 1), Some(4));
        assert_eq!(roster.occupant_at(1, 2), None);
        assert!(roster.contains(4));
        assert_eq!(roster.len(), 1);

        roster.remove(4);
        assert!(roster.is_empty());
        assert_eq!(roster.occupant_at(2, 1), None);
    }

    #[tokio::test]
    async fn test_with_state_returns_closure_result() {
        let store = test_store();

        let height = store.with_state(|grid, _| grid.height()).await;
        assert_eq!(height, 2);

        let id = store
            .with_state(|_, roster| {
                let id = roster.allocate_id();
                roster.insert(Participant::new(id, 0, 0, DEFAULT_APPEARANCE, Instant::now()));
                id
            })
            .await;
        assert!(store.with_state(|_, roster| roster.contains(id)).await);
    }

    #[tokio::test]
    async fn test_snapshot_copies_grid_and_participants() {
        let store = test_store();
        store
            .with_state(|_, roster| {
                roster.insert(Participant::new(9, 2, 0, DEFAULT_APPEARANCE, Instant::now()));
            })
            .await;

        let snapshot = store.snapshot().await;

        assert_eq!(snapshot.grid, store.grid().to_rows());
        assert_eq!(snapshot.participants.len(), 1);
        let view = snapshot.participants[&9];
        assert_eq!((view.x, view.y), (2, 0));

        // later mutations do not leak into an already taken snapshot
        store
            .with_state(|_, roster| {
                if let Some(p) = roster.get_mut(9) {
                    p.x = 0;
                }
            })
            .await;
        assert_eq!(snapshot.participants[&9].x, 2);
    }
}
