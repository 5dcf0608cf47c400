//! Movement commands with per-participant ordering and collision rules
//!
//! A move carries a sequence number chosen by the client. Anything at or
//! below the participant's last *applied* sequence is a replay and is
//! acknowledged without touching state. Only an applied move advances the
//! counter, so a blocked command can be retried and is evaluated again.

use crate::error::EngineError;
use crate::grid::Grid;
use crate::state::{Roster, StateStore};
use log::{debug, warn};
use shared::{Direction, ParticipantId};

/// Why a target cell was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    OutOfBounds,
    Impassable,
    Occupied(ParticipantId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Position changed to (x, y)
    Applied { x: i32, y: i32 },
    /// Sequence already covered by an applied move; nothing changed
    Replayed,
    /// Command evaluated and disallowed; nothing changed
    Blocked(Blocked),
}

impl MoveOutcome {
    pub fn success(&self) -> bool {
        !matches!(self, MoveOutcome::Blocked(_))
    }
}

/// Validates and applies one move against the given state
pub fn apply_move(
    grid: &Grid,
    roster: &mut Roster,
    id: ParticipantId,
    sequence: i64,
    direction: Direction,
) -> Result<MoveOutcome, EngineError> {
    let (x, y, last_applied) = match roster.get(id) {
        Some(p) => (p.x, p.y, p.last_applied_sequence),
        None => return Err(EngineError::NotFound(id)),
    };

    if sequence <= last_applied {
        return Ok(MoveOutcome::Replayed);
    }

    let (dx, dy) = direction.delta();
    let target = match (x.checked_add(dx), y.checked_add(dy)) {
        (Some(nx), Some(ny)) => (nx, ny),
        _ => return Ok(MoveOutcome::Blocked(Blocked::OutOfBounds)),
    };

    if let Some(blocked) = check_target(grid, roster, target) {
        return Ok(MoveOutcome::Blocked(blocked));
    }

    let (nx, ny) = target;
    if let Some(participant) = roster.get_mut(id) {
        participant.x = nx;
        participant.y = ny;
        participant.last_applied_sequence = sequence;
    }

    Ok(MoveOutcome::Applied { x: nx, y: ny })
}

fn check_target(grid: &Grid, roster: &Roster, (x, y): (i32, i32)) -> Option<Blocked> {
    let cell = match grid.cell(x, y) {
        Some(cell) => cell,
        None => return Some(Blocked::OutOfBounds),
    };

    if !cell.passable {
        return Some(Blocked::Impassable);
    }

    roster.occupant_at(x, y).map(Blocked::Occupied)
}

impl StateStore {
    /// Moves a participant one cell; `Ok(false)` means the move was refused
    pub async fn move_participant(
        &self,
        id: ParticipantId,
        sequence: i64,
        direction: Direction,
    ) -> Result<bool, EngineError> {
        let outcome = self
            .with_state(|grid, roster| apply_move(grid, roster, id, sequence, direction))
            .await;

        match outcome {
            Ok(MoveOutcome::Applied { x, y }) => {
                debug!("Participant {} moved to ({}, {})", id, x, y);
            }
            Ok(MoveOutcome::Replayed) => {
                debug!(
                    "Duplicate or stale move from participant {} (seq {}) ignored",
                    id, sequence
                );
            }
            Ok(MoveOutcome::Blocked(reason)) => {
                debug!(
                    "Move {:?} of participant {} (seq {}) blocked: {:?}",
                    direction, id, sequence, reason
                );
            }
            Err(ref e) => warn!("Move rejected: {}", e),
        }

        outcome.map(|o| o.success())
    }
}
