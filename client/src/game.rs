use crate::network::SessionStatus;
use shared::{ParticipantId, ParticipantView, Snapshot};

/// Everything the client knows; replaced wholesale on every poll
#[derive(Debug, Clone)]
pub struct ClientGameState {
    pub participant_id: ParticipantId,
    pub snapshot: Snapshot,
    pub status: SessionStatus,
    pub snapshots_received: u64,
}

impl ClientGameState {
    pub fn new(participant_id: ParticipantId, snapshot: Snapshot) -> Self {
        Self {
            participant_id,
            snapshot,
            status: SessionStatus::Connected,
            snapshots_received: 1,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.snapshots_received += 1;
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    pub fn me(&self) -> Option<&ParticipantView> {
        self.snapshot.participants.get(&self.participant_id)
    }

    pub fn own_position(&self) -> Option<(i32, i32)> {
        self.me().map(|p| (p.x, p.y))
    }

    /// False once the server has dropped us from the world
    pub fn is_present(&self) -> bool {
        self.me().is_some()
    }

    pub fn participant_count(&self) -> usize {
        self.snapshot.participants.len()
    }

    /// Participants sorted by id, for stable draw order
    pub fn participants(&self) -> Vec<&ParticipantView> {
        let mut participants: Vec<&ParticipantView> = self.snapshot.participants.values().collect();
        participants.sort_by_key(|p| p.id);
        participants
    }

    pub fn status_line(&self) -> String {
        let position = match self.own_position() {
            Some((x, y)) => format!("({}, {})", x, y),
            None => "not in world".to_string(),
        };
        let connection = match &self.status {
            SessionStatus::Connected => "connected".to_string(),
            SessionStatus::Lost(reason) => format!("lost: {}", reason),
        };

        format!(
            "Participant {} at {} | {} online | {}",
            self.participant_id,
            position,
            self.participant_count(),
            connection
        )
    }
}
