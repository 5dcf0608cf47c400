//! Error types for the server crate.

use shared::ParticipantId;
use std::io;
use std::path::PathBuf;

/// Failures surfaced by engine operations.
///
/// A move that is blocked by a wall, the grid edge or another participant is
/// not an error; it is reported as an unsuccessful outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("participant {0} not found")]
    NotFound(ParticipantId),
}

/// Failures while ingesting the map at startup. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to load map from {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
