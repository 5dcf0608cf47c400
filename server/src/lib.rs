//! # Grid World Server Library
//!
//! Authoritative server for a shared, grid-based multiplayer world. The server
//! holds the single source of truth for a static map and the set of connected
//! participants, and serializes concurrent movement commands against it.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! Positions are only ever changed here. Clients poll for snapshots and send
//! requests; they never write state directly.
//!
//! ### Ordered, Idempotent Commands
//! Every move carries a per-participant sequence number. Replays of moves
//! that were already applied are acknowledged without effect, and blocked
//! moves leave the sequence untouched so they can be retried.
//!
//! ### Liveness
//! Participants that stop sending keep-alives are evicted by a periodic
//! sweep, with the same cleanup as an explicit disconnect.
//!
//! ## Invariants
//!
//! After every mutation:
//! - participant ids are unique and never reused
//! - a participant that has moved stands on a passable cell inside the grid
//! - no move ever lands on an occupied cell
//! - `last_applied_sequence` never decreases
//!
//! Spawning deliberately skips the occupancy check, so several participants
//! can share the spawn cell until they walk away from it.
//!
//! ## Module Organization
//!
//! - [`grid`]: the immutable map and its text loader
//! - [`state`]: [`StateStore`], the roster and the single exclusive lock
//! - [`lifecycle`]: connect and disconnect
//! - [`commands`]: validation and application of moves
//! - [`liveness`]: keep-alives and the eviction sweep
//! - [`snapshot`]: read-only state export
//! - [`network`]: framed request/response transport over TCP
//! - [`config`]: runtime configuration
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::{spawn_liveness_monitor, Grid, Server, ServerConfig, StateStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let grid = Grid::load(&config.map_path)?;
//!     let store = StateStore::new(grid, config.spawn);
//!
//!     spawn_liveness_monitor(store.clone(), config.sweep_interval, config.liveness_timeout);
//!
//!     let server = Server::bind(&config.bind_addr, store).await?;
//!     server.run().await
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod grid;
pub mod lifecycle;
pub mod liveness;
pub mod network;
pub mod snapshot;
pub mod state;

pub use commands::{apply_move, Blocked, MoveOutcome};
pub use config::ServerConfig;
pub use error::{EngineError, MapError};
pub use grid::Grid;
pub use liveness::spawn_liveness_monitor;
pub use network::{dispatch, Server};
pub use state::{Participant, Roster, StateStore};
