//! # Grid World Client Library
//!
//! A thin polling consumer of the authoritative server. It holds no
//! authority: it repaints whatever the latest snapshot says and forwards
//! movement requests, letting the server decide whether they succeed.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - [`network::Connection`]: framed request/response calls over one TCP stream
//! - [`network::Session`]: background state polling (~100ms, retried after a
//!   delay on transport failure), keep-alives (~5s, a failure ends the
//!   session) and a move worker
//!
//! ### Input Module (`input`)
//! Keyboard sampling and per-session move sequence numbers.
//!
//! ### Game Module (`game`)
//! The latest snapshot plus the session status, with lookups for the local
//! participant.
//!
//! ### Rendering Module (`rendering`)
//! Paints grid cells, participants and a status line with macroquad.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::config::ClientConfig;
//! use client::network::Session;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::start(&ClientConfig::default()).await?;
//!     println!("joined as {}", session.participant_id);
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
