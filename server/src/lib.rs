//! # Odd/Even Game Server Library
//!
//! This library provides the authoritative server for the two-player odd/even
//! board game. It owns the single game instance, admits at most two players,
//! validates and applies their intents, and broadcasts every change so that
//! clients only ever render what the server decided.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative State
//! The board, the game phase and the winner live on the server only. Clients
//! send intents (`INCREMENT`, `RESET`) and receive events; nothing a client
//! sends is trusted until the server has applied it.
//!
//! ### Session Management
//! Handles the lifecycle of client connections:
//! - Role assignment in fixed order (odd, then even)
//! - Rejection of a third player with an `ERROR` event
//! - Reclaiming roles held by connections that have already closed
//! - Ending the game when a player leaves
//!
//! ### Event Broadcasting
//! Every accepted intent produces one or more events that are fanned out to
//! all sessions. Delivery is best effort per recipient; a closed or slow peer
//! never blocks the others.
//!
//! ## Architecture Design
//!
//! ### Single Authority Task
//! One task owns the [`lifecycle::GameController`] and processes connection,
//! frame and disconnect events in arrival order. Connection tasks never touch
//! game state; they forward frames over a channel and drain their own
//! outbound queue. This serializes admission and intent handling without
//! locks.
//!
//! ### WebSocket Transport
//! Each client holds one long-lived WebSocket connection carrying JSON text
//! frames tagged by a `type` field.
//!
//! ## Module Organization
//!
//! ### Client Manager Module (`client_manager`)
//! Session registry: id allocation, role assignment, liveness reconciliation.
//!
//! ### Game Module (`game`)
//! Immutable game snapshot and its phase transitions.
//!
//! ### Protocol Module (`protocol`)
//! Intent decoding and the pure intent handler.
//!
//! ### Broadcast Module (`broadcast`)
//! Per-session and fan-out delivery onto bounded outbound queues.
//!
//! ### Lifecycle Module (`lifecycle`)
//! Connect, message and disconnect handling tied together with the score tally.
//!
//! ### Network Module (`network`)
//! Listener, per-connection tasks and the authority loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::bind(ServerConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod client_manager;
pub mod config;
pub mod error;
pub mod game;
pub mod lifecycle;
pub mod network;
pub mod protocol;
