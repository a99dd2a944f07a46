//! # Odd/Even Game Client Library
//!
//! A headless terminal client for the odd/even board game server. It keeps a
//! read-only mirror of the authoritative game, prints the board after every
//! change, and turns typed commands into intents.
//!
//! ## Architecture Overview
//!
//! The client never predicts. Every change to its local state comes from a
//! server event, so what it prints is always what the server decided. The
//! only thing the client originates is an intent: increment a square, or
//! reset the board.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The mirrored game state and how each event folds into it.
//!
//! ### Input Module (`input`)
//! Parsing of terminal commands into intents.
//!
//! ### Autoplay Module (`autoplay`)
//! Random increments for unattended smoke and soak runs.
//!
//! ### Network Module (`network`)
//! WebSocket connection and the event/command loop.
//!
//! ### Rendering Module (`rendering`)
//! Text grid and one-line descriptions of events.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("ws://127.0.0.1:8080", None).await?;
//!     client.run().await?;
//!     Ok(())
//! }
//! ```

pub mod autoplay;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
