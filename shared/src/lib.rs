//! Types shared by the odd/even server and its clients: the board engine,
//! the JSON wire messages, and the score tally.
//!
//! Nothing in this crate performs I/O.

pub mod board;
pub mod messages;
pub mod score;

pub use board::{
    evaluate_win, Board, BoardError, Win, WinningLines, DEFAULT_SIDE, MAX_SIDE, MIN_SIDE,
};
pub use messages::{ClientMessage, Role, ServerMessage, GAME_FULL_MESSAGE};
pub use score::{Outcome, ScoreBoard, ScoreRecord};

pub const DEFAULT_PORT: u16 = 8080;
