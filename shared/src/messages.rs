use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Board, ScoreBoard};

/// One of the two player identities.
///
/// `Odd` wins by completing a line of odd counters, `Even` a line of
/// non-zero even counters. Role priority for admission follows `Role::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Odd,
    Even,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Odd, Role::Even];

    pub fn for_value(value: u32) -> Role {
        if value % 2 == 1 {
            Role::Odd
        } else {
            Role::Even
        }
    }

    pub fn opponent(self) -> Role {
        match self {
            Role::Odd => Role::Even,
            Role::Even => Role::Odd,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Odd => "odd",
            Role::Even => "even",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Intents, client -> server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    Increment { square: i64 },
    Reset,
}

// Events, server -> client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    PlayerAssigned {
        player: Role,
        board: Board,
    },
    #[serde(rename_all = "camelCase")]
    PlayerConnected {
        player: Role,
        both_players_connected: bool,
    },
    GameStart {
        board: Board,
    },
    Update {
        square: usize,
        value: u32,
        board: Board,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        winner: Role,
        winning_line: Vec<usize>,
        board: Board,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scores: Option<ScoreBoard>,
    },
    GameReset {
        board: Board,
    },
    PlayerDisconnected {
        player: Role,
        message: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn disconnected(player: Role) -> Self {
        ServerMessage::PlayerDisconnected {
            player,
            message: format!("{} player disconnected. Game ended.", player),
        }
    }

    pub fn game_full() -> Self {
        ServerMessage::Error {
            message: GAME_FULL_MESSAGE.to_string(),
        }
    }

    /// Wire tag of this event, as it appears in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::PlayerAssigned { .. } => "PLAYER_ASSIGNED",
            ServerMessage::PlayerConnected { .. } => "PLAYER_CONNECTED",
            ServerMessage::GameStart { .. } => "GAME_START",
            ServerMessage::Update { .. } => "UPDATE",
            ServerMessage::GameOver { .. } => "GAME_OVER",
            ServerMessage::GameReset { .. } => "GAME_RESET",
            ServerMessage::PlayerDisconnected { .. } => "PLAYER_DISCONNECTED",
            ServerMessage::Error { .. } => "ERROR",
        }
    }
}

pub const GAME_FULL_MESSAGE: &str = "Game is full. Only 2 players allowed.";
