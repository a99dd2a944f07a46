//! Intent decoding and the game's intent state machine
//!
//! Inbound frames are decoded into [`ClientMessage`] values, then
//! [`handle_intent`] turns an intent plus the current snapshot into the next
//! snapshot and the events to broadcast. The handler is a pure function; the
//! lifecycle controller is responsible for swapping the snapshot in and
//! fanning the events out.

use crate::game::{GameState, Phase};
use serde_json::Value;
use shared::{ClientMessage, ScoreBoard, ServerMessage, Win, WinningLines};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("message has no string `type` field")]
    MissingType,

    #[error("unknown message type: {0}")]
    UnknownIntent(String),

    #[error("binary frames are not part of the protocol")]
    BinaryFrame,
}

/// Decodes one text frame into an intent.
///
/// Extra fields are tolerated. A payload that is valid JSON but carries an
/// unrecognised `type` is reported separately from undecodable payloads.
pub fn decode_intent(text: &str) -> Result<ClientMessage, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    match kind.as_str() {
        "INCREMENT" | "RESET" => Ok(serde_json::from_value(value)?),
        _ => Err(ProtocolError::UnknownIntent(kind)),
    }
}

/// What the registry knows that the intent handler needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roster {
    pub both_roles_filled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    NotInProgress(Phase),
    WaitingForPlayers,
    OutOfRange(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Applied { square: usize, value: u32 },
    Won(Win),
    Reset { restarted: bool },
    Ignored(IgnoreReason),
}

/// Result of handling one intent: the next snapshot and what to broadcast.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<ServerMessage>,
    pub outcome: IntentOutcome,
}

impl Transition {
    fn ignored(state: &GameState, reason: IgnoreReason) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
            outcome: IntentOutcome::Ignored(reason),
        }
    }

    /// Attaches the score tally to any `GAME_OVER` event.
    pub fn with_scores(mut self, tally: &ScoreBoard) -> Self {
        for event in &mut self.events {
            if let ServerMessage::GameOver { scores, .. } = event {
                *scores = Some(tally.clone());
            }
        }
        self
    }
}

/// Applies an intent to the current snapshot.
///
/// | intent    | accepted when                          | events                        |
/// |-----------|----------------------------------------|-------------------------------|
/// | increment | in progress, both roles, square valid  | `UPDATE` or `GAME_OVER`       |
/// | reset     | always                                 | `GAME_RESET` (+ `GAME_START`) |
///
/// Rejected increments produce no events and leave the snapshot unchanged.
pub fn handle_intent(
    state: &GameState,
    lines: &WinningLines,
    roster: Roster,
    intent: ClientMessage,
) -> Transition {
    match intent {
        ClientMessage::Increment { square } => {
            if !state.is_in_progress() {
                return Transition::ignored(state, IgnoreReason::NotInProgress(state.phase()));
            }
            if !roster.both_roles_filled {
                return Transition::ignored(state, IgnoreReason::WaitingForPlayers);
            }
            let Ok(index) = usize::try_from(square) else {
                return Transition::ignored(state, IgnoreReason::OutOfRange(square));
            };

            match state.with_increment(index, lines) {
                Ok((next, Some(win))) => Transition {
                    events: vec![ServerMessage::GameOver {
                        winner: win.winner,
                        winning_line: win.line.clone(),
                        board: next.board().clone(),
                        scores: None,
                    }],
                    state: next,
                    outcome: IntentOutcome::Won(win),
                },
                Ok((next, None)) => {
                    let value = next.board().get(index).unwrap_or_default();
                    Transition {
                        events: vec![ServerMessage::Update {
                            square: index,
                            value,
                            board: next.board().clone(),
                        }],
                        state: next,
                        outcome: IntentOutcome::Applied {
                            square: index,
                            value,
                        },
                    }
                }
                Err(_) => {
                    Transition::ignored(state, IgnoreReason::OutOfRange(square))
                }
            }
        }

        ClientMessage::Reset => {
            let mut next = state.reset();
            let mut events = vec![ServerMessage::GameReset {
                board: next.board().clone(),
            }];

            let restarted = roster.both_roles_filled;
            if restarted {
                next = next.started();
                events.push(ServerMessage::GameStart {
                    board: next.board().clone(),
                });
            }

            Transition {
                state: next,
                events,
                outcome: IntentOutcome::Reset { restarted },
            }
        }
    }
}
