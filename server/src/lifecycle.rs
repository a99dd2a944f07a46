//! Lifecycle controller: the authority object behind the server loop
//!
//! [`GameController`] owns the session registry, the current game snapshot,
//! the winning-line table and the score tally. It is driven by three entry
//! points, one per transport event, and is only ever touched from the
//! authority task, so every read-then-write on the game or the registry is
//! naturally serialized.
//!
//! A session whose outbox is closed or full when an event is fanned out is
//! released and handled as a departure once the current step finishes.

use crate::broadcast::{broadcast, send_direct, send_to};
use crate::client_manager::{AdmissionError, ClientManager, Outbox, Session, SessionId};
use crate::game::GameState;
use crate::protocol::{decode_intent, handle_intent, IntentOutcome, ProtocolError, Roster};
use log::{debug, error, info, warn};
use shared::{BoardError, ClientMessage, Role, ScoreBoard, ServerMessage, WinningLines};
use std::net::SocketAddr;
use tokio_tungstenite::tungstenite::Message;

pub struct GameController {
    clients: ClientManager,
    game: GameState,
    lines: WinningLines,
    scores: ScoreBoard,
    unreachable: Vec<SessionId>,
}

impl GameController {
    /// Creates a controller for a square board of the given side.
    pub fn new(side: usize) -> Result<Self, BoardError> {
        let game = GameState::new(side)?;
        let lines = WinningLines::for_board(game.board())?;
        Ok(Self {
            clients: ClientManager::new(),
            game,
            lines,
            scores: ScoreBoard::new(),
            unreachable: Vec::new(),
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn clients(&self) -> &ClientManager {
        &self.clients
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn lines(&self) -> &WinningLines {
        &self.lines
    }

    /// Admits a new connection.
    ///
    /// Sessions found dead during reconciliation are handled as departures
    /// first. On success the new session receives its role and the current
    /// board, everyone hears about the arrival, and a full roster starts a
    /// fresh game. The roster is checked again after any session that missed
    /// the arrival notice has been released. A refused peer gets a single
    /// `ERROR` and `None` is returned; once the caller drops its copy of
    /// `sender` the peer's writer flushes the error and closes. `None` is
    /// also returned when the newcomer itself was released for falling behind.
    pub fn on_connect(&mut self, addr: SocketAddr, sender: Outbox) -> Option<SessionId> {
        for session in self.clients.reconcile() {
            self.handle_departure(session);
        }
        self.evict_unreachable();

        let id = self.clients.allocate_id();
        let role = match self.clients.admit(id, addr, sender.clone()) {
            Ok(role) => role,
            Err(AdmissionError::GameFull) => {
                warn!("Rejected {}: game is full", addr);
                if let Err(e) = send_direct(&sender, &ServerMessage::game_full()) {
                    debug!("Could not notify rejected peer {}: {}", addr, e);
                }
                return None;
            }
            Err(e) => {
                error!("Admission of {} failed: {}", addr, e);
                return None;
            }
        };

        let assigned = ServerMessage::PlayerAssigned {
            player: role,
            board: self.game.board().clone(),
        };
        self.deliver(id, &assigned);

        let both_players_connected = self.clients.both_roles_filled();
        self.fan_out(&ServerMessage::PlayerConnected {
            player: role,
            both_players_connected,
        });
        self.evict_unreachable();

        if self.clients.both_roles_filled() {
            self.game = self.game.started();
            info!("Both players connected, game started");
            self.fan_out(&ServerMessage::GameStart {
                board: self.game.board().clone(),
            });
            self.evict_unreachable();
        }

        self.clients.get(id).map(|_| id)
    }

    /// Handles one inbound frame from an admitted, live session.
    ///
    /// Undecodable and unknown messages are logged and dropped; nothing is
    /// sent back to the peer.
    pub fn on_message(&mut self, id: SessionId, message: Message) {
        match self.clients.get(id) {
            Some(session) if session.is_live() => {}
            Some(_) => {
                debug!("Ignoring frame from closed session {}", id);
                return;
            }
            None => {
                debug!("Ignoring frame from unregistered session {}", id);
                return;
            }
        }

        let decoded = match message {
            Message::Text(text) => decode_intent(&text),
            Message::Binary(_) => Err(ProtocolError::BinaryFrame),
            _ => return,
        };

        match decoded {
            Ok(intent) => self.apply_intent(id, intent),
            Err(ProtocolError::UnknownIntent(kind)) => {
                warn!("Ignoring unknown message type {} from session {}", kind, id);
            }
            Err(e) => {
                warn!("Dropping message from session {}: {}", id, e);
            }
        }
    }

    /// Handles a closed connection. Unknown or already released ids are a no-op.
    pub fn on_disconnect(&mut self, id: SessionId) {
        match self.clients.release(id) {
            Some(session) => {
                self.handle_departure(session);
                self.evict_unreachable();
            }
            None => debug!("Session {} was already released", id),
        }
    }

    fn apply_intent(&mut self, id: SessionId, intent: ClientMessage) {
        let sender = role_name(self.clients.role_of(id));
        let roster = Roster {
            both_roles_filled: self.clients.both_roles_filled(),
        };

        let transition = handle_intent(&self.game, &self.lines, roster, intent);
        match &transition.outcome {
            IntentOutcome::Applied { square, value } => {
                info!(
                    "{} player (session {}) incremented square {} to {}",
                    sender, id, square, value
                );
            }
            IntentOutcome::Won(win) => {
                self.scores.record_win(win.winner);
                info!(
                    "{} player wins on line {:?} after {} moves",
                    win.winner,
                    win.line,
                    transition.state.moves()
                );
            }
            IntentOutcome::Reset { restarted } => {
                info!(
                    "Game reset by {} player (session {}), restarted: {}",
                    sender, id, restarted
                );
            }
            IntentOutcome::Ignored(reason) => {
                debug!("Ignored intent from session {}: {:?}", id, reason);
            }
        }

        let transition = transition.with_scores(&self.scores);
        self.game = transition.state;
        for event in &transition.events {
            self.fan_out(event);
        }
        self.evict_unreachable();
    }

    fn handle_departure(&mut self, session: Session) {
        info!(
            "Session {} ({}) left after {:.1?}",
            session.id,
            session.addr,
            session.connected_at.elapsed()
        );

        self.game = self.game.ended();
        if let Some(role) = session.role {
            self.fan_out(&ServerMessage::disconnected(role));
        }

        if self.clients.is_empty() {
            self.game = self.game.reset();
            info!("No sessions left, board reset");
        }
    }

    fn deliver(&mut self, id: SessionId, event: &ServerMessage) {
        match send_to(&self.clients, id, event) {
            Ok(()) => {}
            Err(e) if e.is_unreachable() => {
                warn!("Could not send {} to session {}: {}", event.kind(), id, e);
                self.unreachable.push(id);
            }
            Err(e) => debug!("Could not send {} to session {}: {}", event.kind(), id, e),
        }
    }

    fn fan_out(&mut self, event: &ServerMessage) {
        let report = broadcast(&self.clients, event);
        self.unreachable.extend(report.unreachable);
    }

    /// Releases every session that missed an event. Departure notices can
    /// overflow further outboxes, so this runs until nothing is left.
    fn evict_unreachable(&mut self) {
        while let Some(id) = self.unreachable.pop() {
            if let Some(session) = self.clients.release(id) {
                warn!("Disconnecting session {}: it can no longer keep up", id);
                self.handle_departure(session);
            }
        }
    }
}

fn role_name(role: Option<Role>) -> &'static str {
    role.map_or("unassigned", Role::as_str)
}
