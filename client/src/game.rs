use log::debug;
use shared::{Board, Role, ScoreBoard, ServerMessage, GAME_FULL_MESSAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Not yet assigned a role
    Connecting,
    /// Holding a role, opponent missing or game not started
    Waiting,
    Playing,
    Over,
    /// Server refused the connection
    Rejected,
}

/// One accepted increment, numbered from 1 within the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub number: usize,
    pub square: usize,
    pub value: u32,
}

impl MoveRecord {
    /// The role whose parity the move's new value matches
    pub fn favours(&self) -> Role {
        Role::for_value(self.value)
    }
}

/// Local mirror of the authoritative game, updated only from server events.
#[derive(Debug, Clone)]
pub struct ClientGameState {
    role: Option<Role>,
    board: Option<Board>,
    status: GameStatus,
    winner: Option<Role>,
    winning_line: Vec<usize>,
    both_players_connected: bool,
    scores: Option<ScoreBoard>,
    notice: Option<String>,
    history: Vec<MoveRecord>,
}

impl Default for ClientGameState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientGameState {
    pub fn new() -> Self {
        Self {
            role: None,
            board: None,
            status: GameStatus::Connecting,
            winner: None,
            winning_line: Vec::new(),
            both_players_connected: false,
            scores: None,
            notice: None,
            history: Vec::new(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    pub fn winning_line(&self) -> &[usize] {
        &self.winning_line
    }

    pub fn both_players_connected(&self) -> bool {
        self.both_players_connected
    }

    pub fn scores(&self) -> Option<&ScoreBoard> {
        self.scores.as_ref()
    }

    /// Last human-readable message from the server, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Moves of the current game, oldest first
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Moves are only worth sending while a game is running.
    pub fn can_move(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// True when the last finished game was won by this client's role
    pub fn won(&self) -> bool {
        self.status == GameStatus::Over && self.winner.is_some() && self.winner == self.role
    }

    /// Folds one event into the mirror. Returns true if the board changed.
    pub fn apply(&mut self, event: &ServerMessage) -> bool {
        match event {
            ServerMessage::PlayerAssigned { player, board } => {
                self.role = Some(*player);
                self.status = GameStatus::Waiting;
                self.replace_board(board)
            }
            ServerMessage::PlayerConnected {
                both_players_connected,
                ..
            } => {
                self.both_players_connected = *both_players_connected;
                false
            }
            ServerMessage::GameStart { board } => {
                self.status = GameStatus::Playing;
                self.both_players_connected = true;
                self.clear_result();
                self.history.clear();
                self.replace_board(board)
            }
            ServerMessage::Update {
                square,
                value,
                board,
            } => {
                self.record_move(*square, *value);
                self.replace_board(board)
            }
            ServerMessage::GameOver {
                winner,
                winning_line,
                board,
                scores,
            } => {
                // The winning move arrives only as part of the final board
                if let Some(square) = self.changed_square(board) {
                    self.record_move(square, board.get(square).unwrap_or_default());
                }
                self.status = GameStatus::Over;
                self.winner = Some(*winner);
                self.winning_line = winning_line.clone();
                if scores.is_some() {
                    self.scores = scores.clone();
                }
                self.replace_board(board)
            }
            ServerMessage::GameReset { board } => {
                self.status = GameStatus::Waiting;
                self.clear_result();
                self.history.clear();
                self.replace_board(board)
            }
            ServerMessage::PlayerDisconnected { message, .. } => {
                self.status = GameStatus::Over;
                self.both_players_connected = false;
                self.notice = Some(message.clone());
                false
            }
            ServerMessage::Error { message } => {
                if message == GAME_FULL_MESSAGE {
                    self.status = GameStatus::Rejected;
                }
                self.notice = Some(message.clone());
                false
            }
        }
    }

    fn replace_board(&mut self, board: &Board) -> bool {
        if self.board.as_ref() == Some(board) {
            debug!("Board unchanged");
            return false;
        }
        self.board = Some(board.clone());
        true
    }

    fn record_move(&mut self, square: usize, value: u32) {
        self.history.push(MoveRecord {
            number: self.history.len() + 1,
            square,
            value,
        });
    }

    /// First cell where `board` differs from the mirrored one
    fn changed_square(&self, board: &Board) -> Option<usize> {
        let current = self.board.as_ref()?;
        current
            .cells()
            .iter()
            .zip(board.cells())
            .position(|(before, after)| before != after)
    }

    fn clear_result(&mut self) {
        self.winner = None;
        self.winning_line.clear();
    }
}
