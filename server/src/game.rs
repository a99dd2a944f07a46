use shared::{evaluate_win, Board, BoardError, Role, Win, WinningLines};

/// Lifecycle phase of the single game instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayers,
    InProgress,
    Over,
}

/// Authoritative game snapshot.
///
/// Every transition returns a new value; the authority task swaps it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    phase: Phase,
    winner: Option<Role>,
    winning_line: Option<Vec<usize>>,
    moves: u32,
}

impl GameState {
    pub fn new(side: usize) -> Result<Self, BoardError> {
        Ok(Self::fresh(Board::with_side(side)?, Phase::AwaitingPlayers))
    }

    fn fresh(board: Board, phase: Phase) -> Self {
        Self {
            board,
            phase,
            winner: None,
            winning_line: None,
            moves: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    pub fn winning_line(&self) -> Option<&[usize]> {
        self.winning_line.as_deref()
    }

    /// Increments applied since the board was last cleared
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    /// Fresh board, waiting for a full roster.
    pub fn reset(&self) -> GameState {
        Self::fresh(self.board.cleared(), Phase::AwaitingPlayers)
    }

    /// Fresh board, open for moves.
    pub fn started(&self) -> GameState {
        Self::fresh(self.board.cleared(), Phase::InProgress)
    }

    /// Ends the game where it stands without naming a winner.
    pub fn ended(&self) -> GameState {
        GameState {
            phase: Phase::Over,
            ..self.clone()
        }
    }

    /// Applies one increment and checks the winning lines.
    ///
    /// Phase is not checked here; callers only invoke this while the game is
    /// in progress. A completed line moves the snapshot to `Over`.
    pub fn with_increment(
        &self,
        index: usize,
        lines: &WinningLines,
    ) -> Result<(GameState, Option<Win>), BoardError> {
        let board = self.board.incremented(index)?;
        let win = evaluate_win(&board, lines);

        let next = match &win {
            Some(win) => GameState {
                board,
                phase: Phase::Over,
                winner: Some(win.winner),
                winning_line: Some(win.line.clone()),
                moves: self.moves + 1,
            },
            None => GameState {
                board,
                moves: self.moves + 1,
                ..self.clone()
            },
        };

        Ok((next, win))
    }
}
