use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

pub const DEFAULT_SIDE: usize = 5;
pub const MIN_SIDE: usize = 2;
pub const MAX_SIDE: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board size {size} is not a perfect square")]
    InvalidSize { size: usize },

    #[error("board side {side} has no winning-line table (supported: {}..={})", MIN_SIDE, MAX_SIDE)]
    UnsupportedSide { side: usize },

    #[error("square {index} is outside the board (size {size})")]
    OutOfRange { index: usize, size: usize },
}

/// Square grid of counters stored in row-major order.
///
/// Cells only ever grow, one increment at a time. Every mutation produces a
/// new board so snapshots handed out to other components stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: Vec<u32>,
}

impl Board {
    /// Creates an all-zero board with `size` cells.
    pub fn new(size: usize) -> Result<Self, BoardError> {
        let side = integer_sqrt(size);
        if side * side != size {
            return Err(BoardError::InvalidSize { size });
        }
        check_side(side)?;

        Ok(Self {
            cells: vec![0; size],
        })
    }

    pub fn with_side(side: usize) -> Result<Self, BoardError> {
        check_side(side)?;
        Self::new(side * side)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn side(&self) -> usize {
        integer_sqrt(self.cells.len())
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.cells.get(index).copied()
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// True while no cell has been touched.
    pub fn is_pristine(&self) -> bool {
        self.cells.iter().all(|&value| value == 0)
    }

    /// Returns a copy of this board with `index` incremented by one.
    pub fn incremented(&self, index: usize) -> Result<Board, BoardError> {
        if !self.is_valid_move(index) {
            return Err(BoardError::OutOfRange {
                index,
                size: self.cells.len(),
            });
        }

        let mut cells = self.cells.clone();
        cells[index] = cells[index].saturating_add(1);
        Ok(Board { cells })
    }

    /// Returns an all-zero board of the same geometry.
    pub fn cleared(&self) -> Board {
        Board {
            cells: vec![0; self.cells.len()],
        }
    }

    /// The role the next increment of `index` would favour.
    pub fn favoured_role(&self, index: usize) -> Option<Role> {
        self.get(index)
            .map(|value| Role::for_value(value.saturating_add(1)))
    }
}

fn check_side(side: usize) -> Result<(), BoardError> {
    if (MIN_SIDE..=MAX_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(BoardError::UnsupportedSide { side })
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Precomputed index tuples that end the game when completed.
///
/// Order is rows, then columns, then the main diagonal, then the
/// anti-diagonal. Evaluation walks the table in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLines {
    side: usize,
    lines: Vec<Vec<usize>>,
}

impl WinningLines {
    pub fn for_side(side: usize) -> Result<Self, BoardError> {
        check_side(side)?;

        let mut lines = Vec::with_capacity(2 * side + 2);
        for row in 0..side {
            lines.push((0..side).map(|col| row * side + col).collect());
        }
        for col in 0..side {
            lines.push((0..side).map(|row| row * side + col).collect());
        }
        lines.push((0..side).map(|i| i * side + i).collect());
        lines.push((0..side).map(|i| i * side + (side - 1 - i)).collect());

        Ok(Self { side, lines })
    }

    pub fn for_board(board: &Board) -> Result<Self, BoardError> {
        Self::for_side(board.side())
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.lines.iter().map(Vec::as_slice)
    }

    /// True when `index` lies on at least one line.
    pub fn covers(&self, index: usize) -> bool {
        self.lines.iter().any(|line| line.contains(&index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Win {
    pub winner: Role,
    pub line: Vec<usize>,
}

/// Finds the first line whose cells are all positive and share one parity.
///
/// Pure function of its inputs. Lines that reference cells outside the board
/// never match.
pub fn evaluate_win(board: &Board, lines: &WinningLines) -> Option<Win> {
    for line in lines.iter() {
        let values: Option<Vec<u32>> = line.iter().map(|&index| board.get(index)).collect();
        let Some(values) = values else {
            continue;
        };

        if values.iter().any(|&value| value == 0) {
            continue;
        }

        let winner = Role::for_value(values[0]);
        if values.iter().all(|&value| Role::for_value(value) == winner) {
            return Some(Win {
                winner,
                line: line.to_vec(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(cells: Vec<u32>) -> Board {
        Board { cells }
    }

    #[test]
    fn test_new_board_is_all_zero() {
        let board = Board::new(25).unwrap();
        assert_eq!(board.len(), 25);
        assert_eq!(board.side(), 5);
        assert!(board.is_pristine());
    }

    #[test]
    fn test_new_board_rejects_non_square_sizes() {
        assert_eq!(Board::new(24), Err(BoardError::InvalidSize { size: 24 }));
        assert_eq!(Board::new(26), Err(BoardError::InvalidSize { size: 26 }));
    }

    #[test]
    fn test_new_board_rejects_unsupported_sides() {
        assert_eq!(Board::new(0), Err(BoardError::UnsupportedSide { side: 0 }));
        assert_eq!(Board::new(1), Err(BoardError::UnsupportedSide { side: 1 }));
        assert_eq!(
            Board::with_side(17),
            Err(BoardError::UnsupportedSide { side: 17 })
        );
    }

    #[test]
    fn test_increment_touches_only_target() {
        let board = Board::with_side(5).unwrap();
        for index in 0..board.len() {
            let next = board.incremented(index).unwrap();
            for (i, (&before, &after)) in board.cells().iter().zip(next.cells()).enumerate() {
                if i == index {
                    assert_eq!(after, before + 1);
                } else {
                    assert_eq!(after, before);
                }
            }
        }
    }

    #[test]
    fn test_increment_leaves_original_untouched() {
        let board = Board::with_side(3).unwrap();
        let next = board.incremented(4).unwrap();
        assert!(board.is_pristine());
        assert_eq!(next.get(4), Some(1));
        assert_eq!(next.cleared(), board);
    }

    #[test]
    fn test_increment_out_of_range() {
        let board = Board::with_side(5).unwrap();
        assert_eq!(
            board.incremented(25),
            Err(BoardError::OutOfRange {
                index: 25,
                size: 25
            })
        );
        assert!(!board.is_valid_move(25));
        assert!(board.is_valid_move(24));
    }

    #[test]
    fn test_favoured_role() {
        let board = Board::with_side(3).unwrap();
        assert_eq!(board.favoured_role(0), Some(Role::Odd));
        let board = board.incremented(0).unwrap();
        assert_eq!(board.favoured_role(0), Some(Role::Even));
        assert_eq!(board.favoured_role(9), None);
    }

    #[test]
    fn test_winning_lines_for_five() {
        let lines = WinningLines::for_side(5).unwrap();
        let all: Vec<&[usize]> = lines.iter().collect();

        assert_eq!(lines.len(), 12);
        assert_eq!(all[0], &[0, 1, 2, 3, 4]);
        assert_eq!(all[4], &[20, 21, 22, 23, 24]);
        assert_eq!(all[5], &[0, 5, 10, 15, 20]);
        assert_eq!(all[9], &[4, 9, 14, 19, 24]);
        assert_eq!(all[10], &[0, 6, 12, 18, 24]);
        assert_eq!(all[11], &[4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_winning_lines_cover() {
        let lines = WinningLines::for_side(4).unwrap();
        assert!(lines.covers(0));
        assert!(lines.covers(15));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_no_winner_on_empty_board() {
        let board = Board::with_side(5).unwrap();
        let lines = WinningLines::for_side(5).unwrap();
        assert_eq!(evaluate_win(&board, &lines), None);
    }

    #[test]
    fn test_odd_column_wins() {
        let lines = WinningLines::for_side(5).unwrap();
        let mut board = Board::with_side(5).unwrap();
        for index in [0, 5, 10, 15, 20] {
            board = board.incremented(index).unwrap();
        }

        let win = evaluate_win(&board, &lines).unwrap();
        assert_eq!(win.winner, Role::Odd);
        assert_eq!(win.line, vec![0, 5, 10, 15, 20]);
    }

    #[test]
    fn test_even_row_wins() {
        let lines = WinningLines::for_side(3).unwrap();
        let board = board_from(vec![0, 0, 0, 2, 4, 2, 0, 0, 0]);

        let win = evaluate_win(&board, &lines).unwrap();
        assert_eq!(win.winner, Role::Even);
        assert_eq!(win.line, vec![3, 4, 5]);
    }

    #[test]
    fn test_mixed_parity_does_not_win() {
        let lines = WinningLines::for_side(3).unwrap();
        let board = board_from(vec![1, 2, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(evaluate_win(&board, &lines), None);
    }

    #[test]
    fn test_zero_cell_blocks_even_line() {
        let lines = WinningLines::for_side(3).unwrap();
        let board = board_from(vec![2, 0, 2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(evaluate_win(&board, &lines), None);
    }

    #[test]
    fn test_rows_take_precedence_over_columns() {
        let lines = WinningLines::for_side(2).unwrap();
        let board = board_from(vec![1, 1, 1, 2]);

        let win = evaluate_win(&board, &lines).unwrap();
        assert_eq!(win.line, vec![0, 1]);
    }

    #[test]
    fn test_anti_diagonal_wins() {
        let lines = WinningLines::for_side(3).unwrap();
        let board = board_from(vec![0, 0, 3, 0, 1, 0, 5, 0, 0]);

        let win = evaluate_win(&board, &lines).unwrap();
        assert_eq!(win.winner, Role::Odd);
        assert_eq!(win.line, vec![2, 4, 6]);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let lines = WinningLines::for_side(4).unwrap();
        let mut board = Board::with_side(4).unwrap();
        for index in [0, 5, 10, 15] {
            board = board.incremented(index).unwrap();
        }

        let first = evaluate_win(&board, &lines);
        for _ in 0..10 {
            assert_eq!(evaluate_win(&board, &lines), first);
        }
        assert_eq!(first.map(|win| win.line), Some(vec![0, 5, 10, 15]));
    }

    #[test]
    fn test_board_serializes_as_plain_array() {
        let board = Board::with_side(2).unwrap().incremented(3).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[0,0,0,1]");
    }
}
