//! Text rendering of the board and of server events

use crate::game::{ClientGameState, GameStatus, MoveRecord};
use shared::{Board, ServerMessage};

/// Draws the board as a grid of counters.
///
/// Each cell shows its index in brackets and its value; cells on the
/// winning line are marked with `*`.
pub fn render_board(board: &Board, winning_line: &[usize]) -> String {
    let side = board.side();
    let index_width = board.len().saturating_sub(1).to_string().len();
    let value_width = board
        .cells()
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for (row, cells) in board.cells().chunks(side.max(1)).enumerate() {
        for (column, value) in cells.iter().enumerate() {
            let index = row * side + column;
            let mark = if winning_line.contains(&index) { '*' } else { ' ' };
            out.push_str(&format!(
                "[{:>iw$}]{:>vw$}{} ",
                index,
                value,
                mark,
                iw = index_width,
                vw = value_width
            ));
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// Lists moves one per line as `3. square 7 -> 2 (even)`
pub fn render_history(history: &[MoveRecord]) -> String {
    if history.is_empty() {
        return "no moves yet\n".to_string();
    }

    let mut out = String::new();
    for record in history {
        out.push_str(&format!(
            "{}. square {} -> {} ({})\n",
            record.number,
            record.square,
            record.value,
            record.favours()
        ));
    }
    out
}

/// One-line status summary for the prompt
pub fn render_status(state: &ClientGameState) -> String {
    let role = state
        .role()
        .map_or_else(|| "no role".to_string(), |role| format!("you are {}", role));

    let status = match state.status() {
        GameStatus::Connecting => "connecting".to_string(),
        GameStatus::Waiting if state.both_players_connected() => {
            "waiting for the game to start".to_string()
        }
        GameStatus::Waiting => "waiting for an opponent".to_string(),
        GameStatus::Playing => "game in progress".to_string(),
        GameStatus::Over => match state.winner() {
            Some(_) if state.won() => "game over, you won".to_string(),
            Some(winner) => format!("game over, {} won", winner),
            None => "game over".to_string(),
        },
        GameStatus::Rejected => "rejected by server".to_string(),
    };

    match state.scores() {
        Some(scores) => format!(
            "{} | {} | odd {}-{} even",
            role, status, scores.odd.wins, scores.even.wins
        ),
        None => format!("{} | {}", role, status),
    }
}

/// Human-readable line for an incoming event
pub fn describe_event(event: &ServerMessage) -> String {
    match event {
        ServerMessage::PlayerAssigned { player, .. } => {
            format!("Assigned the {} role", player)
        }
        ServerMessage::PlayerConnected {
            player,
            both_players_connected,
        } => {
            if *both_players_connected {
                format!("{} player joined, both players connected", player)
            } else {
                format!("{} player joined, waiting for opponent", player)
            }
        }
        ServerMessage::GameStart { .. } => "Game started".to_string(),
        ServerMessage::Update { square, value, .. } => {
            format!("Square {} is now {}", square, value)
        }
        ServerMessage::GameOver {
            winner,
            winning_line,
            ..
        } => format!("{} wins on {:?}", winner, winning_line),
        ServerMessage::GameReset { .. } => "Board reset".to_string(),
        ServerMessage::PlayerDisconnected { message, .. } => message.clone(),
        ServerMessage::Error { message } => format!("Server error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Role;

    #[test]
    fn test_render_small_board() {
        let board = Board::with_side(2).unwrap().incremented(3).unwrap();
        assert_eq!(render_board(&board, &[]), "[0]0  [1]0\n[2]0  [3]1\n");
    }

    #[test]
    fn test_render_marks_winning_line() {
        let mut board = Board::with_side(2).unwrap();
        for index in [0, 1] {
            board = board.incremented(index).unwrap();
        }
        let text = render_board(&board, &[0, 1]);
        assert_eq!(text.lines().next(), Some("[0]1* [1]1*"));
    }

    #[test]
    fn test_render_pads_indices() {
        let board = Board::with_side(5).unwrap();
        let text = render_board(&board, &[]);
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("[ 0]0"));
        assert!(text.lines().last().unwrap_or_default().contains("[24]0"));
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "no moves yet\n");

        let history = [
            MoveRecord {
                number: 1,
                square: 7,
                value: 1,
            },
            MoveRecord {
                number: 2,
                square: 7,
                value: 2,
            },
        ];
        assert_eq!(
            render_history(&history),
            "1. square 7 -> 1 (odd)\n2. square 7 -> 2 (even)\n"
        );
    }

    #[test]
    fn test_status_line() {
        let mut state = ClientGameState::new();
        assert_eq!(render_status(&state), "no role | connecting");

        state.apply(&ServerMessage::PlayerAssigned {
            player: Role::Odd,
            board: Board::with_side(5).unwrap(),
        });
        assert_eq!(
            render_status(&state),
            "you are odd | waiting for an opponent"
        );
    }

    #[test]
    fn test_describe_events() {
        assert_eq!(
            describe_event(&ServerMessage::game_full()),
            "Server error: Game is full. Only 2 players allowed."
        );
        assert_eq!(
            describe_event(&ServerMessage::disconnected(Role::Even)),
            "even player disconnected. Game ended."
        );
    }
}
