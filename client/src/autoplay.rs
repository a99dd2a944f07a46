//! Random move generation for unattended clients

use crate::game::ClientGameState;
use rand::Rng;
use shared::ClientMessage;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);
/// Shortest allowed delay between moves; `tokio::time::interval` rejects zero
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Sends uniformly random increments while a game is running
#[derive(Debug, Clone)]
pub struct Autoplay {
    interval: Duration,
    max_moves: Option<u32>,
    sent: u32,
}

impl Autoplay {
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration, max_moves: Option<u32>) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            max_moves,
            sent: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn moves_sent(&self) -> u32 {
        self.sent
    }

    pub fn is_finished(&self) -> bool {
        self.max_moves.is_some_and(|max| self.sent >= max)
    }

    /// Picks the next move, or None when there is nothing to do this tick.
    pub fn next_move<R: Rng>(
        &mut self,
        state: &ClientGameState,
        rng: &mut R,
    ) -> Option<ClientMessage> {
        if self.is_finished() || !state.can_move() {
            return None;
        }
        let board = state.board()?;
        if board.is_empty() {
            return None;
        }

        let square = rng.gen_range(0..board.len());
        self.sent += 1;
        i64::try_from(square)
            .ok()
            .map(|square| ClientMessage::Increment { square })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{Board, Role, ServerMessage};

    fn playing_state() -> ClientGameState {
        let mut state = ClientGameState::new();
        state.apply(&ServerMessage::PlayerAssigned {
            player: Role::Odd,
            board: Board::with_side(5).unwrap(),
        });
        state.apply(&ServerMessage::GameStart {
            board: Board::with_side(5).unwrap(),
        });
        state
    }

    #[test]
    fn test_moves_stay_on_board() {
        let state = playing_state();
        let mut rng = StdRng::seed_from_u64(7);
        let mut autoplay = Autoplay::new(DEFAULT_INTERVAL, None);

        for _ in 0..200 {
            match autoplay.next_move(&state, &mut rng) {
                Some(ClientMessage::Increment { square }) => assert!((0..25).contains(&square)),
                other => panic!("Unexpected move: {:?}", other),
            }
        }
        assert_eq!(autoplay.moves_sent(), 200);
    }

    #[test]
    fn test_stops_at_move_limit() {
        let state = playing_state();
        let mut rng = StdRng::seed_from_u64(1);
        let mut autoplay = Autoplay::new(DEFAULT_INTERVAL, Some(3));

        for _ in 0..3 {
            assert!(autoplay.next_move(&state, &mut rng).is_some());
        }
        assert!(autoplay.is_finished());
        assert!(autoplay.next_move(&state, &mut rng).is_none());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let autoplay = Autoplay::new(Duration::ZERO, None);
        assert_eq!(autoplay.interval(), MIN_INTERVAL);

        let autoplay = Autoplay::new(Duration::from_millis(40), None);
        assert_eq!(autoplay.interval(), Duration::from_millis(40));
    }

    #[test]
    fn test_idle_outside_a_game() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut autoplay = Autoplay::new(DEFAULT_INTERVAL, None);
        assert!(autoplay
            .next_move(&ClientGameState::new(), &mut rng)
            .is_none());
        assert_eq!(autoplay.moves_sent(), 0);
    }
}
