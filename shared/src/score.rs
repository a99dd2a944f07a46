use serde::{Deserialize, Serialize};

use crate::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Running tally for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub current_streak: u32,
    pub streak: Option<Outcome>,
}

impl ScoreRecord {
    pub fn record(&mut self, outcome: Outcome) {
        self.games_played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }

        if self.streak == Some(outcome) {
            self.current_streak += 1;
        } else {
            self.current_streak = 1;
            self.streak = Some(outcome);
        }
    }
}

/// Per-role results for the lifetime of the server process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub odd: ScoreRecord,
    pub even: ScoreRecord,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_win(&mut self, winner: Role) {
        self.record_mut(winner).record(Outcome::Win);
        self.record_mut(winner.opponent()).record(Outcome::Loss);
    }

    pub fn record_draw(&mut self) {
        self.odd.record(Outcome::Draw);
        self.even.record(Outcome::Draw);
    }

    pub fn record_for(&self, role: Role) -> &ScoreRecord {
        match role {
            Role::Odd => &self.odd,
            Role::Even => &self.even,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.odd.games_played
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn record_mut(&mut self, role: Role) -> &mut ScoreRecord {
        match role {
            Role::Odd => &mut self.odd,
            Role::Even => &mut self.even,
        }
    }
}
