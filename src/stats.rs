use serde::{Deserialize, Serialize};

/// Running totals for one player across finished games.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStatistics {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f32,
    /// Integer average, rounded down.
    pub average_moves_per_game: u32,
    pub longest_win_streak: u32,
    pub current_win_streak: u32,
}

impl PlayerStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one finished game into the totals.
    pub fn record_game(&mut self, won: bool, moves: u32) {
        let previous_games = self.total_games;
        self.total_games += 1;
        if won {
            self.wins += 1;
            self.current_win_streak += 1;
        } else {
            self.losses += 1;
            self.current_win_streak = 0;
        }
        self.win_rate = self.wins as f32 / self.total_games as f32;

        let total_moves = self.average_moves_per_game as u64 * previous_games as u64 + moves as u64;
        self.average_moves_per_game = (total_moves / self.total_games as u64) as u32;
        self.longest_win_streak = self.longest_win_streak.max(self.current_win_streak);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
