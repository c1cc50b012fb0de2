use rand::{SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::{
    backgammon::{Board, BoardError, Color, DiceGenerator, Game},
    config::SimulationConfig,
    stats::PlayerStatistics,
};

// Keeps the move chooser's stream apart from the dice stream of the same seed.
const CHOOSER_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// One thing the side to move can do with its dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    Move { from: usize, to: usize },
    BearOff { from: usize },
}

/// What [`step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Played(Action),
    Passed,
}

/// Every action available to the side to move, in a stable order.
pub fn legal_actions(game: &mut Game) -> Vec<Action> {
    let mut actions: Vec<Action> = game
        .hints()
        .into_iter()
        .flat_map(|(from, destinations)| {
            destinations
                .iter()
                .map(move |to| Action::Move { from, to })
                .collect::<Vec<_>>()
        })
        .collect();
    actions.extend(
        game.bear_off_candidates()
            .into_iter()
            .map(|from| Action::BearOff { from }),
    );
    actions.sort_unstable();
    actions
}

/// Plays one uniformly chosen action, or passes when there is none.
/// Rolls for the next turn when a bear-off used the last die.
pub fn step(game: &mut Game, rng: &mut ChaCha8Rng) -> Result<Step, BoardError> {
    game.roll();
    let actions = legal_actions(game);
    let Some(&action) = actions.choose(rng) else {
        game.pass()?;
        return Ok(Step::Passed);
    };
    match action {
        Action::Move { from, to } => {
            game.play(from, to)?;
        }
        Action::BearOff { from } => {
            if game.bear_off(from)?.is_none() {
                game.roll();
            }
        }
    }
    Ok(Step::Played(action))
}

/// Outcome of one self-play game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub winner: Option<Color>,
    pub plies: u32,
    pub moves: u32,
}

/// Plays random legal actions for both sides until someone wins or
/// `max_plies` actions have been taken. The same seed replays the same game.
pub fn simulate_game(seed: u64, max_plies: u32) -> GameRecord {
    let mut game = Game::new(Board::new(DiceGenerator::seeded(seed)));
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ CHOOSER_SALT);
    let mut plies = 0;

    while plies < max_plies && !game.is_over() {
        if let Err(err) = step(&mut game, &mut rng) {
            tracing::warn!(seed, plies, %err, "simulation stopped on engine error");
            break;
        }
        plies += 1;
    }

    let winner = game.winner();
    if winner.is_none() {
        tracing::warn!(seed, plies, "game abandoned without a winner");
    }
    GameRecord {
        seed,
        winner,
        plies,
        moves: game.moves_count(),
    }
}

/// Aggregate of a batch of self-play games.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub games: u32,
    pub white_wins: u32,
    pub black_wins: u32,
    pub unfinished: u32,
    pub total_plies: u64,
    pub perspective: Color,
    pub statistics: PlayerStatistics,
}

impl SimulationSummary {
    /// Finished games feed `perspective`'s statistics in the order given.
    pub fn from_records(records: &[GameRecord], perspective: Color) -> Self {
        let mut summary = SimulationSummary {
            perspective,
            ..Default::default()
        };
        for record in records {
            summary.games += 1;
            summary.total_plies += record.plies as u64;
            match record.winner {
                Some(Color::White) => summary.white_wins += 1,
                Some(Color::Black) => summary.black_wins += 1,
                _ => summary.unfinished += 1,
            }
            if let Some(winner) = record.winner {
                summary.statistics.record_game(winner == perspective, record.moves);
            }
        }
        summary
    }
}

/// Runs `config.games` games in parallel.
pub fn simulate_batch(config: &SimulationConfig) -> SimulationSummary {
    let records = (0..config.games as u64)
        .into_par_iter()
        .map(|i| simulate_game(config.seed.wrapping_add(i), config.max_plies))
        .collect::<Vec<_>>();

    let summary = SimulationSummary::from_records(&records, config.perspective);
    tracing::info!(
        games = summary.games,
        white_wins = summary.white_wins,
        black_wins = summary.black_wins,
        unfinished = summary.unfinished,
        "batch finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_actions() {
        let mut game = Game::seeded(3);
        game.roll();
        let actions = legal_actions(&mut game);
        assert!(!actions.is_empty());
        // Only Black's head checker can move at the start.
        assert!(actions
            .iter()
            .all(|a| matches!(a, Action::Move { from: 12, .. })));
    }

    #[test]
    fn test_same_seed_same_game() {
        assert_eq!(simulate_game(11, 300), simulate_game(11, 300));
    }

    #[test]
    fn test_ply_cap() {
        let record = simulate_game(5, 10);
        assert_eq!(record.plies, 10);
        assert_eq!(record.winner, None);
        assert!(record.moves <= 10);
    }

    #[test]
    fn test_summary_counts() {
        let records = [
            GameRecord { seed: 0, winner: Some(Color::Black), plies: 100, moves: 80 },
            GameRecord { seed: 1, winner: Some(Color::White), plies: 120, moves: 90 },
            GameRecord { seed: 2, winner: None, plies: 500, moves: 400 },
        ];
        let summary = SimulationSummary::from_records(&records, Color::Black);
        assert_eq!(summary.games, 3);
        assert_eq!(summary.black_wins, 1);
        assert_eq!(summary.white_wins, 1);
        assert_eq!(summary.unfinished, 1);
        assert_eq!(summary.total_plies, 720);
        assert_eq!(summary.statistics.total_games, 2);
        assert_eq!(summary.statistics.wins, 1);
        assert_eq!(summary.statistics.average_moves_per_game, 85);
    }

    #[test]
    fn test_batch_accounts_for_every_game() {
        let config = SimulationConfig {
            games: 8,
            seed: 99,
            max_plies: 400,
            perspective: Color::White,
        };
        let summary = simulate_batch(&config);
        assert_eq!(summary.games, 8);
        assert_eq!(summary.white_wins + summary.black_wins + summary.unfinished, 8);
    }
}
