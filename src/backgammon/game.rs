use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::backgammon::{Board, BoardError, CELL_COUNT, Color, Destinations, PositionCell};

/// A running game as seen by a presentation layer.
///
/// Wraps a [`Board`] with the bookkeeping a front end needs: selection that
/// ignores the opponent's checkers, hints, a move counter and snapshots.
#[derive(Debug)]
pub struct Game {
    board: Board,
    moves_count: u32,
}

/// Public state after a call, in a form the presentation layer can store or send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub cells: Vec<PositionCell>,
    pub pending_dice: Vec<u8>,
    pub current_turn: Color,
    pub head_move_count: u8,
    pub moves_count: u32,
    pub winner: Option<Color>,
}

impl Game {
    pub fn new(board: Board) -> Self {
        Game { board, moves_count: 0 }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Board::seeded(seed))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves_count(&self) -> u32 {
        self.moves_count
    }

    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Back to the starting position with a zero move counter.
    pub fn reset(&mut self) {
        self.board.new_game();
        self.moves_count = 0;
    }

    /// Rolls if the side to move has no dice. Returns whether dice were rolled.
    pub fn roll(&mut self) -> bool {
        self.board.begin_turn_if_needed()
    }

    /// Destinations for the checker on `from`, or none when it is not the
    /// side to move.
    pub fn select(&self, from: usize) -> Result<Destinations, BoardError> {
        let cell = self.board.cell_at(from)?;
        if cell.owner() != self.board.current_turn() {
            return Ok(Destinations::new());
        }
        self.board.legal_destinations(from)
    }

    /// Every movable checker of the side to move with its destinations.
    /// Empty while no dice are pending.
    pub fn hints(&self) -> HashMap<usize, Destinations> {
        let mut hints = HashMap::new();
        if self.board.awaiting_roll() {
            return hints;
        }
        for from in 0..CELL_COUNT {
            if let Ok(destinations) = self.select(from) {
                if !destinations.is_empty() {
                    hints.insert(from, destinations);
                }
            }
        }
        hints
    }

    /// Cells the side to move may bear off from right now.
    pub fn bear_off_candidates(&mut self) -> Vec<usize> {
        if self.board.awaiting_roll() {
            return Vec::new();
        }
        self.board.recompute_bear_off_eligibility();
        let turn = self.board.current_turn();
        (0..CELL_COUNT)
            .filter(|&i| self.board.cells()[i].owner() == turn)
            .filter(|&i| self.board.is_bear_off_legal(i).unwrap_or(false))
            .collect()
    }

    /// Plays a move and returns the winner, if the move decided the game.
    pub fn play(&mut self, from: usize, to: usize) -> Result<Option<Color>, BoardError> {
        self.board.apply_move(from, to)?;
        self.moves_count += 1;
        Ok(self.finish_if_won())
    }

    /// Bears off one checker after refreshing eligibility.
    /// Call [`Self::roll`] afterwards once the dice are used up.
    pub fn bear_off(&mut self, from: usize) -> Result<Option<Color>, BoardError> {
        self.board.recompute_bear_off_eligibility();
        self.board.apply_bear_off(from)?;
        Ok(self.finish_if_won())
    }

    pub fn pass(&mut self) -> Result<(), BoardError> {
        self.board.pass_turn()
    }

    fn finish_if_won(&self) -> Option<Color> {
        let winner = self.board.winner();
        if let Some(color) = winner {
            tracing::info!(winner = ?color, moves = self.moves_count, "game over");
        }
        winner
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cells: self.board.cells().to_vec(),
            pending_dice: self.board.pending_dice().to_vec(),
            current_turn: self.board.current_turn(),
            head_move_count: self.board.head_move_count(),
            moves_count: self.moves_count,
            winner: self.board.winner(),
        }
    }
}
