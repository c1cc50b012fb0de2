use serde::{Deserialize, Serialize};

use crate::backgammon::{BoardError, Color};

/// Number of cells on the track. Index arithmetic wraps modulo this value.
pub const CELL_COUNT: usize = 24;

/// Checkers each side starts with.
pub const CHECKERS_PER_SIDE: u8 = 15;

/// Occupancy of one track cell.
///
/// `count == 0` always goes together with `owner == Color::Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PositionCell {
    count: u8,
    owner: Color,
}

impl PositionCell {
    pub const EMPTY: Self = PositionCell { count: 0, owner: Color::Neutral };

    /// Creates a cell holding `count` checkers of `owner`.
    /// A zero count or a neutral owner both yield an empty cell.
    pub fn new(count: u8, owner: Color) -> Self {
        if count == 0 || !owner.is_player() {
            Self::EMPTY
        } else {
            PositionCell { count, owner }
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn owner(&self) -> Color {
        self.owner
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether a checker of `color` may land here.
    pub fn accepts(&self, color: Color) -> bool {
        self.owner == Color::Neutral || self.owner == color
    }

    pub(crate) fn place(&mut self, color: Color) {
        self.count += 1;
        self.owner = color;
    }

    pub(crate) fn take(&mut self) {
        self.count -= 1;
        if self.count == 0 {
            self.owner = Color::Neutral;
        }
    }
}

/// Validates a caller-supplied cell index.
pub fn check_index(index: usize) -> Result<usize, BoardError> {
    if index < CELL_COUNT {
        Ok(index)
    } else {
        Err(BoardError::InvalidIndex(index))
    }
}

/// Wraps an unwrapped track coordinate back onto the board.
pub(crate) fn wrap(position: usize) -> usize {
    position % CELL_COUNT
}
