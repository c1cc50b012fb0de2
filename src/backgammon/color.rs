use serde::{Deserialize, Serialize};

/// Owner of a cell. `Neutral` marks an empty cell and never takes a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
    #[default]
    Neutral,
}

impl Color {
    /// The other side. Must not be called on [`Color::Neutral`].
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::Neutral => unreachable!("Neutral has no opposite"),
        }
    }

    pub fn is_player(&self) -> bool {
        !matches!(self, Color::Neutral)
    }

    /// The starting cell all 15 checkers of this color begin on.
    pub fn head_cell(&self) -> Option<usize> {
        match self {
            Color::White => Some(0),
            Color::Black => Some(12),
            Color::Neutral => None,
        }
    }

    /// Unwrapped position (`from + die`) a checker must reach to leave the board.
    pub fn bear_off_threshold(&self) -> Option<usize> {
        match self {
            Color::White => Some(24),
            Color::Black => Some(12),
            Color::Neutral => None,
        }
    }

    /// Cells, in unwrapped track coordinates, that must hold none of this
    /// color's checkers before it may bear off.
    pub(crate) fn outer_track(&self) -> std::ops::RangeInclusive<usize> {
        match self {
            Color::White => 0..=17,
            Color::Black => 12..=29,
            Color::Neutral => 1..=0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    #[should_panic]
    fn test_neutral_has_no_opposite() {
        Color::Neutral.opposite();
    }

    #[test]
    fn test_heads_and_thresholds() {
        assert_eq!(Color::White.head_cell(), Some(0));
        assert_eq!(Color::Black.head_cell(), Some(12));
        assert_eq!(Color::Neutral.head_cell(), None);
        assert_eq!(Color::White.bear_off_threshold(), Some(24));
        assert_eq!(Color::Black.bear_off_threshold(), Some(12));
        assert!(Color::Neutral.outer_track().is_empty());
    }
}
