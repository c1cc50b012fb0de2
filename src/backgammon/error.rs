use thiserror::Error;

use crate::backgammon::Color;

/// Precondition failures reported by the rule engine.
///
/// A call that returns an error leaves the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell index {0} is outside the track (0..24)")]
    InvalidIndex(usize),
    #[error("no active turn: dice must be rolled first")]
    NoActiveTurn,
    #[error("cell {0} holds no checkers")]
    EmptyCell(usize),
    #[error("cell {cell} belongs to {owner:?} but it is {turn:?}'s turn")]
    WrongTurn { cell: usize, owner: Color, turn: Color },
    #[error("cell {to} is occupied by {owner:?}")]
    Blocked { to: usize, owner: Color },
    #[error("illegal move {from} -> {to}: distance {distance} matches no remaining die")]
    IllegalMove { from: usize, to: usize, distance: usize },
    #[error("no remaining die bears a checker off from cell {0}")]
    IllegalBearOff(usize),
    #[error("{color:?} may not bear off yet")]
    BearOffNotAllowed { color: Color },
    #[error("{color:?} would have {count} checkers on the board, more than 15")]
    TooManyCheckers { color: Color, count: u32 },
    #[error("die value {0} is outside 1..=6")]
    InvalidDie(u8),
    #[error("{0} dice given, at most 4 can be pending")]
    TooManyDice(usize),
    #[error("cannot pass while a legal move exists")]
    MovesAvailable,
}
