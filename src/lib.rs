//! Rule engine for long backgammon: board state, dice, move legality,
//! bearing off and game termination, plus a self-play simulator.

pub mod backgammon;
pub mod config;
pub mod misc;
pub mod simulation;
pub mod stats;
