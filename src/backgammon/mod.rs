mod board;
pub use board::{Board, Destinations};

mod cell;
pub use cell::{CELL_COUNT, CHECKERS_PER_SIDE, PositionCell, check_index};

mod color;
pub use color::Color;

mod dice;
pub use dice::{DiceGenerator, FaceSource, PendingDice, RandomFaces, ScriptedFaces};

mod error;
pub use error::BoardError;

mod game;
pub use game::{Game, GameSnapshot};

mod observer;
pub use observer::{BoardObserver, ChannelObserver, DiceRolled, FnObserver};
