use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::backgammon::Color;

/// Receives dice events from a [`crate::backgammon::Board`].
///
/// Called synchronously from inside `begin_turn_if_needed`, after the new
/// dice are stored and the turn has changed hands.
pub trait BoardObserver {
    fn dice_rolled(&mut self, turn: Color, first: u8, second: u8);
}

/// Adapts a closure into a [`BoardObserver`].
pub struct FnObserver<F>(pub F);

impl<F> BoardObserver for FnObserver<F>
where
    F: FnMut(Color, u8, u8),
{
    fn dice_rolled(&mut self, turn: Color, first: u8, second: u8) {
        (self.0)(turn, first, second)
    }
}

/// Message emitted by [`ChannelObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRolled {
    pub turn: Color,
    pub first: u8,
    pub second: u8,
}

/// Pushes every roll onto a channel for a presentation layer to poll.
/// A disconnected receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<DiceRolled>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<DiceRolled>) -> Self {
        ChannelObserver { sender }
    }
}

impl BoardObserver for ChannelObserver {
    fn dice_rolled(&mut self, turn: Color, first: u8, second: u8) {
        if self.sender.send(DiceRolled { turn, first, second }).is_err() {
            tracing::trace!("dice observer channel closed");
        }
    }
}
