use std::fmt::{Debug, Display};

use crate::{
    backgammon::{
        BoardError, BoardObserver, Color, DiceGenerator, PendingDice, PositionCell,
        cell::{CELL_COUNT, CHECKERS_PER_SIDE, check_index, wrap},
    },
    misc::TinyVec,
};

/// Legal destination cells for one checker, without duplicates.
pub type Destinations = TinyVec<usize, 4>;

/// The rule engine: 24 cells, the side to move and the dice it still has to play.
///
/// Each game starts with 15 White checkers on cell 0 and 15 Black checkers on
/// cell 12. Both sides travel towards higher indices and the track wraps, so
/// White's home board is 18..24 and Black's is 6..12. A checker may never land
/// on a cell held by the opponent; there is no hitting and no bar.
///
/// Public operations validate cell indices and return [`BoardError`] before
/// touching any state.
pub struct Board {
    cells: [PositionCell; CELL_COUNT],
    current_turn: Color,
    pending: PendingDice,
    head_move_count: u8,
    can_bear_off_white: bool,
    can_bear_off_black: bool,
    // Set until the first roll of a freshly set-up board, which goes to
    // `current_turn` instead of passing the turn.
    opening: bool,
    dice: DiceGenerator,
    observer: Option<Box<dyn BoardObserver + Send>>,
}

impl Board {
    /// Creates a board in the starting position. Black rolls first.
    pub fn new(dice: DiceGenerator) -> Self {
        let mut board = Board {
            cells: [PositionCell::EMPTY; CELL_COUNT],
            current_turn: Color::Black,
            pending: PendingDice::new(),
            head_move_count: 0,
            can_bear_off_white: false,
            can_bear_off_black: false,
            opening: true,
            dice,
            observer: None,
        };
        board.new_game();
        board
    }

    /// Starting position with a ChaCha8 dice stream seeded by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(DiceGenerator::seeded(seed))
    }

    /// Builds an arbitrary position from `(index, color, count)` entries.
    ///
    /// Entries for the same cell add up. A neutral `turn` falls back to Black.
    /// With no `pending` dice, the first roll goes to `turn`.
    pub fn from_layout(
        dice: DiceGenerator,
        layout: &[(usize, Color, u8)],
        turn: Color,
        pending: PendingDice,
    ) -> Result<Self, BoardError> {
        let mut cells = [PositionCell::EMPTY; CELL_COUNT];
        for &(index, color, count) in layout {
            let index = check_index(index)?;
            if count == 0 || !color.is_player() {
                continue;
            }
            let cell = cells[index];
            if !cell.accepts(color) {
                return Err(BoardError::Blocked { to: index, owner: cell.owner() });
            }
            cells[index] = PositionCell::new(cell.count().saturating_add(count), color);
        }

        for color in [Color::White, Color::Black] {
            let count = Self::count_in(&cells, color);
            if count > CHECKERS_PER_SIDE as u32 {
                return Err(BoardError::TooManyCheckers { color, count });
            }
        }

        Ok(Board {
            cells,
            current_turn: if turn.is_player() { turn } else { Color::Black },
            pending,
            head_move_count: 0,
            can_bear_off_white: false,
            can_bear_off_black: false,
            opening: pending.is_empty(),
            dice,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: impl BoardObserver + Send + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn set_observer(&mut self, observer: impl BoardObserver + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Resets to the starting layout. The observer and dice source are kept.
    pub fn new_game(&mut self) {
        self.cells = [PositionCell::EMPTY; CELL_COUNT];
        self.cells[0] = PositionCell::new(CHECKERS_PER_SIDE, Color::White);
        self.cells[12] = PositionCell::new(CHECKERS_PER_SIDE, Color::Black);
        self.current_turn = Color::Black;
        self.pending.clear();
        self.head_move_count = 0;
        self.can_bear_off_white = false;
        self.can_bear_off_black = false;
        self.opening = true;
        tracing::debug!("new game");
    }

    pub fn cell_at(&self, index: usize) -> Result<PositionCell, BoardError> {
        Ok(self.cells[check_index(index)?])
    }

    pub fn cells(&self) -> &[PositionCell; CELL_COUNT] {
        &self.cells
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn pending_dice(&self) -> &PendingDice {
        &self.pending
    }

    pub fn head_move_count(&self) -> u8 {
        self.head_move_count
    }

    pub fn can_bear_off_white(&self) -> bool {
        self.can_bear_off_white
    }

    pub fn can_bear_off_black(&self) -> bool {
        self.can_bear_off_black
    }

    /// Eligibility flag for `color` as of the last [`Self::recompute_bear_off_eligibility`].
    pub fn can_bear_off(&self, color: Color) -> bool {
        match color {
            Color::White => self.can_bear_off_white,
            Color::Black => self.can_bear_off_black,
            Color::Neutral => false,
        }
    }

    pub fn awaiting_roll(&self) -> bool {
        self.pending.is_empty()
    }

    /// Checkers of `color` still on the track.
    pub fn checker_count(&self, color: Color) -> u32 {
        Self::count_in(&self.cells, color)
    }

    fn count_in(cells: &[PositionCell; CELL_COUNT], color: Color) -> u32 {
        cells
            .iter()
            .filter(|c| c.owner() == color)
            .map(|c| c.count() as u32)
            .sum()
    }

    /// Rolls for the next turn if the current one has no dice left.
    ///
    /// Passes the turn to the other side (except on the opening roll), stores
    /// the new dice, notifies the observer and resets the head counter.
    /// Returns `false` without doing anything while dice remain.
    pub fn begin_turn_if_needed(&mut self) -> bool {
        if !self.pending.is_empty() {
            return false;
        }
        if self.opening {
            self.opening = false;
        } else {
            self.current_turn = self.current_turn.opposite();
        }
        self.pending = self.dice.roll();
        tracing::debug!(turn = ?self.current_turn, dice = ?self.pending, "dice rolled");

        if let (Some((first, second)), Some(observer)) = (self.pending.faces(), self.observer.as_mut()) {
            observer.dice_rolled(self.current_turn, first, second);
        }
        self.head_move_count = 0;
        true
    }

    /// Cells the checker on `from` may move to with the remaining dice.
    ///
    /// With two different dice both single hops are offered, and for each
    /// open hop the combined distance as well. Only the landing cells are
    /// checked, not the intermediate cell of the other die order. With
    /// doubles (or a single die left) only the one-die hop is offered.
    ///
    /// The color moving is the occupant of `from`; callers filter by turn.
    /// An empty cell has no destinations.
    pub fn legal_destinations(&self, from: usize) -> Result<Destinations, BoardError> {
        let from = check_index(from)?;
        if self.pending.is_empty() {
            return Err(BoardError::NoActiveTurn);
        }
        let color = self.cells[from].owner();
        let mut result = Destinations::new();

        if !color.is_player() {
            return Ok(result);
        }
        if color.head_cell() == Some(from) && self.head_move_count > 0 {
            return Ok(result);
        }

        match (self.pending.get(0), self.pending.get(1)) {
            (Some(d1), Some(d2)) if !self.pending.is_uniform() => {
                for die in [d1, d2] {
                    if self.offer(&mut result, color, from + die as usize) {
                        self.offer(&mut result, color, from + (d1 + d2) as usize);
                    }
                }
            }
            (Some(die), _) => {
                self.offer(&mut result, color, from + die as usize);
            }
            (None, _) => {}
        }

        // A checker that has crossed the midpoint may not wrap into the half it started from.
        match color {
            Color::White if from >= 12 => result.retain(|to| to >= 12),
            Color::Black if from < 12 => result.retain(|to| to < 12),
            _ => {}
        }
        Ok(result)
    }

    fn offer(&self, result: &mut Destinations, color: Color, target: usize) -> bool {
        let to = wrap(target);
        if self.cells[to].accepts(color) {
            result.push_unique(to);
            true
        } else {
            false
        }
    }

    /// Updates both bear-off flags. Only the side to move can become eligible,
    /// once none of its checkers remain outside its home board.
    pub fn recompute_bear_off_eligibility(&mut self) {
        self.can_bear_off_white =
            self.current_turn == Color::White && self.home_board_complete(Color::White);
        self.can_bear_off_black =
            self.current_turn == Color::Black && self.home_board_complete(Color::Black);
    }

    fn home_board_complete(&self, color: Color) -> bool {
        color
            .outer_track()
            .all(|i| self.cells[wrap(i)].owner() != color)
    }

    /// Whether the checker on `from` may be borne off with a remaining die.
    /// Reads the flags set by [`Self::recompute_bear_off_eligibility`].
    pub fn is_bear_off_legal(&self, from: usize) -> Result<bool, BoardError> {
        let from = check_index(from)?;
        if self.pending.is_empty() {
            return Err(BoardError::NoActiveTurn);
        }
        let color = self.cells[from].owner();
        Ok(self.can_bear_off(color) && self.bear_off_die(from, color).is_some())
    }

    fn bear_off_die(&self, from: usize, color: Color) -> Option<u8> {
        let threshold = color.bear_off_threshold()?;
        self.pending.smallest_where(|die| from + die as usize >= threshold)
    }

    /// Dice a move of `distance` consumes: one matching die, or the two
    /// smallest remaining dice when they add up to it.
    fn dice_for_distance(&self, distance: usize) -> Option<TinyVec<u8, 2>> {
        let mut used = TinyVec::new();
        if let Ok(die) = u8::try_from(distance) {
            if self.pending.contains(die) {
                used.push(die);
                return Some(used);
            }
        }
        match self.pending.two_smallest() {
            Some((a, b)) if (a + b) as usize == distance => {
                used.push(a);
                used.push(b);
                Some(used)
            }
            _ => None,
        }
    }

    fn check_mover(&self, from: usize) -> Result<Color, BoardError> {
        if self.pending.is_empty() {
            return Err(BoardError::NoActiveTurn);
        }
        let cell = self.cells[from];
        if cell.is_empty() {
            return Err(BoardError::EmptyCell(from));
        }
        if cell.owner() != self.current_turn {
            return Err(BoardError::WrongTurn {
                cell: from,
                owner: cell.owner(),
                turn: self.current_turn,
            });
        }
        Ok(cell.owner())
    }

    /// Moves one checker of the side to move from `from` to `to`, consuming
    /// the matching die (or both dice for a combined move). Rolls for the next
    /// turn once the dice run out.
    pub fn apply_move(&mut self, from: usize, to: usize) -> Result<(), BoardError> {
        let from = check_index(from)?;
        let to = check_index(to)?;
        let color = self.check_mover(from)?;

        let distance = (to + CELL_COUNT - from) % CELL_COUNT;
        let used = self
            .dice_for_distance(distance)
            .ok_or(BoardError::IllegalMove { from, to, distance })?;
        if !self.cells[to].accepts(color) {
            return Err(BoardError::Blocked { to, owner: self.cells[to].owner() });
        }

        for die in used.iter() {
            self.pending.remove_one(die);
        }
        if color.head_cell() == Some(from) {
            self.head_move_count += 1;
        }
        self.cells[to].place(color);
        self.cells[from].take();
        tracing::trace!(?color, from, to, dice = ?used, "move");

        self.begin_turn_if_needed();
        Ok(())
    }

    /// Removes one checker of the side to move from `from`, consuming the
    /// smallest die that carries it past its exit threshold. The turn does
    /// not advance, even when this uses the last die.
    pub fn apply_bear_off(&mut self, from: usize) -> Result<(), BoardError> {
        let from = check_index(from)?;
        let color = self.check_mover(from)?;
        if !self.can_bear_off(color) {
            return Err(BoardError::BearOffNotAllowed { color });
        }
        let die = self
            .bear_off_die(from, color)
            .ok_or(BoardError::IllegalBearOff(from))?;

        self.pending.remove_one(die);
        self.cells[from].take();
        tracing::trace!(?color, from, die, "bear off");
        Ok(())
    }

    /// Whether the side to move can play any remaining die, counting
    /// bear-offs as if eligibility had just been recomputed.
    pub fn has_any_move(&self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        let color = self.current_turn;
        let home_complete = self.home_board_complete(color);
        (0..CELL_COUNT)
            .filter(|&i| self.cells[i].owner() == color)
            .any(|i| {
                let can_move = self
                    .legal_destinations(i)
                    .map(|d| !d.is_empty())
                    .unwrap_or(false);
                can_move || (home_complete && self.bear_off_die(i, color).is_some())
            })
    }

    /// Forfeits the remaining dice and rolls for the next turn.
    /// Only allowed when the side to move has nothing to play.
    pub fn pass_turn(&mut self) -> Result<(), BoardError> {
        if self.has_any_move() {
            return Err(BoardError::MovesAvailable);
        }
        tracing::debug!(turn = ?self.current_turn, dice = ?self.pending, "no legal move, passing");
        self.pending.clear();
        self.begin_turn_if_needed();
        Ok(())
    }

    /// The side whose checkers have all left the track, if any.
    pub fn winner(&self) -> Option<Color> {
        let on_track = |color| self.cells.iter().any(|c| c.owner() == color);
        if !on_track(Color::White) {
            Some(Color::White)
        } else if !on_track(Color::Black) {
            Some(Color::Black)
        } else {
            None
        }
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("cells", &self.cells)
            .field("current_turn", &self.current_turn)
            .field("pending", &self.pending)
            .field("head_move_count", &self.head_move_count)
            .field("can_bear_off_white", &self.can_bear_off_white)
            .field("can_bear_off_black", &self.can_bear_off_black)
            .finish_non_exhaustive()
    }
}

impl Display for Board {
    /// Two rows of twelve cells: `W3` is three White checkers, `.` an empty cell.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in [0..12, 12..24] {
            for i in row {
                let cell = self.cells[i];
                match cell.owner() {
                    Color::White => write!(f, " W{:<2}", cell.count())?,
                    Color::Black => write!(f, " B{:<2}", cell.count())?,
                    Color::Neutral => write!(f, " .  ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "{:?} to move, {:?}", self.current_turn, self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(layout: &[(usize, Color, u8)], turn: Color, dice: &[u8]) -> Board {
        Board::from_layout(
            DiceGenerator::scripted([1, 2]),
            layout,
            turn,
            PendingDice::from_values(dice).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_dice_for_distance() {
        let board = board_with(&[(0, Color::White, 15)], Color::White, &[3, 5]);
        assert_eq!(board.dice_for_distance(3).unwrap().to_vec(), vec![3]);
        assert_eq!(board.dice_for_distance(8).unwrap().to_vec(), vec![3, 5]);
        assert!(board.dice_for_distance(4).is_none());
        assert!(board.dice_for_distance(0).is_none());
        assert!(board.dice_for_distance(300).is_none());
    }

    #[test]
    fn test_dice_for_distance_with_doubles() {
        let board = board_with(&[(0, Color::White, 15)], Color::White, &[4, 4, 4]);
        assert_eq!(board.dice_for_distance(4).unwrap().to_vec(), vec![4]);
        assert_eq!(board.dice_for_distance(8).unwrap().to_vec(), vec![4, 4]);
        assert!(board.dice_for_distance(12).is_none());
    }

    #[test]
    fn test_home_board_complete() {
        let board = board_with(
            &[(18, Color::White, 10), (23, Color::White, 5), (8, Color::Black, 15)],
            Color::White,
            &[1, 2],
        );
        assert!(board.home_board_complete(Color::White));
        assert!(board.home_board_complete(Color::Black));

        let board = board_with(&[(17, Color::White, 1), (5, Color::Black, 1)], Color::White, &[1, 2]);
        assert!(!board.home_board_complete(Color::White));
        assert!(!board.home_board_complete(Color::Black));
    }

    #[test]
    fn test_from_layout_rejects_bad_input() {
        let dice = || DiceGenerator::scripted([1, 2]);
        assert_eq!(
            Board::from_layout(dice(), &[(24, Color::White, 1)], Color::White, PendingDice::new()).unwrap_err(),
            BoardError::InvalidIndex(24)
        );
        assert_eq!(
            Board::from_layout(
                dice(),
                &[(3, Color::White, 10), (4, Color::White, 6)],
                Color::White,
                PendingDice::new()
            )
            .unwrap_err(),
            BoardError::TooManyCheckers { color: Color::White, count: 16 }
        );
        assert_eq!(
            Board::from_layout(
                dice(),
                &[(3, Color::White, 1), (3, Color::Black, 1)],
                Color::White,
                PendingDice::new()
            )
            .unwrap_err(),
            BoardError::Blocked { to: 3, owner: Color::White }
        );
    }

    #[test]
    fn test_display() {
        let board = Board::seeded(1);
        let text = board.to_string();
        assert!(text.starts_with(" W15"));
        assert!(text.contains("Black to move"));
    }
}
