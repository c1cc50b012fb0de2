use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{backgammon::BoardError, misc::TinyVec};

/// Source of single die faces. Implementations must return values in `1..=6`.
pub trait FaceSource {
    fn next_face(&mut self) -> u8;
}

/// Uniform faces drawn from any [`Rng`]. Defaults to a seedable ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct RandomFaces<R = ChaCha8Rng> {
    rng: R,
}

impl RandomFaces<ChaCha8Rng> {
    /// Same seed, same sequence of faces.
    pub fn seeded(seed: u64) -> Self {
        RandomFaces { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        RandomFaces { rng: ChaCha8Rng::from_rng(&mut rand::rng()) }
    }
}

impl<R: Rng> RandomFaces<R> {
    pub fn new(rng: R) -> Self {
        RandomFaces { rng }
    }
}

impl<R: Rng> FaceSource for RandomFaces<R> {
    fn next_face(&mut self) -> u8 {
        self.rng.random_range(1..=6)
    }
}

/// Replays a fixed list of faces, starting over once it is exhausted.
/// Faces are clamped to `1..=6`; an empty script yields ones.
#[derive(Debug, Clone)]
pub struct ScriptedFaces {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedFaces {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        ScriptedFaces {
            faces: faces.into_iter().map(|f| f.clamp(1, 6)).collect(),
            cursor: 0,
        }
    }
}

impl FaceSource for ScriptedFaces {
    fn next_face(&mut self) -> u8 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}

/// Produces a turn's die values from an injected [`FaceSource`].
pub struct DiceGenerator {
    source: Box<dyn FaceSource + Send>,
}

impl DiceGenerator {
    pub fn new(source: impl FaceSource + Send + 'static) -> Self {
        DiceGenerator { source: Box::new(source) }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(RandomFaces::seeded(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(RandomFaces::from_entropy())
    }

    /// Convenience for tests and replays: faces are consumed two per roll.
    pub fn scripted(faces: impl IntoIterator<Item = u8>) -> Self {
        Self::new(ScriptedFaces::new(faces))
    }

    /// Draws two faces. A matching pair yields four moves of that value.
    pub fn roll(&mut self) -> PendingDice {
        let first = self.source.next_face();
        let second = self.source.next_face();
        PendingDice::from_faces(first, second)
    }
}

impl Debug for DiceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiceGenerator").finish_non_exhaustive()
    }
}

/// Remaining die values of the current turn, at most four.
///
/// Behaves as a multiset: [`PendingDice::remove_one`] takes out a single
/// occurrence and keeps the order of the rest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PendingDice {
    values: TinyVec<u8, 4>,
}

impl PendingDice {
    pub const fn new() -> Self {
        PendingDice { values: TinyVec::new() }
    }

    /// Applies the doubles rule to a rolled pair.
    pub fn from_faces(first: u8, second: u8) -> Self {
        if first == second {
            PendingDice { values: [first; 4].into_iter().collect() }
        } else {
            PendingDice { values: [first, second].into_iter().collect() }
        }
    }

    /// Takes the values as given, without the doubles rule.
    pub fn from_values(values: &[u8]) -> Result<Self, BoardError> {
        if values.len() > 4 {
            return Err(BoardError::TooManyDice(values.len()));
        }
        if let Some(&bad) = values.iter().find(|v| !(1..=6).contains(*v)) {
            return Err(BoardError::InvalidDie(bad));
        }
        Ok(PendingDice { values: values.iter().copied().collect() })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter()
    }

    pub fn contains(&self, value: u8) -> bool {
        self.values.contains(&value)
    }

    pub fn remove_one(&mut self, value: u8) -> bool {
        self.values.remove(&value)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// All remaining values are equal (a doubles roll, or a single die left).
    pub fn is_uniform(&self) -> bool {
        match self.values.get(0) {
            Some(first) => self.values.iter().all(|v| v == first),
            None => false,
        }
    }

    /// The two smallest remaining values, smallest first.
    pub fn two_smallest(&self) -> Option<(u8, u8)> {
        let mut sorted = self.values.to_vec();
        sorted.sort_unstable();
        match sorted.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    /// The smallest remaining value satisfying `pred`.
    pub fn smallest_where(&self, pred: impl Fn(u8) -> bool) -> Option<u8> {
        self.values.iter().filter(|&v| pred(v)).min()
    }

    /// The two faces shown for this roll, as reported to observers.
    pub fn faces(&self) -> Option<(u8, u8)> {
        Some((self.values.get(0)?, self.values.get(1)?))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.values.to_vec()
    }
}

impl Debug for PendingDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "Dice(none)");
        }
        write!(f, "Dice(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_roll() {
        let mut generator = DiceGenerator::seeded(7);
        for _ in 1..=100 {
            let dice = generator.roll();
            assert!(dice.iter().all(|v| (1..=6).contains(&v)));
            let (first, second) = dice.faces().unwrap();
            if first == second {
                assert_eq!(dice.len(), 4);
                assert!(dice.is_uniform());
            } else {
                assert_eq!(dice.len(), 2);
                assert_eq!(dice.to_vec(), vec![first, second]);
            }
        }
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let mut a = DiceGenerator::seeded(42);
        let mut b = DiceGenerator::seeded(42);
        for _ in 0..50 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_scripted_rolls() {
        let mut generator = DiceGenerator::scripted([3, 5, 4, 4]);
        assert_eq!(generator.roll().to_vec(), vec![3, 5]);
        assert_eq!(generator.roll().to_vec(), vec![4, 4, 4, 4]);
        // Script starts over.
        assert_eq!(generator.roll().to_vec(), vec![3, 5]);
    }

    #[test]
    fn test_remove_one_occurrence() {
        let mut dice = PendingDice::from_faces(4, 4);
        assert!(dice.remove_one(4));
        assert_eq!(dice.len(), 3);
        assert!(!dice.remove_one(2));
        assert_eq!(dice.len(), 3);
    }

    #[test]
    fn test_two_smallest_and_faces() {
        let dice = PendingDice::from_faces(5, 2);
        assert_eq!(dice.two_smallest(), Some((2, 5)));
        assert_eq!(dice.faces(), Some((5, 2)));
        assert!(!dice.is_uniform());

        let single = PendingDice::from_values(&[6]).unwrap();
        assert_eq!(single.two_smallest(), None);
        assert_eq!(single.faces(), None);
        assert!(single.is_uniform());
        assert!(!PendingDice::new().is_uniform());
    }

    #[test]
    fn test_from_values_rejects_impossible_dice() {
        assert_eq!(PendingDice::from_values(&[0, 9]), Err(BoardError::InvalidDie(0)));
        assert_eq!(PendingDice::from_values(&[3, 7]), Err(BoardError::InvalidDie(7)));
        assert_eq!(PendingDice::from_values(&[2; 5]), Err(BoardError::TooManyDice(5)));
        assert_eq!(PendingDice::from_values(&[]).unwrap(), PendingDice::new());
        assert_eq!(PendingDice::from_values(&[1, 6, 6]).unwrap().to_vec(), vec![1, 6, 6]);
    }

    #[test]
    fn test_smallest_where() {
        let dice = PendingDice::from_faces(6, 3);
        assert_eq!(dice.smallest_where(|v| 20 + v as usize >= 24), Some(6));
        assert_eq!(dice.smallest_where(|v| 22 + v as usize >= 24), Some(3));
        assert_eq!(dice.smallest_where(|v| v > 6), None);
    }
}
