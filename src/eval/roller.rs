use super::value::Number;
use crate::common::Float;
use rand::seq::SliceRandom;
use rand::Rng;

/// A source of uniform randomness.
pub trait Randomizer {
    /// A uniform integer in `[0, bound)`. `bound` is never zero.
    fn next_int(&mut self, bound: u64) -> u64;

    /// A uniform real in `[0, 1)`.
    fn next_double(&mut self) -> Float;

    /// Rolls one die. A one-sided die is a decimal die drawing from `[0, 1)`.
    fn roll_die(&mut self, sides: u64) -> Number {
        if sides <= 1 {
            Number::die(self.next_double(), 1.0)
        } else {
            Number::die((self.next_int(sides) + 1) as Float, sides as Float)
        }
    }

    /// Puts `items` into a uniformly random order.
    fn shuffle<T>(&mut self, items: &mut [T]);
}

impl<R: Rng> Randomizer for R {
    fn next_int(&mut self, bound: u64) -> u64 {
        self.gen_range(0..bound)
    }

    fn next_double(&mut self) -> Float {
        self.gen()
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        SliceRandom::shuffle(items, self);
    }
}

/// A randomizer that replays a fixed, cycling script of die faces.
///
/// Each draw takes the next face `f` and answers `next_int(n)` with
/// `(f - 1) % n`, so a die with at least `f` sides rolls exactly `f`.
/// Decimal draws read the face as hundredths.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    faces: Vec<u64>,
    next: usize,
}

impl ScriptedRoller {
    pub fn new(faces: impl Into<Vec<u64>>) -> Self {
        Self {
            faces: faces.into(),
            next: 0,
        }
    }

    fn next_face(&mut self) -> u64 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face.max(1)
    }
}

impl Randomizer for ScriptedRoller {
    fn next_int(&mut self, bound: u64) -> u64 {
        (self.next_face() - 1) % bound
    }

    fn next_double(&mut self) -> Float {
        ((self.next_face() - 1) % 100) as Float / 100.0
    }

    /// Fisher-Yates, one scripted face per swap.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_scripted_faces() {
        let mut roller = ScriptedRoller::new(vec![3, 1, 5, 2]);
        let faces: Vec<_> = (0..5).map(|_| roller.roll_die(6).value).collect();
        assert_eq!(faces, vec![3.0, 1.0, 5.0, 2.0, 3.0]);
    }

    #[test]
    fn test_scripted_wraps_small_dice() {
        let mut roller = ScriptedRoller::new(vec![5]);
        let die = roller.roll_die(4);
        assert_eq!(die.value, 1.0);
        assert_eq!(die.potential, 4.0);
    }

    #[test]
    fn test_decimal_die() {
        let mut roller = ScriptedRoller::new(vec![26]);
        let die = roller.roll_die(1);
        assert_eq!(die.value, 0.25);
        assert_eq!(die.potential, 1.0);
    }

    #[test]
    fn test_seeded_rng_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let die = rng.roll_die(20);
            assert!((1.0..=20.0).contains(&die.value));
            let x = rng.next_double();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let mut items: Vec<_> = (0..10).collect();
        Randomizer::shuffle(&mut rng, &mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_scripted_shuffle() {
        // Face 1 always swaps with the front, rotating left.
        let mut roller = ScriptedRoller::new(vec![1]);
        let mut items = vec!['a', 'b', 'c', 'd'];
        roller.shuffle(&mut items);
        assert_eq!(items, vec!['b', 'c', 'd', 'a']);

        let mut empty: Vec<u8> = vec![];
        roller.shuffle(&mut empty);
        assert!(empty.is_empty());
    }
}
