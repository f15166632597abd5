//! Randomness source for the advisor.
//!
//! Every random draw the advisor makes (which action to suggest, the ally-aid
//! coin flip, which wounded ally to help) goes through [`Dice`], so hosts can
//! seed it and tests can script it.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The random draws the decision policy needs.
pub trait Dice {
    /// Returns true with the given probability in `[0, 1]`.
    ///
    /// Probabilities outside the range are clamped; NaN never succeeds.
    fn chance(&mut self, probability: f64) -> bool;

    /// Returns an index uniformly drawn from `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }

    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// [`Dice`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDice<R>(pub R);

impl RngDice<SmallRng> {
    /// Creates reproducible dice from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Dice for RngDice<R> {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// [`Dice`] that replays fixed outcomes.
///
/// Coin flips come from one queue and index picks from another. Once a queue
/// runs dry, flips come up false and picks return the first index.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    coins: VecDeque<bool>,
    picks: VecDeque<usize>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coins(mut self, coins: impl IntoIterator<Item = bool>) -> Self {
        self.coins.extend(coins);
        self
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Number of scripted outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.coins.len() + self.picks.len()
    }
}

impl Dice for ScriptedDice {
    fn chance(&mut self, _probability: f64) -> bool {
        self.coins.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().map(|i| i % len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_dice_are_reproducible() {
        let mut a = RngDice::seeded(42);
        let mut b = RngDice::seeded(42);

        let rolls_a: Vec<usize> = (0..50).map(|_| a.pick(6)).collect();
        let rolls_b: Vec<usize> = (0..50).map(|_| b.pick(6)).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|&r| r < 6));
    }

    #[test]
    fn test_chance_extremes() {
        let mut dice = RngDice::seeded(7);
        assert!((0..20).all(|_| dice.chance(1.0)));
        assert!((0..20).all(|_| !dice.chance(0.0)));
    }

    #[test]
    fn test_chance_out_of_range() {
        let mut dice = RngDice::seeded(7);
        assert!(!dice.chance(f64::NAN));
        assert!(dice.chance(f64::INFINITY));
        assert!(!dice.chance(-3.0));
    }

    #[test]
    fn test_scripted_dice_replays_in_order() {
        let mut dice = ScriptedDice::new()
            .with_coins([true, false])
            .with_picks([2, 5]);

        assert!(dice.chance(0.5));
        assert!(!dice.chance(0.5));
        assert_eq!(dice.pick(3), 2);
        assert_eq!(dice.pick(3), 2);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_scripted_dice_defaults_when_exhausted() {
        let mut dice = ScriptedDice::new();
        assert!(!dice.chance(0.9));
        assert_eq!(dice.pick(4), 0);
    }
}
