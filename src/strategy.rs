// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use core::fmt;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;

#[cfg(feature = "std")]
use rand::SeedableRng;

/// Placement strategy used to choose which free block satisfies a request.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Strategy {
    /// Take the first free block large enough, scanning from the start of the arena.
    FirstFit,
    /// Like [`FirstFit`](Self::FirstFit), but resume scanning from the block chosen by the
    /// previous next-fit allocation, wrapping around to the start of the arena.
    NextFit,
    /// Take the smallest free block large enough; ties go to the earliest block.
    BestFit,
}

impl Strategy {
    /// All the strategies, in their canonical order.
    pub const ALL: [Self; 3] = [Self::FirstFit, Self::NextFit, Self::BestFit];

    /// Human readable name of the strategy.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstFit => "First Fit",
            Self::NextFit => "Next Fit",
            Self::BestFit => "Best Fit",
        }
    }
}

impl fmt::Display for Strategy {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy deciding in which order [`Manager::allocate_auto`](crate::Manager::allocate_auto)
/// tries the placement strategies.
///
/// `order()` is called once per automatic allocation. The manager stops at the first strategy in
/// the returned order that succeeds.
pub trait StrategyOrder {
    /// Returns the order in which strategies should be attempted for the next allocation.
    fn order(&mut self) -> [Strategy; 3];
}

impl<T: StrategyOrder + ?Sized> StrategyOrder for &mut T {
    #[inline]
    fn order(&mut self) -> [Strategy; 3] {
        (**self).order()
    }
}

/// Shuffles the strategies with a fresh random permutation on every call.
///
/// # Examples
///
/// ```
/// use fitsim::RandomOrder;
/// use fitsim::StrategyOrder;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let mut order = RandomOrder::new(SmallRng::seed_from_u64(7));
/// let mut strategies = order.order();
/// strategies.sort_by_key(|strategy| strategy.name());
/// assert_eq!(strategies.map(|strategy| strategy.name()), ["Best Fit", "First Fit", "Next Fit"]);
/// ```
#[derive(Clone, Debug)]
pub struct RandomOrder<R = SmallRng> {
    rng: R,
}

impl<R: Rng> RandomOrder<R> {
    /// Constructs a random order drawing its permutations from `rng`.
    #[inline]
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the underlying random number generator.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> R {
        self.rng
    }
}

#[cfg(feature = "std")]
impl RandomOrder<SmallRng> {
    /// Constructs a random order seeded from operating system entropy.
    #[inline]
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }
}

#[cfg(feature = "std")]
impl Default for RandomOrder<SmallRng> {
    #[inline]
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> StrategyOrder for RandomOrder<R> {
    fn order(&mut self) -> [Strategy; 3] {
        let mut strategies = Strategy::ALL;
        strategies.shuffle(&mut self.rng);
        strategies
    }
}

/// Always tries the strategies in the same order.
///
/// Useful to make automatic allocation reproducible.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FixedOrder(pub [Strategy; 3]);

impl Default for FixedOrder {
    #[inline]
    fn default() -> Self {
        Self(Strategy::ALL)
    }
}

impl StrategyOrder for FixedOrder {
    #[inline]
    fn order(&mut self) -> [Strategy; 3] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn random_order_is_a_permutation() {
        let mut order = RandomOrder::new(SmallRng::seed_from_u64(12345));
        for _ in 0..64 {
            let strategies = order.order();
            for strategy in Strategy::ALL {
                assert_eq!(strategies.iter().filter(|s| **s == strategy).count(), 1);
            }
        }
    }

    #[test]
    fn random_order_varies() {
        let mut order = RandomOrder::new(SmallRng::seed_from_u64(12345));
        let first = order.order();
        assert!((0..64).any(|_| order.order() != first));
    }

    #[test]
    fn same_seed_same_orders() {
        let mut a = RandomOrder::new(SmallRng::seed_from_u64(99));
        let mut b = RandomOrder::new(SmallRng::seed_from_u64(99));
        for _ in 0..16 {
            assert_eq!(a.order(), b.order());
        }
    }

    #[test]
    #[cfg(feature = "std")]
    fn entropy_order_is_a_permutation() {
        let mut order = RandomOrder::from_entropy();
        let mut strategies = order.order();
        strategies.sort_by_key(|strategy| strategy.name());
        assert_eq!(
            strategies,
            [Strategy::BestFit, Strategy::FirstFit, Strategy::NextFit]
        );
    }

    #[test]
    fn fixed_order() {
        let mut order = FixedOrder([Strategy::BestFit, Strategy::FirstFit, Strategy::NextFit]);
        assert_eq!(
            order.order(),
            [Strategy::BestFit, Strategy::FirstFit, Strategy::NextFit]
        );
        assert_eq!(FixedOrder::default().order(), Strategy::ALL);
    }
}
