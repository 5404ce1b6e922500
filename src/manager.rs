// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::block::BlockId;
use crate::chain::Chain;
use crate::config::Config;
use crate::error::AllocError;
use crate::error::FreeError;
use crate::outcome::Allocation;
use crate::outcome::Release;
use crate::snapshot::Snapshot;
use crate::strategy::RandomOrder;
use crate::strategy::Strategy;
use crate::strategy::StrategyOrder;
use crate::usage::Usage;
use alloc::vec::Vec;
use core::num::NonZero;
use log::debug;
use log::trace;

/// Allocator manager: owns the block chain and places allocations in it.
///
/// The `P` parameter is the policy used by [`allocate_auto()`](Self::allocate_auto) to order the
/// placement strategies. It defaults to [`RandomOrder`], which draws a fresh permutation on
/// every call.
///
/// All operations take `&mut self` and run to completion. To share a manager between threads,
/// wrap it in a [`Simulator`](crate::Simulator).
///
/// # Examples
///
/// ```
/// use fitsim::Config;
/// use fitsim::FixedOrder;
/// use fitsim::Manager;
/// use fitsim::Strategy;
///
/// let mut manager = Manager::with_order(Config::new(30)?, FixedOrder::default());
///
/// manager.allocate(10, Strategy::FirstFit)?;
/// manager.allocate(10, Strategy::FirstFit)?;
/// assert_eq!(manager.snapshot().to_pairs(), [(true, 10), (true, 10), (false, 10)]);
///
/// let release = manager.free(10)?;
/// assert_eq!(release.count.get(), 2);
/// assert_eq!(manager.snapshot().to_pairs(), [(false, 30)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Manager<P = RandomOrder> {
    chain: Chain,
    cursor: BlockId,
    order: P,
}

#[cfg(feature = "std")]
impl Manager<RandomOrder> {
    /// Constructs a manager whose automatic allocations use an entropy-seeded [`RandomOrder`].
    #[inline]
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_order(config, RandomOrder::from_entropy())
    }
}

impl<P> Manager<P> {
    /// Constructs a manager over a single free block of `config.capacity()` units, using `order`
    /// for automatic allocations.
    #[must_use]
    pub fn with_order(config: Config, order: P) -> Self {
        let chain = Chain::new(config.capacity());
        let cursor = chain.head();
        debug!("new arena of {} units", config.capacity());
        Self {
            chain,
            cursor,
            order,
        }
    }

    /// Total capacity of the arena.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> NonZero<usize> {
        self.chain.capacity()
    }

    /// Number of blocks currently in the chain.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always `false`: the chain holds at least one block, even when the arena is entirely free.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.chain.len() == 0
    }

    /// Position, in arena order, of the block where the next next-fit search starts.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.position_of(self.cursor)
    }

    fn position_of(&self, target: BlockId) -> usize {
        let position = self.chain.iter().position(|(id, _)| id == target);
        debug_assert!(position.is_some(), "block {target} is not part of the chain");
        position.unwrap_or_default()
    }

    /// Size of the largest free block, or `None` if every block is occupied.
    ///
    /// Any request up to this size succeeds, whatever the strategy.
    #[must_use]
    pub fn largest_free(&self) -> Option<NonZero<usize>> {
        self.chain
            .iter()
            .filter(|(_, block)| block.is_free())
            .map(|(_, block)| block.size)
            .max()
    }

    /// Returns the policy used by automatic allocations.
    #[inline]
    pub fn order(&self) -> &P {
        &self.order
    }

    /// Returns the policy used by automatic allocations.
    #[inline]
    pub fn order_mut(&mut self) -> &mut P {
        &mut self.order
    }

    /// Allocates a block of exactly `size` units, placed according to `strategy`.
    ///
    /// # Errors
    ///
    /// * [`AllocError::ZeroSize`] if `size` is zero.
    /// * [`AllocError::OutOfMemory`] if no free block can hold `size` units. The chain is not
    ///   modified.
    pub fn allocate(&mut self, size: usize, strategy: Strategy) -> Result<Allocation, AllocError> {
        let requested = NonZero::new(size).ok_or(AllocError::ZeroSize)?;
        self.place(requested, strategy)
            .ok_or(AllocError::OutOfMemory { requested: size })
    }

    fn place(&mut self, size: NonZero<usize>, strategy: Strategy) -> Option<Allocation> {
        let found = match strategy {
            Strategy::FirstFit => self.first_fit(size),
            Strategy::NextFit => self.next_fit(size),
            Strategy::BestFit => self.best_fit(size),
        };

        let Some(id) = found else {
            debug!("{strategy}: no free block can hold {size} units");
            return None;
        };

        self.chain.split(id, size);
        self.chain.get_mut(id).occupied = true;
        if strategy == Strategy::NextFit {
            self.cursor = id;
        }

        let position = self.position_of(id);
        debug!("{strategy}: allocated {size} units in block {id} at position {position}");
        Some(Allocation {
            strategy,
            size,
            position,
        })
    }

    fn first_fit(&self, size: NonZero<usize>) -> Option<BlockId> {
        self.chain
            .iter()
            .find(|(_, block)| block.fits(size))
            .map(|(id, _)| id)
    }

    fn next_fit(&self, size: NonZero<usize>) -> Option<BlockId> {
        // Every block is visited at most once: from the cursor to the end of the chain, then from
        // the head up to (excluding) the cursor.
        self.chain
            .iter_from(self.cursor)
            .chain(self.chain.iter())
            .take(self.chain.len())
            .inspect(|(id, block)| trace!("next fit: visiting block {id} ({})", block.size))
            .find(|(_, block)| block.fits(size))
            .map(|(id, _)| id)
    }

    fn best_fit(&self, size: NonZero<usize>) -> Option<BlockId> {
        // `min_by_key` keeps the first of several equal minimums.
        self.chain
            .iter()
            .filter(|(_, block)| block.fits(size))
            .min_by_key(|(_, block)| block.size)
            .map(|(id, _)| id)
    }

    /// Releases every occupied block whose size is exactly `size`, then coalesces adjacent free
    /// blocks.
    ///
    /// # Errors
    ///
    /// * [`FreeError::ZeroSize`] if `size` is zero.
    /// * [`FreeError::NotFound`] if no occupied block has exactly `size` units. The chain is not
    ///   modified.
    pub fn free(&mut self, size: usize) -> Result<Release, FreeError> {
        let size = NonZero::new(size).ok_or(FreeError::ZeroSize)?;

        let matching: Vec<BlockId> = self
            .chain
            .iter()
            .filter(|(_, block)| block.occupied && block.size == size)
            .map(|(id, _)| id)
            .collect();
        for &id in &matching {
            self.chain.get_mut(id).occupied = false;
        }

        self.coalesce();

        match NonZero::new(matching.len()) {
            Some(count) => {
                debug!("released {count} block(s) of {size} units");
                Ok(Release { count, size })
            }
            None => {
                debug!("no occupied block of {size} units to release");
                Err(FreeError::NotFound { size: size.get() })
            }
        }
    }

    /// Merges every run of adjacent free blocks into a single block.
    ///
    /// This is run automatically by [`free()`](Self::free). Running it again has no effect. If
    /// the next-fit cursor pointed to a block that gets merged away, the cursor moves to the block
    /// that absorbed it.
    ///
    /// Returns the number of blocks removed from the chain.
    pub fn coalesce(&mut self) -> usize {
        self.chain.coalesce(&mut self.cursor)
    }

    /// Returns a copy of the current chain, in arena order.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.chain)
    }

    /// Returns memory usage information for the arena.
    ///
    /// This requires visiting every block in the chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use fitsim::Config;
    /// use fitsim::FixedOrder;
    /// use fitsim::Manager;
    /// use fitsim::Strategy;
    /// use fitsim::Usage;
    ///
    /// let mut manager = Manager::with_order(Config::default(), FixedOrder::default());
    /// manager.allocate(20, Strategy::BestFit).expect("allocation failed");
    ///
    /// assert_eq!(
    ///     manager.usage(),
    ///     Usage {
    ///         total: 128,
    ///         used: 20,
    ///         free: 108,
    ///         occupied_blocks: 1,
    ///         free_blocks: 1,
    ///     }
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub fn usage(&self) -> Usage {
        Usage::get(&self.chain)
    }
}

impl<P: StrategyOrder> Manager<P> {
    /// Allocates a block of exactly `size` units, trying the placement strategies in the order
    /// returned by the manager's [`StrategyOrder`] policy.
    ///
    /// The first strategy that succeeds wins. Because every strategy succeeds as long as some free
    /// block is large enough, the order only affects which block is chosen.
    ///
    /// # Errors
    ///
    /// * [`AllocError::ZeroSize`] if `size` is zero.
    /// * [`AllocError::OutOfMemory`] if no free block can hold `size` units. The chain is not
    ///   modified.
    pub fn allocate_auto(&mut self, size: usize) -> Result<Allocation, AllocError> {
        let requested = NonZero::new(size).ok_or(AllocError::ZeroSize)?;
        let order = self.order.order();
        debug!("automatic allocation of {size} units, order: {order:?}");

        order
            .into_iter()
            .find_map(|strategy| self.place(requested, strategy))
            .ok_or(AllocError::OutOfMemory { requested: size })
    }
}
