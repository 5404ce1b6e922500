// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Fitsim: a discrete-event simulator of classic memory placement strategies.
//!
//! Fitsim models a fixed-size arena as an ordered chain of variable-size blocks, each either free
//! or occupied. Nothing is backed by real memory: a block is just a size and a flag, and the
//! interesting part is how the chain evolves as allocations are placed and released.
//!
//! This is a no-`std` crate (it only needs `alloc`).
//!
//! # Features
//!
//! * Three placement strategies: [first-fit](Strategy::FirstFit),
//!   [next-fit](Strategy::NextFit) and [best-fit](Strategy::BestFit)
//! * Automatic allocation that tries the three strategies in a random order until one succeeds
//! * Bulk release of every occupied block of a given size, followed by coalescing of adjacent
//!   free blocks
//! * Read-only [snapshots](Snapshot) of the chain, printable as a table
//!
//! # Quick start
//!
//! ```
//! use fitsim::Config;
//! use fitsim::Manager;
//! use fitsim::Strategy;
//!
//! let mut manager = Manager::new(Config::default());
//!
//! let allocation = manager.allocate(20, Strategy::FirstFit).expect("allocation failed");
//! assert_eq!(allocation.size.get(), 20);
//! assert_eq!(manager.snapshot().to_pairs(), [(true, 20), (false, 108)]);
//!
//! manager.allocate(10, Strategy::FirstFit).expect("allocation failed");
//! assert_eq!(manager.snapshot().to_pairs(), [(true, 20), (true, 10), (false, 98)]);
//!
//! // The strategy that actually placed the block depends on a random permutation
//! let allocation = manager.allocate_auto(30).expect("allocation failed");
//! println!("{allocation}");
//!
//! println!("{}", manager.snapshot());
//! ```
//!
//! # The chain
//!
//! The arena always starts as a single free block spanning the whole capacity. After every
//! operation the following holds:
//!
//! 1. the sizes of all blocks add up to the arena capacity;
//! 2. every block has a non-zero size;
//! 3. no two adjacent blocks are both free.
//!
//! Blocks are created only by splitting a free block during allocation (the requested part
//! becomes occupied, the remainder stays free right after it) and destroyed only by coalescing
//! adjacent free blocks after a release.
//!
//! # Placement strategies
//!
//! * **First fit** scans from the start of the arena and takes the first free block large enough.
//! * **Next fit** starts scanning from the block chosen by the previous next-fit allocation,
//!   wrapping around to the start of the arena, and visits every block at most once. If that
//!   block is later merged into a preceding free block, the scan starts from the merged block.
//! * **Best fit** takes the smallest free block large enough, preferring the earliest one on ties.
//!
//! Whether an allocation succeeds does not depend on the strategy: it succeeds if and only if some
//! free block is large enough. The strategy only decides *which* block is used.
//!
//! # Automatic allocation
//!
//! [`Manager::allocate_auto`] asks a [`StrategyOrder`] policy for the order in which to try the
//! strategies. The default policy, [`RandomOrder`], returns a fresh random permutation on every
//! call. [`FixedOrder`] always returns the same order, which makes runs reproducible.
//!
//! # Sharing a simulator
//!
//! [`Manager`] is single-threaded. [`Simulator`] wraps a manager in a [spin
//! lock](https://en.wikipedia.org/wiki/Spinlock) that is held for the whole duration of every
//! operation, so it can be shared between threads and stored in `static` items.
//!
//! # Logging
//!
//! Placement decisions, splits, merges and releases are logged through the [`log`] facade at the
//! `debug` level, and per-block scan steps at the `trace` level. No logger is installed by this
//! crate.
//!
//! # Cargo feature flags
//!
//! * `std` (enabled by default): enables seeding [`RandomOrder`] from operating system entropy,
//!   along with [`Manager::new`] and [`Simulator::new`].
//! * `lazy`: enables the [`LazySimulator`](lazy::LazySimulator) type.

#![no_std]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stderr)]
#![warn(clippy::print_stdout)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_macro_rules)]
#![warn(unused_qualifications)]
#![doc(test(attr(deny(warnings))))]

extern crate alloc;

mod block;
mod chain;
mod config;
mod error;
mod iter;
mod manager;
mod outcome;
mod snapshot;
mod strategy;
mod usage;


#[cfg(feature = "lazy")]
pub mod lazy;

use spin::Mutex;

pub use crate::config::Config;
pub use crate::error::AllocError;
pub use crate::error::ConfigError;
pub use crate::error::FreeError;
pub use crate::manager::Manager;
pub use crate::outcome::Allocation;
pub use crate::outcome::Release;
pub use crate::snapshot::BlockState;
pub use crate::snapshot::Snapshot;
pub use crate::strategy::FixedOrder;
pub use crate::strategy::RandomOrder;
pub use crate::strategy::Strategy;
pub use crate::strategy::StrategyOrder;
pub use crate::usage::Usage;

/// A [`Manager`] guarded by a lock, usable through a shared reference.
///
/// Every method locks the whole chain for the duration of the operation. Use
/// [`with_manager`](Self::with_manager) to run several operations under a single lock.
///
/// # Examples
///
/// ```
/// use fitsim::Config;
/// use fitsim::FixedOrder;
/// use fitsim::Simulator;
/// use fitsim::Strategy;
///
/// let simulator = Simulator::with_order(Config::default(), FixedOrder::default());
///
/// std::thread::scope(|scope| {
///     for _ in 0..4 {
///         scope.spawn(|| simulator.allocate(8, Strategy::NextFit).expect("allocation failed"));
///     }
/// });
///
/// assert_eq!(simulator.usage().used, 32);
/// assert_eq!(simulator.free(8).map(|release| release.count.get()), Ok(4));
/// ```
#[derive(Debug)]
pub struct Simulator<P = RandomOrder> {
    inner: Mutex<Manager<P>>,
}

#[cfg(feature = "std")]
impl Simulator<RandomOrder> {
    /// Constructs a simulator whose automatic allocations use an entropy-seeded [`RandomOrder`].
    #[inline]
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::from(Manager::new(config))
    }
}

impl<P> Simulator<P> {
    /// Constructs a simulator over a single free block of `config.capacity()` units, using
    /// `order` for automatic allocations.
    #[inline]
    #[must_use]
    pub fn with_order(config: Config, order: P) -> Self {
        Self::from(Manager::with_order(config, order))
    }

    /// Runs `f` with exclusive access to the underlying manager.
    #[inline]
    pub fn with_manager<T>(&self, f: impl FnOnce(&mut Manager<P>) -> T) -> T {
        f(&mut *self.inner.lock())
    }

    /// Consumes the simulator, returning the underlying manager.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Manager<P> {
        self.inner.into_inner()
    }

    /// See [`Manager::allocate`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::allocate`].
    #[inline]
    pub fn allocate(&self, size: usize, strategy: Strategy) -> Result<Allocation, AllocError> {
        self.inner.lock().allocate(size, strategy)
    }

    /// See [`Manager::free`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::free`].
    #[inline]
    pub fn free(&self, size: usize) -> Result<Release, FreeError> {
        self.inner.lock().free(size)
    }

    /// See [`Manager::coalesce`].
    #[inline]
    pub fn coalesce(&self) -> usize {
        self.inner.lock().coalesce()
    }

    /// See [`Manager::snapshot`].
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// See [`Manager::usage`].
    #[inline]
    #[must_use]
    pub fn usage(&self) -> Usage {
        self.inner.lock().usage()
    }
}

impl<P: StrategyOrder> Simulator<P> {
    /// See [`Manager::allocate_auto`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::allocate_auto`].
    #[inline]
    pub fn allocate_auto(&self, size: usize) -> Result<Allocation, AllocError> {
        self.inner.lock().allocate_auto(size)
    }
}

impl<P> From<Manager<P>> for Simulator<P> {
    #[inline]
    fn from(manager: Manager<P>) -> Self {
        Self {
            inner: Mutex::new(manager),
        }
    }
}
