// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Wrapper for lazy-initialization of a [`Simulator`].
//!
//! See [`LazySimulator`] for information and examples.

use crate::strategy::RandomOrder;
use crate::Simulator;
use core::ops::Deref;
use spin::Lazy;

/// Lazy-initialized version of [`Simulator`].
///
/// The simulator is not constructed when `LazySimulator` is constructed, but when
/// `LazySimulator` is first dereferenced.
///
/// The main purpose of `LazySimulator` is to be used in `static` items, where the arena has to be
/// shared by the whole program.
///
/// # Examples
///
/// ```
/// use fitsim::lazy::LazySimulator;
/// use fitsim::Config;
/// use fitsim::FixedOrder;
/// use fitsim::Simulator;
/// use fitsim::Strategy;
///
/// static ARENA: LazySimulator<FixedOrder> =
///     LazySimulator::new(|| Simulator::with_order(Config::default(), FixedOrder::default()));
///
/// // The simulator is initialized here, on first use
/// ARENA.allocate(16, Strategy::BestFit).expect("allocation failed");
/// assert_eq!(ARENA.usage().used, 16);
/// ```
#[derive(Debug)]
pub struct LazySimulator<P = RandomOrder, F = fn() -> Simulator<P>>(Lazy<Simulator<P>, F>);

impl<P, F> LazySimulator<P, F> {
    /// Constructs a new [`LazySimulator`] from the given initialization function.
    ///
    /// The initialization function will be called when the `LazySimulator` is first
    /// dereferenced.
    #[inline]
    #[must_use]
    pub const fn new(f: F) -> Self {
        Self(Lazy::new(f))
    }
}

impl<P, F: FnOnce() -> Simulator<P>> LazySimulator<P, F> {
    /// Returns a reference to the underlying `Simulator`, initializing it if necessary.
    ///
    /// Calling this method is equivalent to dereferencing (`lazy.get()` is equivalent to
    /// `&*lazy`).
    #[inline]
    pub fn get(&self) -> &Simulator<P> {
        self
    }
}

impl<P, F: FnOnce() -> Simulator<P>> Deref for LazySimulator<P, F> {
    type Target = Simulator<P>;

    #[inline]
    fn deref(&self) -> &Simulator<P> {
        &self.0
    }
}
