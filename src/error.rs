// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

/// Error returned by [`Manager::allocate`](crate::Manager::allocate) and
/// [`Manager::allocate_auto`](crate::Manager::allocate_auto).
///
/// In both cases the chain is left unmodified.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Error)]
pub enum AllocError {
    /// The requested size was zero.
    #[error("allocation size must be greater than zero")]
    ZeroSize,
    /// No free block is large enough to hold the requested size.
    #[error("out of memory: no free block can hold {requested} units")]
    OutOfMemory {
        /// The size that was requested.
        requested: usize,
    },
}

/// Error returned by [`Manager::free`](crate::Manager::free).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Error)]
pub enum FreeError {
    /// The requested size was zero.
    #[error("release size must be greater than zero")]
    ZeroSize,
    /// No occupied block has exactly the requested size.
    #[error("no occupied block of {size} units")]
    NotFound {
        /// The size that was requested.
        size: usize,
    },
}

/// Error returned when building a [`Config`](crate::Config).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Error)]
pub enum ConfigError {
    /// The arena capacity was zero.
    #[error("arena capacity must be greater than zero")]
    ZeroCapacity,
}
