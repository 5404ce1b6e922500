// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use core::fmt;
use core::num::NonZero;

/// Stable position of a block inside the chain storage.
///
/// A `BlockId` stays valid for as long as the block it names is part of the chain. Once a block
/// is absorbed by a coalesce, its id may be handed out again by a later split.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub(crate) struct BlockId(pub(crate) usize);

impl BlockId {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Block {
    pub(crate) size: NonZero<usize>,
    pub(crate) occupied: bool,
    pub(crate) next: Option<BlockId>,
}

impl Block {
    #[inline]
    #[must_use]
    pub(crate) const fn free(size: NonZero<usize>, next: Option<BlockId>) -> Self {
        Self {
            size,
            occupied: false,
            next,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn is_free(&self) -> bool {
        !self.occupied
    }

    /// Returns `true` if this block is free and large enough to hold `size` units.
    #[inline]
    #[must_use]
    pub(crate) const fn fits(&self, size: NonZero<usize>) -> bool {
        self.is_free() && self.size.get() >= size.get()
    }
}
