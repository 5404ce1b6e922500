// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::strategy::Strategy;
use core::fmt;
use core::num::NonZero;

/// A successful allocation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Allocation {
    /// Strategy that placed the allocation.
    pub strategy: Strategy,
    /// Size of the occupied block.
    pub size: NonZero<usize>,
    /// Position of the occupied block in arena order, counting from zero.
    pub position: usize,
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocated {} KB at block {} ({})",
            self.size, self.position, self.strategy
        )
    }
}

/// A successful release of every occupied block of a given size.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Release {
    /// How many blocks were released.
    pub count: NonZero<usize>,
    /// Size of each released block.
    pub size: NonZero<usize>,
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "released {} block(s) of {} KB", self.count, self.size)
    }
}
