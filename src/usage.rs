// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::chain::Chain;

/// Arena usage information.
///
/// This structure is returned by [`Manager::usage`](crate::Manager::usage). See that method
/// documentation for information and examples.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct Usage {
    /// Total capacity of the arena.
    ///
    /// This always equals `used + free`.
    pub total: usize,
    /// Sum of the sizes of all occupied blocks.
    pub used: usize,
    /// Sum of the sizes of all free blocks.
    ///
    /// Note that an allocation of size equal to (or close to) `free` may still fail if the free
    /// capacity is spread across several blocks.
    pub free: usize,
    /// Number of occupied blocks.
    pub occupied_blocks: usize,
    /// Number of free blocks.
    pub free_blocks: usize,
}

impl Usage {
    pub(crate) fn get(chain: &Chain) -> Self {
        let mut usage = Self {
            total: chain.capacity().get(),
            ..Self::default()
        };

        for (_, block) in chain.iter() {
            if block.occupied {
                usage.used += block.size.get();
                usage.occupied_blocks += 1;
            } else {
                usage.free += block.size.get();
                usage.free_blocks += 1;
            }
        }

        debug_assert_eq!(
            usage.used + usage.free,
            usage.total,
            "block sizes do not add up to the arena capacity"
        );

        usage
    }
}
