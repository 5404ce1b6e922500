// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::chain::Chain;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZero;
use core::slice;

/// State and size of one block, as seen by a [`Snapshot`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BlockState {
    /// Whether the block is allocated.
    pub occupied: bool,
    /// Size of the block.
    pub size: NonZero<usize>,
}

impl BlockState {
    /// Label used for the block state when rendering a table.
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.occupied {
            "Occupied"
        } else {
            "Free"
        }
    }
}

/// Read-only copy of the chain, in arena order.
///
/// The [`Display`](fmt::Display) implementation renders the snapshot as a two-column grid
/// table:
///
/// ```
/// use fitsim::FixedOrder;
/// use fitsim::Manager;
/// use fitsim::Config;
/// use fitsim::Strategy;
///
/// let mut manager = Manager::with_order(Config::default(), FixedOrder::default());
/// manager.allocate(20, Strategy::FirstFit).expect("allocation failed");
///
/// let expected = "\
/// +----------+--------+
/// | State    | Size   |
/// +==========+========+
/// | Occupied | 20 KB  |
/// +----------+--------+
/// | Free     | 108 KB |
/// +----------+--------+";
/// assert_eq!(manager.snapshot().to_string(), expected);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Snapshot {
    blocks: Vec<BlockState>,
}

impl Snapshot {
    pub(crate) fn of(chain: &Chain) -> Self {
        let blocks = chain
            .iter()
            .map(|(_, block)| BlockState {
                occupied: block.occupied,
                size: block.size,
            })
            .collect();
        Self { blocks }
    }

    /// Returns the blocks as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[BlockState] {
        &self.blocks
    }

    /// Number of blocks in the chain.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`: a chain has at least one block.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over the blocks in arena order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, BlockState> {
        self.blocks.iter()
    }

    /// Returns the blocks as `(occupied, size)` pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(bool, usize)> {
        self.iter()
            .map(|block| (block.occupied, block.size.get()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a BlockState;
    type IntoIter = slice::Iter<'a, BlockState>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Snapshot {
    type Item = BlockState;
    type IntoIter = alloc::vec::IntoIter<BlockState>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

const STATE_HEADER: &str = "State";
const SIZE_HEADER: &str = "Size";

fn rule(f: &mut fmt::Formatter<'_>, widths: [usize; 2], fill: char) -> fmt::Result {
    f.write_str("+")?;
    for width in widths {
        for _ in 0..width + 2 {
            fmt::Write::write_char(f, fill)?;
        }
        f.write_str("+")?;
    }
    Ok(())
}

fn row(f: &mut fmt::Formatter<'_>, widths: [usize; 2], cells: [&str; 2]) -> fmt::Result {
    write!(
        f,
        "| {:<w0$} | {:<w1$} |",
        cells[0],
        cells[1],
        w0 = widths[0],
        w1 = widths[1]
    )
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes: Vec<String> = self
            .iter()
            .map(|block| format!("{} KB", block.size))
            .collect();

        let widths = self.iter().zip(&sizes).fold(
            [STATE_HEADER.len(), SIZE_HEADER.len()],
            |[state, size], (block, label)| {
                [state.max(block.label().len()), size.max(label.len())]
            },
        );

        rule(f, widths, '-')?;
        f.write_str("\n")?;
        row(f, widths, [STATE_HEADER, SIZE_HEADER])?;
        f.write_str("\n")?;
        rule(f, widths, '=')?;
        for (block, size) in self.iter().zip(&sizes) {
            f.write_str("\n")?;
            row(f, widths, [block.label(), size.as_str()])?;
            f.write_str("\n")?;
            rule(f, widths, '-')?;
        }
        Ok(())
    }
}
