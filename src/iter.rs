// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::block::Block;
use crate::block::BlockId;
use crate::chain::Chain;
use core::iter::FusedIterator;

/// Iterator over the blocks of a [`Chain`], following `next` links.
#[derive(Clone, Debug)]
pub(crate) struct Blocks<'a> {
    chain: &'a Chain,
    next: Option<BlockId>,
}

impl<'a> Blocks<'a> {
    pub(crate) const fn new(chain: &'a Chain, start: Option<BlockId>) -> Self {
        Self { chain, next: start }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let block = self.chain.get(id);
        self.next = block.next;
        Some((id, block))
    }
}

impl FusedIterator for Blocks<'_> {}
