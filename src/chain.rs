// Copyright © 2024 Andrea Corbellini and contributors
// SPDX-License-Identifier: BSD-3-Clause

use crate::block::Block;
use crate::block::BlockId;
use crate::iter::Blocks;
use alloc::vec;
use alloc::vec::Vec;
use core::num::NonZero;
use log::debug;
use log::trace;

#[derive(Copy, Clone, Debug)]
struct Slot {
    block: Block,
    vacant: bool,
}

impl Slot {
    #[inline]
    const fn live(block: Block) -> Self {
        Self {
            block,
            vacant: false,
        }
    }
}

/// Ordered chain of blocks covering the whole arena.
///
/// Blocks live in a slot vector and link to each other through [`BlockId`]s. Slots freed by
/// [`coalesce()`](Self::coalesce) are kept in `vacant` and reused by later splits, so the slot
/// vector never grows past the largest chain length ever reached.
#[derive(Clone, Debug)]
pub(crate) struct Chain {
    slots: Vec<Slot>,
    vacant: Vec<BlockId>,
    head: BlockId,
    len: usize,
    capacity: NonZero<usize>,
}

impl Chain {
    /// Creates a chain made of a single free block spanning `capacity` units.
    #[must_use]
    pub(crate) fn new(capacity: NonZero<usize>) -> Self {
        Self {
            slots: vec![Slot::live(Block::free(capacity, None))],
            vacant: Vec::new(),
            head: BlockId(0),
            len: 1,
            capacity,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn head(&self) -> BlockId {
        self.head
    }

    #[inline]
    #[must_use]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub(crate) const fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, id: BlockId) -> &Block {
        let slot = &self.slots[id.index()];
        debug_assert!(!slot.vacant, "block {id} is not part of the chain");
        &slot.block
    }

    #[inline]
    #[must_use]
    pub(crate) fn get_mut(&mut self, id: BlockId) -> &mut Block {
        let slot = &mut self.slots[id.index()];
        debug_assert!(!slot.vacant, "block {id} is not part of the chain");
        &mut slot.block
    }

    /// Iterates over the blocks in arena order, starting from the head.
    #[inline]
    pub(crate) fn iter(&self) -> Blocks<'_> {
        Blocks::new(self, Some(self.head))
    }

    /// Iterates over the blocks in arena order, starting from `id` and stopping at the end of
    /// the chain (no wrap-around).
    #[inline]
    pub(crate) fn iter_from(&self, id: BlockId) -> Blocks<'_> {
        Blocks::new(self, Some(id))
    }

    fn insert(&mut self, block: Block) -> BlockId {
        self.len += 1;
        match self.vacant.pop() {
            Some(id) => {
                self.slots[id.index()] = Slot::live(block);
                id
            }
            None => {
                self.slots.push(Slot::live(block));
                BlockId(self.slots.len() - 1)
            }
        }
    }

    fn remove(&mut self, id: BlockId) {
        debug_assert_ne!(id, self.head, "the head block cannot be removed");
        self.len -= 1;
        self.slots[id.index()].vacant = true;
        self.vacant.push(id);
    }

    /// Shrinks block `id` to exactly `size` units, placing the remainder (if any) in a new free
    /// block right after it.
    ///
    /// Returns the id of the new remainder block, or `None` if the block already had the
    /// requested size. The occupancy of `id` is left untouched.
    pub(crate) fn split(&mut self, id: BlockId, size: NonZero<usize>) -> Option<BlockId> {
        let block = *self.get(id);
        debug_assert!(
            size <= block.size,
            "cannot split block {id} of size {} into {size} units",
            block.size
        );

        let remainder = block
            .size
            .get()
            .checked_sub(size.get())
            .and_then(NonZero::new)?;
        let new_id = self.insert(Block::free(remainder, block.next));

        let block = self.get_mut(id);
        block.size = size;
        block.next = Some(new_id);

        debug!("split block {id}: {size} + {remainder} (remainder is {new_id})");
        Some(new_id)
    }

    /// Merges every run of adjacent free blocks into the first block of the run.
    ///
    /// `cursor` is moved onto the absorbing block whenever the block it names is merged away.
    /// Returns the number of blocks dropped from the chain.
    pub(crate) fn coalesce(&mut self, cursor: &mut BlockId) -> usize {
        let mut merged = 0;
        let mut current = self.head;

        while let Some(next) = self.get(current).next {
            let successor = *self.get(next);
            if !(self.get(current).is_free() && successor.is_free()) {
                current = next;
                continue;
            }

            let block = self.get_mut(current);
            block.size = block.size.saturating_add(successor.size.get());
            block.next = successor.next;
            trace!("absorbed block {next} ({}) into {current}", successor.size);

            self.remove(next);
            if *cursor == next {
                *cursor = current;
            }
            merged += 1;
        }

        if merged > 0 {
            debug!("coalesced {merged} block(s), chain length is now {}", self.len);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn sizes(chain: &Chain) -> Vec<(bool, usize)> {
        chain
            .iter()
            .map(|(_, block)| (block.occupied, block.size.get()))
            .collect()
    }

    #[test]
    fn split_exact_size_creates_nothing() {
        let mut chain = Chain::new(nz(30));
        assert_eq!(chain.split(chain.head(), nz(30)), None);
        assert_eq!(chain.len(), 1);
        assert_eq!(sizes(&chain), [(false, 30)]);
    }

    #[test]
    fn split_inserts_remainder_after_block() {
        let mut chain = Chain::new(nz(30));
        let head = chain.head();
        let tail = chain.split(head, nz(10)).unwrap();
        chain.get_mut(head).occupied = true;

        let middle = chain.split(tail, nz(5)).unwrap();
        assert_eq!(chain.get(tail).next, Some(middle));
        assert_eq!(sizes(&chain), [(true, 10), (false, 5), (false, 15)]);
    }

    #[test]
    fn coalesce_reuses_vacant_slots() {
        let mut chain = Chain::new(nz(30));
        let head = chain.head();
        let rest = chain.split(head, nz(10)).unwrap();
        chain.split(rest, nz(10)).unwrap();
        assert_eq!(chain.len(), 3);

        let mut cursor = head;
        assert_eq!(chain.coalesce(&mut cursor), 2);
        assert_eq!(sizes(&chain), [(false, 30)]);

        chain.split(head, nz(7)).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.slots.len(), 3);
    }

    #[test]
    fn coalesce_marks_absorbed_slots_vacant() {
        let mut chain = Chain::new(nz(30));
        let head = chain.head();
        let second = chain.split(head, nz(10)).unwrap();
        let third = chain.split(second, nz(10)).unwrap();

        let mut cursor = head;
        chain.coalesce(&mut cursor);
        assert!(!chain.slots[head.index()].vacant);
        assert!(chain.slots[second.index()].vacant);
        assert!(chain.slots[third.index()].vacant);

        let reused = chain.split(head, nz(4)).unwrap();
        assert!(!chain.slots[reused.index()].vacant);
        assert_eq!(sizes(&chain), [(false, 4), (false, 26)]);
    }

    #[test]
    fn coalesce_moves_cursor_to_absorbing_block() {
        let mut chain = Chain::new(nz(30));
        let head = chain.head();
        let second = chain.split(head, nz(10)).unwrap();
        let third = chain.split(second, nz(10)).unwrap();
        chain.get_mut(head).occupied = true;

        let mut cursor = third;
        assert_eq!(chain.coalesce(&mut cursor), 1);
        assert_eq!(cursor, second);
        assert_eq!(sizes(&chain), [(true, 10), (false, 20)]);
    }

    #[test]
    fn coalesce_is_idempotent() {
        let mut chain = Chain::new(nz(40));
        let head = chain.head();
        let b = chain.split(head, nz(10)).unwrap();
        let c = chain.split(b, nz(10)).unwrap();
        chain.split(c, nz(10)).unwrap();
        chain.get_mut(b).occupied = true;

        let mut cursor = head;
        chain.coalesce(&mut cursor);
        let once = sizes(&chain);
        assert_eq!(chain.coalesce(&mut cursor), 0);
        assert_eq!(sizes(&chain), once);
        assert_eq!(once, [(false, 10), (true, 10), (false, 20)]);
    }
}
