//! Index-based doubly linked list of block records.
//!
//! Records live in a `Vec<Block>` and link to each other by [`BlockId`].
//! Unlinking a block keeps its record (and its region) in place; only the
//! links change, so ids stay stable for the allocator's lifetime.

use heapwise_core::Allocation;

use crate::block::{Block, BlockId, BlockState};

/// Result of a first-fit scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scan {
    /// First tracked block whose free length covers the request.
    Fit(BlockId),
    /// No block fits. `last` is the final node visited (the tail), or
    /// `None` when the list is empty.
    Exhausted {
        /// Last node visited.
        last: Option<BlockId>,
    },
}

/// Owner of every block record and of the free-list links between them.
#[derive(Debug, Default)]
pub struct BlockList {
    blocks: Vec<Block>,
    head: Option<BlockId>,
    tail: Option<BlockId>,
    tracked: usize,
}

impl BlockList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next inserted block will receive.
    pub fn next_id(&self) -> BlockId {
        BlockId(self.blocks.len())
    }

    /// Number of block records ever inserted, tracked or not.
    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    /// Number of blocks currently linked into the list.
    pub fn tracked(&self) -> usize {
        self.tracked
    }

    /// Whether no block is linked.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// First linked block.
    pub fn head(&self) -> Option<BlockId> {
        self.head
    }

    /// Last linked block.
    pub fn tail(&self) -> Option<BlockId> {
        self.tail
    }

    /// Look up a record by id.
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0)
    }

    /// Every record ever inserted, in id order.
    pub fn records(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Linked blocks in list order, head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Scan from the head for the first block with at least `len` free
    /// bytes.
    pub fn first_fit(&self, len: usize) -> Scan {
        let mut last = None;
        for block in self.iter() {
            if block.free.len >= len {
                return Scan::Fit(block.id);
            }
            last = Some(block.id);
        }
        Scan::Exhausted { last }
    }

    /// Create a record for `region` and link it right after `anchor`, or at
    /// the head when `anchor` is `None`.
    ///
    /// The record receives [`next_id`](Self::next_id). `region` must be at
    /// least `BLOCK_HEADER_SIZE` bytes long. An `anchor` that is not
    /// currently linked is treated as `None`.
    pub(crate) fn insert_after(&mut self, anchor: Option<BlockId>, region: Allocation) -> BlockId {
        let id = self.next_id();
        let mut block = Block::new(id, region);

        let anchor = anchor.filter(|&a| self.is_linked(a));
        let next = match anchor {
            Some(a) => self.blocks[a.0].next,
            None => self.head,
        };
        block.prev = anchor;
        block.next = next;
        self.blocks.push(block);

        match anchor {
            Some(a) => self.blocks[a.0].next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(n) => self.blocks[n.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.tracked += 1;
        id
    }

    /// Unlink `id` from the list. Returns `false` if it was not linked.
    pub(crate) fn unlink(&mut self, id: BlockId) -> bool {
        if !self.is_linked(id) {
            return false;
        }
        let (prev, next) = {
            let block = &mut self.blocks[id.0];
            block.state = BlockState::Removed;
            (block.prev.take(), block.next.take())
        };
        match prev {
            Some(p) => self.blocks[p.0].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.blocks[n.0].prev = prev,
            None => self.tail = prev,
        }
        self.tracked -= 1;
        true
    }

    fn is_linked(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(Block::is_tracked)
    }
}

/// Iterator over linked blocks, head to tail.
pub struct Iter<'a> {
    list: &'a BlockList,
    cursor: Option<BlockId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.list.get(self.cursor?)?;
        self.cursor = block.next;
        Some(block)
    }
}
