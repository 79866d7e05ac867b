//! Block records and the in-region header layout.
//!
//! Every block region obtained from the backing allocator starts with a
//! [`BLOCK_HEADER_SIZE`]-byte header:
//!
//! ```text
//! offset 0                 owning BlockId (one word)
//! offset WORD              alignment word of an allocation placed at pad 0
//! offset BLOCK_HEADER_SIZE first byte of free capacity
//! ```
//!
//! An allocation at padding `pad` starts at
//! `region + BLOCK_HEADER_SIZE + pad`, and its alignment word sits in the
//! [`ALLOC_HEADER_SIZE`] bytes right before it. Reversing that sum is the
//! only way `deallocate` finds the owning block, so these two constants are
//! the single source of truth for the layout.

use std::fmt;
use std::mem::size_of;
use std::ptr::NonNull;

use heapwise_core::Allocation;

/// Size of the allocation header: one machine word holding the alignment
/// padding applied to the allocation that follows it.
pub const ALLOC_HEADER_SIZE: usize = size_of::<usize>();

/// Size of the header reserved at the start of every block region.
pub const BLOCK_HEADER_SIZE: usize = size_of::<RegionHeader>();

/// In-region block header. The link itself lives in [`Block`]; the region
/// only needs to name its owner.
#[repr(C)]
struct RegionHeader {
    block: usize,
    alignment_word: usize,
}

const _: () = assert!(BLOCK_HEADER_SIZE == 2 * size_of::<usize>());
const _: () = assert!(BLOCK_HEADER_SIZE >= size_of::<usize>() + ALLOC_HEADER_SIZE);

/// Index of a block record inside a [`BlockList`](crate::BlockList).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address range `[start, start + len)` advertised as free.
///
/// Plain addresses: a span is a descriptor, never dereferenced directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// First free address.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
}

impl Span {
    /// One-past-the-end address.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether `addr` lies in `[start, end)`.
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end()
    }

    /// Extend the span back over `pad` bytes of padding and forward over
    /// `pad + len` bytes, the bookkeeping applied when an allocation of
    /// `len` bytes at padding `pad` is returned.
    pub(crate) fn restore(self, pad: usize, len: usize) -> Self {
        Self {
            start: self.start.saturating_sub(pad),
            len: self.len.saturating_add(pad).saturating_add(len),
        }
    }
}

/// Membership of a block in the free list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    /// Linked into the list and eligible to serve requests.
    Tracked,
    /// Unlinked by a deallocation. Its region stays owned by the allocator
    /// but is never scanned again.
    Removed,
}

/// One page-aligned region obtained from the backing allocator.
#[derive(Clone, Debug)]
pub struct Block {
    pub(crate) id: BlockId,
    pub(crate) region: Allocation,
    pub(crate) free: Span,
    pub(crate) prev: Option<BlockId>,
    pub(crate) next: Option<BlockId>,
    pub(crate) state: BlockState,
}

impl Block {
    /// Record for `region`, whose header has already been written.
    ///
    /// Free capacity starts right after the header.
    pub(crate) fn new(id: BlockId, region: Allocation) -> Self {
        Self {
            id,
            region,
            free: Span {
                start: region.addr() + BLOCK_HEADER_SIZE,
                len: region.len() - BLOCK_HEADER_SIZE,
            },
            prev: None,
            next: None,
            state: BlockState::Tracked,
        }
    }

    /// This block's index.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The whole region as obtained from the backing allocator.
    pub fn region(&self) -> Allocation {
        self.region
    }

    /// Currently advertised free capacity.
    pub fn free(&self) -> Span {
        self.free
    }

    /// Previous block in the list, if linked and not the head.
    pub fn prev(&self) -> Option<BlockId> {
        self.prev
    }

    /// Next block in the list, if linked and not the tail.
    pub fn next(&self) -> Option<BlockId> {
        self.next
    }

    /// Free-list membership.
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Shorthand for `state() == BlockState::Tracked`.
    pub fn is_tracked(&self) -> bool {
        self.state == BlockState::Tracked
    }
}

/// Stamp the region header with its owning block.
///
/// # Safety
///
/// `region` must point to at least [`BLOCK_HEADER_SIZE`] writable bytes.
pub(crate) unsafe fn write_region_header(region: NonNull<u8>, id: BlockId) {
    let header = RegionHeader {
        block: id.0,
        alignment_word: 0,
    };
    // SAFETY: caller guarantees the header bytes are writable.
    unsafe { region.cast::<RegionHeader>().write_unaligned(header) }
}

/// Write the alignment word for an allocation starting at `aligned`.
///
/// # Safety
///
/// `aligned` must lie at least [`BLOCK_HEADER_SIZE`] bytes into a live
/// block region.
pub(crate) unsafe fn write_alloc_header(aligned: NonNull<u8>, pad: usize) {
    // SAFETY: the word sits inside the same region, at or after the
    // header's alignment word.
    unsafe {
        aligned
            .sub(ALLOC_HEADER_SIZE)
            .cast::<usize>()
            .write_unaligned(pad)
    }
}

/// Recover `(pad, owning block)` from an allocation start.
///
/// # Safety
///
/// `aligned` must have been produced by a free-list allocation whose
/// headers are still intact.
pub(crate) unsafe fn read_headers(aligned: NonNull<u8>) -> (usize, BlockId) {
    // SAFETY: caller guarantees both headers precede `aligned` in one
    // live region.
    unsafe {
        let pad = aligned
            .sub(ALLOC_HEADER_SIZE)
            .cast::<usize>()
            .read_unaligned();
        let header = aligned
            .sub(pad + BLOCK_HEADER_SIZE)
            .cast::<RegionHeader>()
            .read_unaligned();
        (pad, BlockId(header.block))
    }
}
