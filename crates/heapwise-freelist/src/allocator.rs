//! The free-list allocator.

use heapwise_core::{align_offset, alignment_from_exponent, round_up, AllocError, Allocation, Capability};
use tracing::{debug, trace, warn};

use crate::block::{self, Block, BlockId, BLOCK_HEADER_SIZE};
use crate::config::FreeListConfig;
use crate::error::ConfigError;
use crate::list::{BlockList, Iter, Scan};

/// Free-list allocator growing in page-sized blocks.
///
/// Blocks are requested from the backing capability `B` in multiples of the
/// configured page size, at page alignment. Every returned pointer is
/// aligned as requested and preceded by a one-word header recording the
/// padding that was applied.
///
/// Single-threaded: every operation takes `&mut self`.
///
/// # Reclamation
///
/// Serving a request neither shrinks nor retires the chosen block, so later
/// requests that land on the same block get the same start address back.
/// Deallocating any allocation removes its owning block from the free list
/// for good. Block regions are never returned to the backing allocator.
pub struct FreeListAllocator<B> {
    backing: B,
    config: FreeListConfig,
    blocks: BlockList,
}

impl<B: Capability> FreeListAllocator<B> {
    /// Allocator over `backing` with the default 4KiB page size.
    pub fn new(backing: B) -> Self {
        Self {
            backing,
            config: FreeListConfig::default(),
            blocks: BlockList::new(),
        }
    }

    /// Allocator over `backing` with a validated custom configuration.
    pub fn with_config(backing: B, config: FreeListConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            backing,
            config,
            blocks: BlockList::new(),
        })
    }

    /// Page size used for block requests.
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Number of blocks acquired from the backing allocator so far.
    pub fn block_count(&self) -> usize {
        self.blocks.total()
    }

    /// Number of blocks still linked into the free list.
    pub fn tracked_count(&self) -> usize {
        self.blocks.tracked()
    }

    /// Linked blocks in free-list order.
    pub fn blocks(&self) -> Iter<'_> {
        self.blocks.iter()
    }

    /// Any block record, linked or removed.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// The block whose region contains `allocation`'s start address.
    pub fn owning_block(&self, allocation: &Allocation) -> Option<&Block> {
        self.blocks
            .records()
            .find(|b| b.region().contains_addr(allocation.addr()))
    }

    /// The backing capability.
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Give the backing capability back.
    ///
    /// Block regions are not released first: the backing still owns their
    /// memory, and every outstanding allocation dangles once it frees them.
    pub fn into_backing(self) -> B {
        self.backing
    }

    /// Obtain a block with at least `min_len` bytes of free capacity and
    /// link it after `anchor` (or at the head).
    ///
    /// `requested` is the caller's original size, reported on failure.
    fn acquire_block(
        &mut self,
        min_len: usize,
        anchor: Option<BlockId>,
        requested: usize,
    ) -> Result<BlockId, AllocError> {
        let oom = AllocError::OutOfMemory { requested };
        let page_size = self.config.page_size;
        let size = BLOCK_HEADER_SIZE
            .checked_add(min_len)
            .and_then(|n| round_up(n, page_size))
            .ok_or_else(|| oom.clone())?;

        let region = self
            .backing
            .allocate(size, self.config.page_exponent())
            .map_err(|err| {
                debug!(size, %err, "backing allocator refused block");
                oom.clone()
            })?;

        if region.addr() % page_size != 0 || region.len() < size {
            warn!(
                addr = region.addr(),
                len = region.len(),
                page_size,
                "backing allocator returned a region that is not page aligned or too short"
            );
            // SAFETY: the region came from this backing and was never used.
            unsafe { self.backing.deallocate(region) };
            return Err(oom);
        }

        let id = self.blocks.next_id();
        // SAFETY: the region is live and at least one page, which is larger
        // than the block header.
        unsafe { block::write_region_header(region.ptr(), id) };
        let id = self.blocks.insert_after(anchor, region);
        debug!(block = %id, size, after = ?anchor, "acquired block");
        Ok(id)
    }

    fn free_span_len(&self, id: BlockId) -> usize {
        self.blocks.get(id).map_or(0, |b| b.free().len)
    }

    fn padding_for(&self, id: BlockId, alignment: usize) -> usize {
        self.blocks
            .get(id)
            .map_or(0, |b| align_offset(b.free().start, alignment))
    }
}

impl<B: Capability> Capability for FreeListAllocator<B> {
    fn allocate(&mut self, size: usize, alignment_exponent: u8) -> Result<Allocation, AllocError> {
        let oom = AllocError::OutOfMemory { requested: size };
        let alignment = alignment_from_exponent(alignment_exponent).ok_or_else(|| oom.clone())?;

        let mut id = match self.blocks.first_fit(size) {
            Scan::Fit(id) => id,
            Scan::Exhausted { last } => self.acquire_block(size, last, size)?,
        };

        let mut pad = self.padding_for(id, alignment);
        let mut regrown = false;
        loop {
            let needed = pad.checked_add(size).ok_or_else(|| oom.clone())?;
            if self.free_span_len(id) >= needed {
                break;
            }
            // A fresh page-aligned block has the same padding as any other
            // for alignments up to the page size, so the first regrowth
            // fits. Larger alignments may land at a worse offset; the
            // second regrowth budgets for the worst case.
            let min_len = if regrown {
                (alignment - 1).checked_add(size).ok_or_else(|| oom.clone())?
            } else {
                needed
            };
            debug!(block = %id, size, pad, "block too small after alignment, growing");
            id = self.acquire_block(min_len, Some(id), size)?;
            pad = self.padding_for(id, alignment);
            regrown = true;
        }

        let chosen = self.blocks.get(id).ok_or_else(|| oom.clone())?;
        let region = chosen.region();
        let offset = chosen.free().start - region.addr() + pad;
        // SAFETY: `offset + size` lies inside the region because the free
        // span starts after the header and covers `pad + size` bytes.
        let aligned = unsafe { region.ptr().add(offset) };
        // SAFETY: `aligned` is at least BLOCK_HEADER_SIZE into the region,
        // so the alignment word lands inside the region header or padding.
        unsafe { block::write_alloc_header(aligned, pad) };

        trace!(block = %id, size, alignment, pad, "allocate");
        Ok(Allocation::new(aligned, size))
    }

    fn resize(&mut self, _allocation: Allocation, _new_size: usize) -> bool {
        false
    }

    /// Restore the owning block's free span and retire the block.
    unsafe fn deallocate(&mut self, allocation: Allocation) {
        // SAFETY: caller guarantees `allocation` came from this allocator
        // and is still live, so both headers precede it.
        let (pad, id) = unsafe { block::read_headers(allocation.ptr()) };
        let Some(owner) = self.blocks.get_mut(id) else {
            return;
        };
        owner.free = owner.free.restore(pad, allocation.len());
        let unlinked = self.blocks.unlink(id);
        if unlinked {
            debug!(block = %id, pad, len = allocation.len(), "retired block");
        } else {
            trace!(block = %id, "deallocate on already retired block");
        }
    }
}
