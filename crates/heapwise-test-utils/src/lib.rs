//! Backing allocators and fixtures for heapwise development.
//!
//! Provides [`PageSource`], a system-backed [`Capability`] that hands out
//! zeroed, aligned regions and logs every grant, and [`FailingSource`],
//! which refuses every request. Both are meant to sit behind a
//! `FreeListAllocator` in tests, benches and demos.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use heapwise_core::{alignment_from_exponent, AllocError, Allocation, Capability};

/// System-backed capability with an acquisition log and optional limit.
///
/// Every grant is zeroed and aligned as requested. Live grants are released
/// when the source is dropped, so allocators that never give memory back
/// do not leak in tests.
pub struct PageSource {
    live: Vec<(Allocation, Layout)>,
    log: Vec<Allocation>,
    limit: Option<usize>,
}

impl PageSource {
    /// Page size assumed by [`with_page_limit`](Self::with_page_limit).
    pub const PAGE_SIZE: usize = 4096;

    pub fn new() -> Self {
        Self {
            live: Vec::new(),
            log: Vec::new(),
            limit: None,
        }
    }

    /// Refuse any grant that would push live bytes past `pages` pages.
    pub fn with_page_limit(pages: usize) -> Self {
        let mut source = Self::new();
        source.limit = Some(pages * Self::PAGE_SIZE);
        source
    }

    /// Every successful grant, in order, including released ones.
    pub fn acquisitions(&self) -> &[Allocation] {
        &self.log
    }

    /// Bytes currently granted and not released.
    pub fn live_bytes(&self) -> usize {
        self.live.iter().map(|(a, _)| a.len()).sum()
    }

    /// Number of grants currently outstanding.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for PageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Capability for PageSource {
    fn allocate(&mut self, size: usize, alignment_exponent: u8) -> Result<Allocation, AllocError> {
        let oom = AllocError::OutOfMemory { requested: size };
        if let Some(limit) = self.limit {
            if self.live_bytes().saturating_add(size) > limit {
                return Err(oom);
            }
        }
        let align = alignment_from_exponent(alignment_exponent).ok_or_else(|| oom.clone())?;
        let layout = Layout::from_size_align(size.max(1), align).map_err(|_| oom.clone())?;
        // SAFETY: layout has non-zero size.
        let ptr = NonNull::new(unsafe { alloc::alloc_zeroed(layout) }).ok_or(oom)?;
        let allocation = Allocation::new(ptr, size);
        self.live.push((allocation, layout));
        self.log.push(allocation);
        Ok(allocation)
    }

    fn resize(&mut self, _allocation: Allocation, _new_size: usize) -> bool {
        false
    }

    unsafe fn deallocate(&mut self, allocation: Allocation) {
        if let Some(pos) = self.live.iter().position(|(a, _)| a.ptr() == allocation.ptr()) {
            let (granted, layout) = self.live.swap_remove(pos);
            // SAFETY: `granted` came from `alloc_zeroed` with `layout`.
            unsafe { alloc::dealloc(granted.as_ptr(), layout) };
        }
    }
}

impl Drop for PageSource {
    fn drop(&mut self) {
        for (granted, layout) in self.live.drain(..) {
            // SAFETY: every live entry came from `alloc_zeroed` with its layout.
            unsafe { alloc::dealloc(granted.as_ptr(), layout) };
        }
    }
}

/// Capability that refuses every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingSource;

impl Capability for FailingSource {
    fn allocate(&mut self, size: usize, _alignment_exponent: u8) -> Result<Allocation, AllocError> {
        Err(AllocError::OutOfMemory { requested: size })
    }

    fn resize(&mut self, _allocation: Allocation, _new_size: usize) -> bool {
        false
    }

    unsafe fn deallocate(&mut self, _allocation: Allocation) {}
}
