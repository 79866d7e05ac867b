//! The allocation capability contract.
//!
//! Every allocator in the workspace implements [`Capability`], and the
//! free-list allocator is generic over the `Capability` it sources blocks
//! from. Callers depend on the trait, never on a concrete allocator.

use std::ptr;

use crate::allocation::Allocation;
use crate::error::AllocError;

/// Allocate / resize / deallocate, bound to one allocator's state.
///
/// All operations take `&mut self`: implementations are single-threaded and
/// assume exclusive access. Alignment is expressed as a power-of-two
/// exponent, so `alignment_exponent = 3` requests 8-byte alignment.
pub trait Capability {
    /// Request `size` bytes aligned to `2^alignment_exponent`.
    ///
    /// Whether the alignment is actually honoured is part of each
    /// implementation's documented contract.
    fn allocate(&mut self, size: usize, alignment_exponent: u8) -> Result<Allocation, AllocError>;

    /// Try to grow or shrink `allocation` in place to `new_size` bytes.
    ///
    /// Returns `false` when the resize did not happen. The allocators in
    /// this workspace never resize in place; use [`reallocate`] to fall back
    /// to allocate-copy-deallocate.
    fn resize(&mut self, allocation: Allocation, new_size: usize) -> bool;

    /// Return `allocation` to the allocator. Best effort; never fails.
    ///
    /// # Safety
    ///
    /// `allocation` must have been returned by `allocate` on this same
    /// allocator, with its original length, and must not have been
    /// deallocated already. No validity checking is performed.
    unsafe fn deallocate(&mut self, allocation: Allocation);
}

impl<C: Capability + ?Sized> Capability for &mut C {
    fn allocate(&mut self, size: usize, alignment_exponent: u8) -> Result<Allocation, AllocError> {
        (**self).allocate(size, alignment_exponent)
    }

    fn resize(&mut self, allocation: Allocation, new_size: usize) -> bool {
        (**self).resize(allocation, new_size)
    }

    unsafe fn deallocate(&mut self, allocation: Allocation) {
        // SAFETY: forwarded contract.
        unsafe { (**self).deallocate(allocation) }
    }
}

/// Resize `allocation` to `new_size`, moving it when in-place resize fails.
///
/// Tries [`Capability::resize`] first. On `false`, allocates a new region,
/// copies `min(old, new)` bytes across and deallocates the old region.
///
/// Only use this with allocators whose new grants never overlap a live
/// grant. A free-list allocator serving both requests from one block can
/// hand back a region that covers the old allocation's header word; the
/// copy then overwrites it and the final `deallocate` misidentifies the
/// owner.
///
/// On error the original allocation is untouched and still live.
///
/// # Safety
///
/// Same requirements as [`Capability::deallocate`] for `allocation`. In
/// addition, the region granted for `new_size` must not overlap
/// `allocation` or any header the allocator keeps in front of it.
pub unsafe fn reallocate<C: Capability + ?Sized>(
    capability: &mut C,
    allocation: Allocation,
    new_size: usize,
    alignment_exponent: u8,
) -> Result<Allocation, AllocError> {
    if capability.resize(allocation, new_size) {
        return Ok(Allocation::new(allocation.ptr(), new_size));
    }
    let moved = capability.allocate(new_size, alignment_exponent)?;
    let count = allocation.len().min(new_size);
    // SAFETY: both regions are live and at least `count` bytes long.
    unsafe {
        ptr::copy(allocation.as_ptr(), moved.as_ptr(), count);
        capability.deallocate(allocation);
    }
    Ok(moved)
}
