//! The region descriptor handed out by allocators.

use std::ptr::NonNull;

/// A granted memory region: start pointer plus length in bytes.
///
/// An `Allocation` is a loan, not an owner. It stays valid from the
/// `allocate` call that produced it until it is passed to `deallocate` or
/// the allocator that produced it is dropped. Copying the descriptor does
/// not copy or share ownership of the memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Allocation {
    ptr: NonNull<u8>,
    len: usize,
}

impl Allocation {
    /// Describe `len` bytes starting at `ptr`.
    pub fn new(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Start of the region.
    pub fn ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Start of the region as a raw pointer.
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region is zero bytes long.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start address of the region.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// One-past-the-end address of the region.
    pub fn end_addr(&self) -> usize {
        self.addr() + self.len
    }

    /// Whether `addr` lies in `[start, start + len)`.
    pub fn contains_addr(&self, addr: usize) -> bool {
        addr >= self.addr() && addr < self.end_addr()
    }

    /// View the region as a mutable byte slice.
    ///
    /// # Safety
    ///
    /// The allocation must still be live, and no other reference to any of
    /// its bytes may exist for the lifetime `'a`.
    pub unsafe fn as_mut_slice<'a>(&self) -> &'a mut [u8] {
        // SAFETY: caller guarantees the region is live and unaliased.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}
