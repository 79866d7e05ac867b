//! The bump allocator.

use std::marker::PhantomData;
use std::ptr::NonNull;

use heapwise_core::{AllocError, Allocation, Capability};
use tracing::trace;

/// Bump allocator over a borrowed byte buffer.
///
/// The buffer is owned by the caller and borrowed mutably for `'buf`, so it
/// outlives every allocation handed out. The allocator itself has no
/// destruction step: dropping it simply ends the borrow.
///
/// Invariant: `0 <= offset <= capacity`.
///
/// # Alignment
///
/// The alignment exponent passed to [`Capability::allocate`] is accepted
/// but not applied. Allocations are packed back to back from the buffer
/// start, so a caller that needs aligned results must supply an aligned
/// buffer and request sizes that keep the offset aligned.
pub struct BumpAllocator<'buf> {
    /// Start of the borrowed buffer.
    base: NonNull<u8>,
    /// Buffer length in bytes.
    capacity: usize,
    /// Bytes handed out so far, measured from `base`.
    offset: usize,
    _buffer: PhantomData<&'buf mut [u8]>,
}

impl<'buf> BumpAllocator<'buf> {
    /// Take exclusive use of `buffer`, starting at offset zero.
    pub fn new(buffer: &'buf mut [u8]) -> Self {
        let capacity = buffer.len();
        Self {
            base: NonNull::from(buffer).cast::<u8>(),
            capacity,
            offset: 0,
            _buffer: PhantomData,
        }
    }

    /// Current offset cursor in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total buffer length in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes between the cursor and the end of the buffer.
    ///
    /// Because exhaustion is checked with `offset + n >= capacity`, the
    /// largest request that can still succeed is `remaining() - 1`.
    pub fn remaining(&self) -> usize {
        self.capacity - self.offset
    }

    /// Move the cursor back to the start of the buffer.
    ///
    /// Every outstanding allocation becomes invalid.
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    fn base_addr(&self) -> usize {
        self.base.as_ptr() as usize
    }

    fn is_top(&self, allocation: &Allocation) -> bool {
        allocation.len() <= self.offset
            && self.base_addr() + self.offset - allocation.len() == allocation.addr()
    }
}

impl Capability for BumpAllocator<'_> {
    /// Grant `size` bytes at the current offset.
    ///
    /// Fails with [`AllocError::OutOfMemory`] when `offset + size >=
    /// capacity`, which also rejects the request that would exactly fill
    /// the buffer.
    fn allocate(&mut self, size: usize, alignment_exponent: u8) -> Result<Allocation, AllocError> {
        let end = self
            .offset
            .checked_add(size)
            .filter(|&end| end < self.capacity)
            .ok_or(AllocError::OutOfMemory { requested: size })?;
        // SAFETY: offset <= end < capacity, so the pointer stays inside the
        // borrowed buffer.
        let ptr = unsafe { self.base.add(self.offset) };
        trace!(size, alignment_exponent, offset = self.offset, "bump allocate");
        self.offset = end;
        Ok(Allocation::new(ptr, size))
    }

    fn resize(&mut self, _allocation: Allocation, _new_size: usize) -> bool {
        false
    }

    /// Give back `allocation` if it is the most recent one on the stack.
    ///
    /// Anything else is ignored. This implementation only compares
    /// addresses and never touches the memory, so it is sound for any
    /// descriptor even though the trait method is `unsafe`.
    unsafe fn deallocate(&mut self, allocation: Allocation) {
        if self.is_top(&allocation) {
            self.offset -= allocation.len();
            trace!(len = allocation.len(), offset = self.offset, "bump release");
        } else {
            trace!(addr = allocation.addr(), "bump release ignored: not on top");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_allocations_are_contiguous() {
        let mut buf = vec![0u8; 64];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(10, 0).unwrap();
        let b = bump.allocate(6, 0).unwrap();
        assert_eq!(b.addr(), a.end_addr());
        assert_eq!(bump.offset(), 16);
        assert_eq!(bump.remaining(), 48);
    }

    #[test]
    fn first_allocation_starts_at_buffer() {
        let mut buf = vec![0u8; 64];
        let start = buf.as_ptr() as usize;
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(8, 3).unwrap();
        assert_eq!(a.addr(), start);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn alignment_request_is_not_applied() {
        let mut buf = vec![0u8; 256];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(3, 0).unwrap();
        let b = bump.allocate(4, 6).unwrap();
        assert_eq!(b.addr(), a.addr() + 3);
        assert_eq!(bump.offset(), 7);
    }

    #[test]
    fn exactly_remaining_is_rejected() {
        let mut buf = vec![0u8; 32];
        let mut bump = BumpAllocator::new(&mut buf);
        bump.allocate(16, 0).unwrap();
        let err = bump.allocate(16, 0).unwrap_err();
        assert_eq!(err, AllocError::OutOfMemory { requested: 16 });
        assert_eq!(bump.offset(), 16);
        assert!(bump.allocate(15, 0).is_ok());
        assert_eq!(bump.offset(), 31);
    }

    #[test]
    fn whole_buffer_request_is_rejected() {
        let mut buf = vec![0u8; 8];
        let mut bump = BumpAllocator::new(&mut buf);
        assert!(bump.allocate(8, 0).is_err());
        assert!(bump.allocate(7, 0).is_ok());
    }

    #[test]
    fn empty_buffer_rejects_everything() {
        let mut buf: [u8; 0] = [];
        let mut bump = BumpAllocator::new(&mut buf);
        assert!(bump.allocate(0, 0).is_err());
    }

    #[test]
    fn zero_size_allocation_and_release() {
        let mut buf = vec![0u8; 32];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(5, 0).unwrap();
        let empty = bump.allocate(0, 0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.addr(), a.end_addr());
        assert_eq!(bump.offset(), 5);

        unsafe { bump.deallocate(empty) };
        assert_eq!(bump.offset(), 5);
        unsafe { bump.deallocate(a) };
        assert_eq!(bump.offset(), 0);
    }

    #[test]
    fn size_overflow_is_out_of_memory() {
        let mut buf = vec![0u8; 8];
        let mut bump = BumpAllocator::new(&mut buf);
        bump.allocate(1, 0).unwrap();
        assert_eq!(
            bump.allocate(usize::MAX, 0),
            Err(AllocError::OutOfMemory { requested: usize::MAX })
        );
    }

    #[test]
    fn top_deallocation_rewinds() {
        let mut buf = vec![0u8; 64];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(10, 0).unwrap();
        unsafe { bump.deallocate(a) };
        assert_eq!(bump.offset(), 0);
        let again = bump.allocate(10, 0).unwrap();
        assert_eq!(again.addr(), a.addr());
    }

    #[test]
    fn buried_deallocation_is_ignored() {
        let mut buf = vec![0u8; 64];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(10, 0).unwrap();
        let _b = bump.allocate(5, 0).unwrap();
        unsafe { bump.deallocate(a) };
        assert_eq!(bump.offset(), 15);
    }

    #[test]
    fn foreign_allocation_is_ignored() {
        let mut buf = vec![0u8; 64];
        let mut other = vec![0u8; 64];
        let foreign = Allocation::new(NonNull::new(other.as_mut_ptr()).unwrap(), 4);
        let mut bump = BumpAllocator::new(&mut buf);
        bump.allocate(4, 0).unwrap();
        unsafe { bump.deallocate(foreign) };
        assert_eq!(bump.offset(), 4);
    }

    #[test]
    fn oversized_descriptor_does_not_underflow() {
        let mut buf = vec![0u8; 64];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(4, 0).unwrap();
        let inflated = Allocation::new(a.ptr(), 40);
        unsafe { bump.deallocate(inflated) };
        assert_eq!(bump.offset(), 4);
    }

    #[test]
    fn resize_is_unsupported() {
        let mut buf = vec![0u8; 64];
        let mut bump = BumpAllocator::new(&mut buf);
        let a = bump.allocate(4, 0).unwrap();
        assert!(!bump.resize(a, 2));
        assert!(!bump.resize(a, 8));
        assert_eq!(bump.offset(), 4);
    }

    #[test]
    fn reset_rewinds_everything() {
        let mut buf = vec![0u8; 64];
        let mut bump = BumpAllocator::new(&mut buf);
        bump.allocate(20, 0).unwrap();
        bump.allocate(20, 0).unwrap();
        bump.reset();
        assert_eq!(bump.offset(), 0);
        assert_eq!(bump.remaining(), 64);
    }

    #[test]
    fn granted_memory_is_writable() {
        let mut buf = vec![0u8; 16];
        {
            let mut bump = BumpAllocator::new(&mut buf);
            bump.allocate(2, 0).unwrap();
            let a = bump.allocate(3, 0).unwrap();
            unsafe { a.as_mut_slice() }.copy_from_slice(&[7, 7, 7]);
        }
        assert_eq!(&buf[..6], &[0, 0, 7, 7, 7, 0]);
    }
}
