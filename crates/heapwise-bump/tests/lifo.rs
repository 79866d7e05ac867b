//! Stack-discipline reclamation properties of the bump allocator.

use heapwise_bump::BumpAllocator;
use heapwise_core::{Allocation, Capability};
use proptest::prelude::*;

const MIB: usize = 1_048_576;

/// 10 x 4-byte elements at 64-byte alignment, then 5 x 4-byte elements at
/// byte alignment, released in reverse order.
#[test]
fn two_typed_allocations_roundtrip_to_zero() {
    let mut buf = vec![0u8; MIB];
    let mut bump = BumpAllocator::new(&mut buf);

    let first = bump.allocate(10 * std::mem::size_of::<u32>(), 6).unwrap();
    let second = bump.allocate(5 * std::mem::size_of::<u32>(), 0).unwrap();
    assert_eq!(first.len(), 40);
    assert_eq!(second.len(), 20);
    assert_eq!(bump.offset(), 60);

    unsafe {
        bump.deallocate(second);
        assert_eq!(bump.offset(), 40);
        bump.deallocate(first);
    }
    assert_eq!(bump.offset(), 0);
}

#[test]
fn wrong_order_release_leaves_cursor() {
    let mut buf = vec![0u8; MIB];
    let mut bump = BumpAllocator::new(&mut buf);

    let first = bump.allocate(40, 6).unwrap();
    let second = bump.allocate(20, 0).unwrap();
    unsafe { bump.deallocate(first) };
    assert_eq!(bump.offset(), 60);

    // Once the top is released the buried allocation is on top again.
    unsafe {
        bump.deallocate(second);
        bump.deallocate(first);
    }
    assert_eq!(bump.offset(), 0);
}

#[test]
fn works_through_dyn_capability() {
    let mut buf = vec![0u8; 128];
    let mut bump = BumpAllocator::new(&mut buf);
    let cap: &mut dyn Capability = &mut bump;
    let a = cap.allocate(32, 0).unwrap();
    assert!(!cap.resize(a, 64));
    unsafe { cap.deallocate(a) };
    assert_eq!(bump.offset(), 0);
}

proptest! {
    #[test]
    fn reverse_release_restores_offset(
        prefix in 0usize..64,
        sizes in proptest::collection::vec(0usize..256, 1..32),
    ) {
        let mut buf = vec![0u8; 16 * 1024];
        let mut bump = BumpAllocator::new(&mut buf);
        if prefix > 0 {
            bump.allocate(prefix, 0).unwrap();
        }
        let before = bump.offset();

        let granted: Vec<Allocation> = sizes
            .iter()
            .map(|&n| bump.allocate(n, 0).unwrap())
            .collect();
        prop_assert_eq!(bump.offset(), before + sizes.iter().sum::<usize>());

        for allocation in granted.into_iter().rev() {
            unsafe { bump.deallocate(allocation) };
        }
        prop_assert_eq!(bump.offset(), before);
    }

    #[test]
    fn non_top_release_is_noop(
        sizes in proptest::collection::vec(1usize..128, 2..16),
        pick in 0usize..16,
    ) {
        let mut buf = vec![0u8; 8 * 1024];
        let mut bump = BumpAllocator::new(&mut buf);
        let granted: Vec<Allocation> = sizes
            .iter()
            .map(|&n| bump.allocate(n, 0).unwrap())
            .collect();
        let before = bump.offset();
        // Any allocation except the last one is buried.
        let victim = granted[pick % (granted.len() - 1)];
        unsafe { bump.deallocate(victim) };
        prop_assert_eq!(bump.offset(), before);
    }

    #[test]
    fn exhaustion_boundary_is_inclusive(cap in 1usize..512, used in 0usize..512) {
        let used = used % cap;
        let mut buf = vec![0u8; cap];
        let mut bump = BumpAllocator::new(&mut buf);
        if used > 0 {
            bump.allocate(used, 0).unwrap();
        }
        let remaining = cap - used;
        prop_assert!(bump.allocate(remaining, 0).is_err());
        prop_assert_eq!(bump.offset(), used);
        if remaining > 1 {
            prop_assert!(bump.allocate(remaining - 1, 0).is_ok());
        }
    }
}
