//! Exercise both allocators end to end.
//!
//! Run with `RUST_LOG=debug` to see block acquisition and retirement.

use heapwise_bump::BumpAllocator;
use heapwise_core::{reallocate, Capability};
use heapwise_freelist::FreeListAllocator;
use heapwise_test_utils::PageSource;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Bump allocator over a 1MiB buffer: 10 u32 then 5 u32, LIFO release.
    let mut buf = vec![0u8; 1 << 20];
    let mut bump = BumpAllocator::new(&mut buf);
    let first = bump.allocate(10 * std::mem::size_of::<u32>(), 6)?;
    let second = bump.allocate(5 * std::mem::size_of::<u32>(), 0)?;
    info!(offset = bump.offset(), "bump after two allocations");
    unsafe {
        bump.deallocate(second);
        bump.deallocate(first);
    }
    info!(offset = bump.offset(), "bump after LIFO release");

    // Free-list allocator over system pages.
    let mut pages = PageSource::new();
    let mut fl = FreeListAllocator::new(&mut pages);
    let small = fl.allocate(1, 0)?;
    let bytes = unsafe { small.as_mut_slice() };
    bytes[0] = 0x5A;
    let grown = unsafe { reallocate(&mut fl, small, 6000, 4) }?;
    info!(
        blocks = fl.block_count(),
        tracked = fl.tracked_count(),
        first_byte = unsafe { grown.as_mut_slice() }[0],
        "free list after growing one allocation"
    );
    unsafe { fl.deallocate(grown) };
    info!(tracked = fl.tracked_count(), "free list after release");
    drop(fl);
    info!(
        acquired = pages.acquisitions().len(),
        live_bytes = pages.live_bytes(),
        "backing page source"
    );
    Ok(())
}
