//! heapwise: bump and segmented free-list allocators behind one capability.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the heapwise sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use heapwise::prelude::*;
//!
//! let mut buf = vec![0u8; 1024];
//! let mut bump = BumpAllocator::new(&mut buf);
//! let a = bump.allocate(40, 0).unwrap();
//! let b = bump.allocate(20, 0).unwrap();
//! assert_eq!(bump.offset(), 60);
//! unsafe {
//!     bump.deallocate(b);
//!     bump.deallocate(a);
//! }
//! assert_eq!(bump.offset(), 0);
//! ```
//!
//! A [`FreeListAllocator`](prelude::FreeListAllocator) sources its blocks
//! from any other [`Capability`](prelude::Capability), including a bump
//! allocator over a page-aligned buffer.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `heapwise-core` | `Capability`, `Allocation`, `AllocError`, alignment math |
//! | [`bump`] | `heapwise-bump` | `BumpAllocator` |
//! | [`freelist`] | `heapwise-freelist` | `FreeListAllocator`, blocks, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Capability trait, allocation descriptor, error type, alignment math.
pub use heapwise_core as types;

/// Bump allocation over a caller-supplied buffer.
pub use heapwise_bump as bump;

/// Segmented free-list allocation.
pub use heapwise_freelist as freelist;

/// Common imports.
pub mod prelude {
    pub use heapwise_bump::BumpAllocator;
    pub use heapwise_core::{reallocate, AllocError, Allocation, Capability};
    pub use heapwise_freelist::{FreeListAllocator, FreeListConfig};
}
