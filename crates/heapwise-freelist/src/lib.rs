//! Segmented free-list allocation over page-sized blocks.
//!
//! [`FreeListAllocator`] sources page-aligned regions ("blocks") from a
//! backing [`Capability`](heapwise_core::Capability) and serves requests out
//! of them. Each returned pointer is preceded by one machine word recording
//! the alignment padding applied, which lets `deallocate` find the owning
//! block by fixed-offset arithmetic.
//!
//! # Architecture
//!
//! ```text
//! FreeListAllocator<B: Capability>
//! ├── B (backing capability: source of page-aligned regions)
//! ├── FreeListConfig (page size)
//! └── BlockList (index-based doubly linked list)
//!     └── Block[] (region, free span, prev/next BlockId, state)
//!
//! block region (page aligned):
//! ┌──────────────┬──────────────┬─────────┬───────────┬──────────────┐
//! │ owning block │ alloc word   │ padding │ alloc wrd │ allocation   │
//! │ id (usize)   │ (pad = 0)    │         │ (pad > 0) │ ...          │
//! └──────────────┴──────────────┴─────────┴───────────┴──────────────┘
//! |<---- BLOCK_HEADER_SIZE ---->|<----- pad ------->|^ returned pointer
//! ```
//!
//! # Reclamation contract
//!
//! Allocation never shrinks or retires the block it is served from, so
//! repeated requests against one block may return overlapping regions.
//! Deallocation restores the block's free span and then removes the whole
//! block from the list. Blocks are never given back to the backing
//! allocator; the backing owns their memory.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod allocator;
pub mod block;
pub mod config;
pub mod error;
pub mod list;

pub use allocator::FreeListAllocator;
pub use block::{Block, BlockId, BlockState, Span, ALLOC_HEADER_SIZE, BLOCK_HEADER_SIZE};
pub use config::FreeListConfig;
pub use error::ConfigError;
pub use list::BlockList;
