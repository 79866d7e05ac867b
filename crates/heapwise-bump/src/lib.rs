//! Linear bump allocation over a caller-supplied buffer.
//!
//! [`BumpAllocator`] serves requests by advancing an offset through a
//! borrowed byte buffer. Only the most recent allocation can be given back
//! (stack discipline); anything else stays allocated until the allocator is
//! reset or dropped.
//!
//! ```text
//! buffer: [ a0 | a1 | a2 |          free           ]
//!                         ^ offset
//! deallocate(a2) -> offset moves back to the end of a1
//! deallocate(a0) -> no-op (not on top)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod bump;

pub use bump::BumpAllocator;
