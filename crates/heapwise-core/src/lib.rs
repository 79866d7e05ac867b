//! Core types and traits for the heapwise allocators.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! allocation capability every allocator in the workspace implements (and
//! that the free-list allocator consumes from its backing source), the
//! [`Allocation`] descriptor handed back to callers, the single
//! [`AllocError`] kind, and the power-of-two alignment arithmetic shared by
//! the implementations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod align;
pub mod allocation;
pub mod capability;
pub mod error;

pub use align::{align_offset, alignment_from_exponent, exponent_of, round_up};
pub use allocation::Allocation;
pub use capability::{reallocate, Capability};
pub use error::AllocError;
