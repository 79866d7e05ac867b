//! Allocation error type.

use std::error::Error;
use std::fmt;

/// Errors surfaced by [`Capability::allocate`](crate::Capability::allocate).
///
/// There is exactly one kind: the allocator could not produce the requested
/// capacity. `resize` and `deallocate` never report errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// No capacity could be produced for the request.
    ///
    /// Raised when a bump buffer is exhausted, when a backing allocator
    /// refuses a block, or when the size/alignment arithmetic for the
    /// request overflows.
    OutOfMemory {
        /// Number of bytes requested by the caller.
        requested: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: requested {requested} bytes")
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_requested_size() {
        let err = AllocError::OutOfMemory { requested: 4096 };
        assert_eq!(err.to_string(), "out of memory: requested 4096 bytes");
    }
}
