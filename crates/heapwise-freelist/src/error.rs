//! Free-list configuration errors.

use std::error::Error;
use std::fmt;

/// Errors from validating a [`FreeListConfig`](crate::FreeListConfig).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Page size is not a power of two or is too small to hold a block
    /// header plus useful capacity.
    InvalidPageSize {
        /// The rejected page size in bytes.
        page_size: usize,
        /// Smallest accepted page size in bytes.
        minimum: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPageSize { page_size, minimum } => {
                write!(
                    f,
                    "invalid page size {page_size}: must be a power of two and at least {minimum}"
                )
            }
        }
    }
}

impl Error for ConfigError {}
