//! Free-list allocator configuration.

use heapwise_core::exponent_of;

use crate::error::ConfigError;

/// Configuration for [`FreeListAllocator`](crate::FreeListAllocator).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreeListConfig {
    /// Granularity and alignment of every block request sent to the
    /// backing allocator, in bytes.
    ///
    /// Default: 4096. Must be a power of two and at least
    /// [`MIN_PAGE_SIZE`](Self::MIN_PAGE_SIZE).
    pub page_size: usize,
}

impl FreeListConfig {
    /// Default page size: 4KiB.
    pub const DEFAULT_PAGE_SIZE: usize = 4096;

    /// Smallest page size accepted by [`validate`](Self::validate).
    pub const MIN_PAGE_SIZE: usize = 64;

    /// Config with the given page size. Call [`validate`](Self::validate)
    /// (or construct through `FreeListAllocator::with_config`) before use.
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }

    /// Check the page size constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_size.is_power_of_two() || self.page_size < Self::MIN_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                page_size: self.page_size,
                minimum: Self::MIN_PAGE_SIZE,
            });
        }
        Ok(())
    }

    /// Page size as an alignment exponent, for backing requests.
    pub fn page_exponent(&self) -> u8 {
        exponent_of(self.page_size)
    }
}

impl Default for FreeListConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE)
    }
}
