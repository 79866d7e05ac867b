//! Workload profiles for benchmarking the heapwise allocators.
//!
//! - [`request_mix`]: deterministic `(size, alignment_exponent)` requests
//!   drawn from a seeded ChaCha8 stream.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Build `count` allocation requests with sizes in `1..=max_size` and
/// alignment exponents in `0..=max_exponent`.
///
/// The same seed always yields the same sequence.
pub fn request_mix(seed: u64, count: usize, max_size: usize, max_exponent: u8) -> Vec<(usize, u8)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let size = (rng.next_u64() % max_size.max(1) as u64) as usize + 1;
            let exponent = (rng.next_u32() % (u32::from(max_exponent) + 1)) as u8;
            (size, exponent)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_mix_is_deterministic() {
        assert_eq!(request_mix(7, 32, 512, 6), request_mix(7, 32, 512, 6));
        assert_ne!(request_mix(7, 32, 512, 6), request_mix(8, 32, 512, 6));
    }

    #[test]
    fn request_mix_respects_bounds() {
        for (size, exp) in request_mix(1, 1000, 100, 4) {
            assert!((1..=100).contains(&size));
            assert!(exp <= 4);
        }
    }
}
