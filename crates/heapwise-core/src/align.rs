//! Power-of-two alignment arithmetic.
//!
//! Alignments travel through the capability contract as exponents
//! (`alignment = 2^exponent`). Everything here works on plain addresses
//! (`usize`) so it can be shared by allocators that never dereference the
//! memory they describe.

/// Convert an alignment exponent into a byte alignment.
///
/// Returns `None` if `2^exponent` does not fit in a `usize`.
pub fn alignment_from_exponent(exponent: u8) -> Option<usize> {
    1usize.checked_shl(u32::from(exponent))
}

/// Inverse of [`alignment_from_exponent`] for a power-of-two alignment.
pub fn exponent_of(alignment: usize) -> u8 {
    debug_assert!(alignment.is_power_of_two());
    alignment.trailing_zeros() as u8
}

/// Byte distance from `addr` to the next address that is a multiple of
/// `alignment`. Zero when `addr` is already aligned.
///
/// `alignment` must be a power of two.
pub fn align_offset(addr: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    addr.wrapping_neg() & (alignment - 1)
}

/// Round `value` up to the next multiple of `multiple` (a power of two).
///
/// Returns `None` on overflow.
pub fn round_up(value: usize, multiple: usize) -> Option<usize> {
    debug_assert!(multiple.is_power_of_two());
    let mask = multiple - 1;
    Some(value.checked_add(mask)? & !mask)
}
