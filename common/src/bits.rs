//! Helpers for bit-flag values.

/// True when exactly one bit is set.
#[inline]
pub fn is_single_bit(value: u64) -> bool {
    value.is_power_of_two()
}

/// Indices of the set bits in `value`, lowest first.
pub fn set_bit_indices(value: u64) -> impl Iterator<Item = u32> {
    let mut remaining = value;
    std::iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        let idx = remaining.trailing_zeros();
        remaining &= remaining - 1;
        Some(idx)
    })
}

/// Lowest bit index below `width` that is not set in `used`.
pub fn lowest_clear_bit(used: u64, width: u32) -> Option<u32> {
    debug_assert!(width <= u64::BITS);
    let idx = (!used).trailing_zeros();
    (idx < width).then_some(idx)
}
