/// Find the largest power-of-two interval, as an exponent, that does not
/// exceed `delay`.
///
/// The search starts from `2^min_shift` and doubles while the doubled
/// interval still fits in `delay` and `max_shift` is not reached. Returns
/// `None` when even the smallest interval is longer than `delay`.
pub fn largest_interval(delay: u64, min_shift: u8, max_shift: u8) -> Option<u8> {
    debug_assert!(min_shift <= max_shift && max_shift < 64);

    if delay < 1 << min_shift {
        return None;
    }

    let mut shift = min_shift;
    while shift < max_shift && 2u64 << shift <= delay {
        shift += 1;
    }
    Some(shift)
}
