//! Elapsed-step lookup over an ascending unlock timestamp table.

/// Number of entries in `timestamps` that are `<= t`.
///
/// `timestamps` must be ascending. Boundaries are inclusive: a step unlocks at
/// exactly its timestamp.
pub fn steps_elapsed(timestamps: &[i64], t: i64) -> usize {
    let len = timestamps.len();
    if len == 0 || t < timestamps[0] {
        return 0;
    }
    if t >= timestamps[len - 1] {
        return len;
    }
    // Invariant: timestamps[lo] <= t < timestamps[hi].
    let mut lo = 0usize;
    let mut hi = len - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if timestamps[mid] <= t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo + 1
}
