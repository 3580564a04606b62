//! Row-range partitioning for bulk kernels
//!
//! Partitions are contiguous and disjoint. Each one covers `len / n` units
//! and the last one also takes the remainder, so the union is always
//! exactly `0..len`.

use std::ops::Range;

/// Split `0..len` into at most `n` contiguous, disjoint ranges.
///
/// The number of ranges is `min(n, len)` (at least one when `len > 0`).
/// Returns an empty vector when there is nothing to split.
pub fn split_ranges(len: usize, n: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let n = n.clamp(1, len);
    let k = len / n;
    (0..n)
        .map(|j| {
            let first = j * k;
            let last = if j == n - 1 { len } else { first + k };
            first..last
        })
        .collect()
}

/// Hand out one mutable sub-slice per range.
///
/// `ranges` must be sorted and pairwise disjoint, and must lie within
/// `slice`; gaps between ranges are skipped.
pub fn split_slice_mut<'a, T>(slice: &'a mut [T], ranges: &[Range<usize>]) -> Vec<&'a mut [T]> {
    let mut parts = Vec::with_capacity(ranges.len());
    let mut rest = slice;
    let mut consumed = 0;
    for range in ranges {
        debug_assert!(range.start >= consumed, "ranges must be sorted and disjoint");
        let tail = std::mem::take(&mut rest);
        let (_, tail) = tail.split_at_mut(range.start - consumed);
        let (head, tail) = tail.split_at_mut(range.len());
        parts.push(head);
        rest = tail;
        consumed = range.end;
    }
    parts
}
