//! Property-based tests for row partitioning

use longsparse_core::{split_ranges, split_slice_mut};
use proptest::prelude::*;

proptest! {
    // Property: ranges are contiguous, cover 0..len and only the last is longer
    #[test]
    fn prop_split_ranges_partition(len in 1usize..500, n in 1usize..16) {
        let ranges = split_ranges(len, n);
        prop_assert_eq!(ranges.len(), n.min(len));
        prop_assert_eq!(ranges[0].start, 0);
        prop_assert_eq!(ranges[ranges.len() - 1].end, len);

        let base = len / ranges.len();
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
            prop_assert_eq!(pair[0].len(), base);
        }
    }

    // Property: each handed-out slice is exactly the range it was cut for
    #[test]
    fn prop_split_slice_mut_matches_ranges(len in 1usize..300, n in 1usize..12) {
        let mut data: Vec<usize> = (0..len).collect();
        let ranges = split_ranges(len, n);
        let parts = split_slice_mut(&mut data, &ranges);
        prop_assert_eq!(parts.len(), ranges.len());
        for (part, range) in parts.iter().zip(&ranges) {
            let expected: Vec<usize> = range.clone().collect();
            prop_assert_eq!(part.to_vec(), expected);
        }
    }
}
