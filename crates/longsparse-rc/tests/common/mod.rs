//! Shared fixtures for integration tests

#![allow(dead_code)]

use longsparse_core::ExecutionEngine;
use longsparse_rc::SparseRcLongMatrix;
use proptest::prelude::*;

/// A shape and a sequence of `(row, column, value)` writes, zeros included
pub fn shape_and_writes(
    max_dim: usize,
    max_writes: usize,
) -> impl Strategy<Value = (usize, usize, Vec<(usize, usize, i64)>)> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(move |(rows, columns)| {
        let writes = prop::collection::vec((0..rows, 0..columns, -6i64..6), 0..max_writes);
        (Just(rows), Just(columns), writes)
    })
}

/// Replay writes on a fresh matrix and on a dense reference model
pub fn build(
    rows: usize,
    columns: usize,
    writes: &[(usize, usize, i64)],
) -> (SparseRcLongMatrix, Vec<Vec<i64>>) {
    let mut matrix = SparseRcLongMatrix::new(rows, columns);
    let mut model = vec![vec![0i64; columns]; rows];
    for &(row, column, value) in writes {
        matrix.set_quick(row, column, value);
        model[row][column] = value;
    }
    (matrix, model)
}

/// Storage invariants checked field by field
pub fn assert_canonical<E: ExecutionEngine>(matrix: &SparseRcLongMatrix<E>) {
    let pointers = matrix.row_pointers();
    assert_eq!(pointers.len(), matrix.rows() + 1);
    assert_eq!(pointers[0], 0);
    assert_eq!(pointers[matrix.rows()], matrix.cardinality());
    for row in 0..matrix.rows() {
        let columns = &matrix.column_indexes()[pointers[row]..pointers[row + 1]];
        assert!(
            columns.windows(2).all(|w| w[0] < w[1]),
            "row {row} not strictly increasing: {columns:?}"
        );
        assert!(columns.iter().all(|&c| c < matrix.columns()));
    }
    assert!(matrix.values().iter().all(|&v| v != 0), "explicit zero stored");
}

/// Four-thread engine that partitions from `threshold` nonzeros on
#[cfg(feature = "parallel")]
pub fn parallel_engine(threshold: usize) -> longsparse_core::ParallelEngine {
    use std::sync::OnceLock;

    static POOL: OnceLock<longsparse_core::ParallelEngine> = OnceLock::new();
    POOL.get_or_init(|| {
        longsparse_core::ParallelEngine::with_num_threads(4)
            .expect("thread pool for tests")
    })
    .clone()
    .with_threshold(threshold)
}
