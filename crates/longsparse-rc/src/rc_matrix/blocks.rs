//! Row-partitioned execution of in-place kernels

use std::ops::Range;

use log::{debug, trace};
use longsparse_core::{split_ranges, split_slice_mut, ExecutionEngine};

use super::SparseRcLongMatrix;

/// A contiguous range of rows handed to one task.
///
/// `values` is the slice of the value buffer owned by these rows, so
/// `values[k - base]` is the value at global slot `k`.
pub(super) struct RowBlock<'a> {
    pub rows: Range<usize>,
    pub row_pointers: &'a [usize],
    pub column_indexes: &'a [usize],
    pub values: &'a mut [i64],
}

impl RowBlock<'_> {
    /// Call `f(row, column, &mut value)` for every stored slot of the block
    /// in ascending order
    #[inline]
    pub fn for_each_mut(&mut self, mut f: impl FnMut(usize, usize, &mut i64)) {
        let base = self.row_pointers[self.rows.start];
        for row in self.rows.clone() {
            for k in self.row_pointers[row]..self.row_pointers[row + 1] {
                f(row, self.column_indexes[k], &mut self.values[k - base]);
            }
        }
    }

    /// Rewrite every slot with `f(row, column, value)`; returns whether a
    /// zero was written
    pub fn rewrite(&mut self, f: impl Fn(usize, usize, i64) -> i64) -> bool {
        let mut produced_zero = false;
        self.for_each_mut(|row, column, value| {
            *value = f(row, column, *value);
            produced_zero |= *value == 0;
        });
        produced_zero
    }
}

impl<E: ExecutionEngine> SparseRcLongMatrix<E> {
    /// Row ranges for a kernel over the stored nonzeros, as decided by the
    /// engine. Always at least one range.
    pub(super) fn row_partitions(&self, kernel: &str) -> Vec<Range<usize>> {
        let nnz = self.values.len();
        match self.engine.partition_count(nnz, self.rows) {
            Some(n) => {
                let ranges = split_ranges(self.rows, n);
                debug!(
                    "{kernel}: partitioning {} rows ({nnz} nonzeros) into {} blocks",
                    self.rows,
                    ranges.len()
                );
                ranges
            }
            None => {
                trace!(
                    "{kernel}: serial over {} rows ({nnz} nonzeros, {:?} engine)",
                    self.rows,
                    self.engine.strategy()
                );
                vec![0..self.rows]
            }
        }
    }

    /// Run `f` once per row block and wait for all blocks.
    ///
    /// Each block gets exclusive access to the values of its rows; the
    /// structure is shared read-only. Results come back in row order.
    pub(super) fn run_row_blocks<F, R>(&mut self, kernel: &str, f: F) -> Vec<R>
    where
        F: Fn(RowBlock<'_>) -> R + Sync + Send,
        R: Send,
    {
        let ranges = self.row_partitions(kernel);
        let value_ranges: Vec<Range<usize>> = ranges
            .iter()
            .map(|rows| self.row_pointers[rows.start]..self.row_pointers[rows.end])
            .collect();
        let slices = split_slice_mut(&mut self.values, &value_ranges);
        let row_pointers = &self.row_pointers;
        let column_indexes = &self.column_indexes;
        let blocks: Vec<RowBlock<'_>> = ranges
            .into_iter()
            .zip(slices)
            .map(|(rows, values)| RowBlock {
                rows,
                row_pointers,
                column_indexes,
                values,
            })
            .collect();
        self.engine.execute_tasks(blocks, f)
    }

    /// Run a read-only kernel once per row range and wait for all ranges
    pub(super) fn run_row_ranges<F, R>(&self, kernel: &str, f: F) -> Vec<R>
    where
        F: Fn(Range<usize>) -> R + Sync + Send,
        R: Send,
    {
        let ranges = self.row_partitions(kernel);
        self.engine.execute_tasks(ranges, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use longsparse_core::SequentialEngine;

    #[test]
    fn test_single_block_when_sequential() {
        let mut m = SparseRcLongMatrix::from_rows(&[vec![1, 0], vec![0, 2]]).unwrap();
        assert_eq!(m.row_partitions("test"), vec![0..2]);
        let seen = m.run_row_blocks("test", |mut block| {
            let mut cells = Vec::new();
            block.for_each_mut(|r, c, v| cells.push((r, c, *v)));
            cells
        });
        assert_eq!(seen, vec![vec![(0, 0, 1), (1, 1, 2)]]);
        let _: &SequentialEngine = m.engine();
    }

    #[test]
    fn test_empty_matrix_has_one_empty_block() {
        let mut m = SparseRcLongMatrix::new(0, 0);
        let counts = m.run_row_blocks("test", |block| block.values.len());
        assert_eq!(counts, vec![0]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_blocks_cover_disjoint_value_slices() {
        use longsparse_core::ParallelEngine;

        let rows: Vec<Vec<i64>> = (0..10)
            .map(|r| (0..4).map(|c| (r * 4 + c + 1) as i64).collect())
            .collect();
        let engine = ParallelEngine::with_num_threads(3)
            .unwrap()
            .with_threshold(0);
        let mut m = SparseRcLongMatrix::from_rows(&rows)
            .unwrap()
            .with_engine(engine);

        let ranges = m.run_row_blocks("test", |block| (block.rows.clone(), block.values.len()));
        assert_eq!(ranges, vec![(0..3, 12), (3..6, 12), (6..10, 16)]);

        let zeros = m.run_row_blocks("test", |mut block| block.rewrite(|_, _, v| v * 10));
        assert_eq!(zeros, vec![false, false, false]);
        assert_eq!(m.get_quick(9, 3), 400);
    }
}
