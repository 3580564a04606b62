//! Row-compressed sparse matrix
//!
//! Storage is the standard compressed-row layout with two growable buffers:
//!
//! ```text
//! row_pointers   [0, 1, 1, 3]          rows + 1 entries
//! column_indexes [0, 1, 2]             sorted within each row
//! values         [5, 7, 3]             never zero
//! ```
//!
//! Row `r` owns the slots `row_pointers[r]..row_pointers[r + 1]`. Column
//! indexes are strictly increasing inside a row, so point access is a binary
//! search over the row's slots.
//!
//! # Performance
//!
//! Inserting or removing a nonzero shifts the tail of both buffers and bumps
//! every later row pointer, so a single `set_quick` is `O(nnz)` in the worst
//! case. Filling a matrix in increasing `(row, column)` order keeps the
//! shifted tail short and is much faster than filling it backwards.

mod assign;
mod blocks;
mod mult;

use std::any::Any;

use log::trace;
use longsparse_core::{
    rectangular_shape, DenseLongMatrix, Error, ExecutionEngine, LongMatrix2D, Result,
    SequentialEngine,
};

/// Sparse matrix of `i64` in compressed-row format.
///
/// Bulk kernels ask the engine `E` whether to split their rows into
/// partitions; with the default [`SequentialEngine`] everything runs in the
/// calling thread.
#[derive(Clone, Debug)]
pub struct SparseRcLongMatrix<E: ExecutionEngine = SequentialEngine> {
    rows: usize,
    columns: usize,
    row_pointers: Vec<usize>,
    column_indexes: Vec<usize>,
    values: Vec<i64>,
    engine: E,
}

impl SparseRcLongMatrix {
    /// Empty `rows x columns` matrix
    ///
    /// `rows * columns` may exceed `usize::MAX`; only nonzeros are stored.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::with_capacity(rows, columns, 0)
    }

    /// Empty matrix with room for `nzmax` nonzeros before reallocating
    pub fn with_capacity(rows: usize, columns: usize, nzmax: usize) -> Self {
        Self {
            rows,
            columns,
            row_pointers: vec![0; rows + 1],
            column_indexes: Vec::with_capacity(nzmax),
            values: Vec::with_capacity(nzmax),
            engine: SequentialEngine,
        }
    }

    /// Adopt prebuilt buffers as they are.
    ///
    /// The buffers are trusted to satisfy the storage invariants; nothing is
    /// checked in release builds. Call [`validate`](Self::validate) when the
    /// source is not trusted.
    pub fn from_parts(
        rows: usize,
        columns: usize,
        row_pointers: Vec<usize>,
        column_indexes: Vec<usize>,
        values: Vec<i64>,
    ) -> Self {
        debug_assert_eq!(row_pointers.len(), rows + 1, "row pointer length");
        debug_assert_eq!(column_indexes.len(), values.len(), "index/value length");
        Self {
            rows,
            columns,
            row_pointers,
            column_indexes,
            values,
            engine: SequentialEngine,
        }
    }

    /// Copy a rectangular nested literal, skipping zeros
    pub fn from_rows(values: &[Vec<i64>]) -> Result<Self> {
        let (rows, columns) = rectangular_shape(values)?;
        let nnz = values.iter().flatten().filter(|&&v| v != 0).count();
        let mut matrix = Self::with_capacity(rows, columns, nnz);
        for (row, cells) in values.iter().enumerate() {
            for (column, &value) in cells.iter().enumerate() {
                if value != 0 {
                    matrix.column_indexes.push(column);
                    matrix.values.push(value);
                }
            }
            matrix.row_pointers[row + 1] = matrix.values.len();
        }
        Ok(matrix)
    }
}

impl<E: ExecutionEngine> SparseRcLongMatrix<E> {
    /// Move the storage under a different execution engine
    pub fn with_engine<F: ExecutionEngine>(self, engine: F) -> SparseRcLongMatrix<F> {
        SparseRcLongMatrix {
            rows: self.rows,
            columns: self.columns,
            row_pointers: self.row_pointers,
            column_indexes: self.column_indexes,
            values: self.values,
            engine,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Empty matrix of another shape on the same engine
    pub fn like(&self, rows: usize, columns: usize) -> Self {
        SparseRcLongMatrix::new(rows, columns).with_engine(self.engine.clone())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_pointers(&self) -> &[usize] {
        &self.row_pointers
    }

    pub fn column_indexes(&self) -> &[usize] {
        &self.column_indexes
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of stored nonzeros
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.column_indexes.len()
    }

    /// Number of stored nonzeros in `row`
    pub fn row_nnz(&self, row: usize) -> usize {
        self.row_pointers[row + 1] - self.row_pointers[row]
    }

    /// Slot of `column` within `row`: `Ok(slot)` if stored, otherwise
    /// `Err(slot)` where it would have to be inserted.
    #[inline]
    fn search(&self, row: usize, column: usize) -> std::result::Result<usize, usize> {
        let low = self.row_pointers[row];
        let high = self.row_pointers[row + 1];
        self.column_indexes[low..high]
            .binary_search(&column)
            .map(|k| low + k)
            .map_err(|k| low + k)
    }

    /// Value at `(row, column)`; unchecked.
    #[inline]
    pub fn get_quick(&self, row: usize, column: usize) -> i64 {
        match self.search(row, column) {
            Ok(k) => self.values[k],
            Err(_) => 0,
        }
    }

    /// Store `value` at `(row, column)`; unchecked.
    ///
    /// Writing zero removes the entry, writing a non-zero value to an empty
    /// cell inserts one.
    pub fn set_quick(&mut self, row: usize, column: usize, value: i64) {
        match self.search(row, column) {
            Ok(k) if value == 0 => self.remove(row, k),
            Ok(k) => self.values[k] = value,
            Err(k) if value != 0 => self.insert(row, column, k, value),
            Err(_) => {}
        }
    }

    fn insert(&mut self, row: usize, column: usize, slot: usize, value: i64) {
        self.column_indexes.insert(slot, column);
        self.values.insert(slot, value);
        for pointer in &mut self.row_pointers[row + 1..] {
            *pointer += 1;
        }
    }

    fn remove(&mut self, row: usize, slot: usize) {
        self.column_indexes.remove(slot);
        self.values.remove(slot);
        for pointer in &mut self.row_pointers[row + 1..] {
            *pointer -= 1;
        }
    }

    /// Drop every stored zero in one pass and rebuild the row pointers.
    ///
    /// Kernels that rewrite values in place call this when they produced a
    /// zero, so no explicit zero survives a public operation.
    fn drop_explicit_zeros(&mut self) {
        let before = self.values.len();
        let mut write = 0;
        let mut read = 0;
        for row in 0..self.rows {
            let end = self.row_pointers[row + 1];
            self.row_pointers[row] = write;
            while read < end {
                if self.values[read] != 0 {
                    self.column_indexes[write] = self.column_indexes[read];
                    self.values[write] = self.values[read];
                    write += 1;
                }
                read += 1;
            }
        }
        self.row_pointers[self.rows] = write;
        self.column_indexes.truncate(write);
        self.values.truncate(write);
        trace!("dropped {} explicit zeros", before - write);
    }

    /// Shrink both buffers to the number of stored nonzeros
    pub fn trim_to_size(&mut self) {
        self.column_indexes.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    /// Capacity of the index/value buffers
    pub fn capacity(&self) -> usize {
        self.values.capacity().min(self.column_indexes.capacity())
    }

    /// Iterate stored nonzeros as `(row, column, value)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, i64)> + '_ {
        (0..self.rows).flat_map(move |row| {
            let low = self.row_pointers[row];
            let high = self.row_pointers[row + 1];
            (low..high).map(move |k| (row, self.column_indexes[k], self.values[k]))
        })
    }

    /// Materialize as a dense row-major matrix
    pub fn to_dense(&self) -> DenseLongMatrix {
        let mut full = DenseLongMatrix::new(self.rows, self.columns);
        for (row, column, value) in self.iter() {
            full.set_quick(row, column, value);
        }
        full
    }

    /// Check the storage invariants.
    ///
    /// Reports the first violation found as [`Error::InvalidStructure`].
    pub fn validate(&self) -> Result<()> {
        if self.row_pointers.len() != self.rows + 1 {
            return Err(Error::size_mismatch(
                self.rows + 1,
                self.row_pointers.len(),
                "row pointers",
            ));
        }
        if self.column_indexes.len() != self.values.len() {
            return Err(Error::size_mismatch(
                self.column_indexes.len(),
                self.values.len(),
                "values",
            ));
        }
        if self.row_pointers[0] != 0 {
            return Err(Error::InvalidStructure(format!(
                "row_pointers[0] is {}, expected 0",
                self.row_pointers[0]
            )));
        }
        if self.row_pointers[self.rows] != self.values.len() {
            return Err(Error::InvalidStructure(format!(
                "row_pointers[{}] is {}, expected {}",
                self.rows,
                self.row_pointers[self.rows],
                self.values.len()
            )));
        }
        for row in 0..self.rows {
            let low = self.row_pointers[row];
            let high = self.row_pointers[row + 1];
            if low > high {
                return Err(Error::InvalidStructure(format!(
                    "row pointers decrease at row {row}"
                )));
            }
            let columns = &self.column_indexes[low..high];
            if let Some(pair) = columns.windows(2).find(|p| p[0] >= p[1]) {
                return Err(Error::InvalidStructure(format!(
                    "row {row}: column {} is not followed by a larger one ({})",
                    pair[0], pair[1]
                )));
            }
            if let Some(&column) = columns.iter().find(|&&c| c >= self.columns) {
                return Err(Error::InvalidStructure(format!(
                    "row {row}: column {column} out of range for {} columns",
                    self.columns
                )));
            }
            if let Some(k) = (low..high).find(|&k| self.values[k] == 0) {
                return Err(Error::InvalidStructure(format!(
                    "row {row}: explicit zero stored for column {}",
                    self.column_indexes[k]
                )));
            }
        }
        Ok(())
    }
}

/// Logical equality: same shape and same nonzeros. The engine is ignored.
impl<E: ExecutionEngine, F: ExecutionEngine> PartialEq<SparseRcLongMatrix<F>>
    for SparseRcLongMatrix<E>
{
    fn eq(&self, other: &SparseRcLongMatrix<F>) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && self.row_pointers == other.row_pointers
            && self.column_indexes == other.column_indexes
            && self.values == other.values
    }
}

impl<E: ExecutionEngine> LongMatrix2D for SparseRcLongMatrix<E> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn get_quick(&self, row: usize, column: usize) -> i64 {
        SparseRcLongMatrix::get_quick(self, row, column)
    }

    #[inline]
    fn set_quick(&mut self, row: usize, column: usize, value: i64) {
        SparseRcLongMatrix::set_quick(self, row, column, value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn cardinality(&self) -> usize {
        self.column_indexes.len()
    }

    fn visit_nonzeros(&self, f: &mut dyn FnMut(usize, usize, i64)) {
        for (row, column, value) in self.iter() {
            f(row, column, value);
        }
    }
}
