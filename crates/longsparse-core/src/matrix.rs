//! Abstract 1-d and 2-d matrices of `i64` cells
//!
//! These traits are the contract every operand of the sparse kernels
//! satisfies. Optimized kernels downcast through [`as_any`](LongMatrix2D::as_any)
//! to find a storage layout they know; anything else goes through the
//! cell-by-cell methods declared here.
//!
//! `*_quick` accessors are unchecked: out-of-range coordinates give
//! unspecified results or panic. The checked `get`/`set` report
//! [`Error::IndexOutOfBounds`] / [`Error::CellOutOfBounds`] instead.

use std::any::Any;

use crate::{Error, Result};

/// A vector of `i64` cells
pub trait LongMatrix1D: Any + Send + Sync {
    /// Number of logical cells
    fn size(&self) -> usize;

    /// Read a cell without bounds checking
    fn get_quick(&self, index: usize) -> i64;

    /// Write a cell without bounds checking
    fn set_quick(&mut self, index: usize, value: i64);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Checked read
    fn get(&self, index: usize) -> Result<i64> {
        self.check_index(index)?;
        Ok(self.get_quick(index))
    }

    /// Checked write
    fn set(&mut self, index: usize, value: i64) -> Result<()> {
        self.check_index(index)?;
        self.set_quick(index, value);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.size() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.size(),
            });
        }
        Ok(())
    }

    /// Number of non-zero cells
    fn cardinality(&self) -> usize {
        (0..self.size()).filter(|&i| self.get_quick(i) != 0).count()
    }

    /// Copy all cells into a `Vec`
    fn to_vec(&self) -> Vec<i64> {
        (0..self.size()).map(|i| self.get_quick(i)).collect()
    }

    /// Short description used in error messages, e.g. `"3 vector"`
    fn describe(&self) -> String {
        format!("{} vector", self.size())
    }
}

/// A matrix of `i64` cells
pub trait LongMatrix2D: Any + Send + Sync {
    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    /// Read a cell without bounds checking
    fn get_quick(&self, row: usize, column: usize) -> i64;

    /// Write a cell without bounds checking
    fn set_quick(&mut self, row: usize, column: usize, value: i64);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Checked read
    fn get(&self, row: usize, column: usize) -> Result<i64> {
        self.check_cell(row, column)?;
        Ok(self.get_quick(row, column))
    }

    /// Checked write
    fn set(&mut self, row: usize, column: usize, value: i64) -> Result<()> {
        self.check_cell(row, column)?;
        self.set_quick(row, column, value);
        Ok(())
    }

    fn check_cell(&self, row: usize, column: usize) -> Result<()> {
        if row >= self.rows() || column >= self.columns() {
            return Err(Error::CellOutOfBounds {
                row,
                column,
                rows: self.rows(),
                columns: self.columns(),
            });
        }
        Ok(())
    }

    /// Number of cells as `rows * columns`, or `None` if that overflows
    fn size(&self) -> Option<usize> {
        self.rows().checked_mul(self.columns())
    }

    /// Number of non-zero cells
    fn cardinality(&self) -> usize {
        let mut count = 0;
        self.visit_nonzeros(&mut |_, _, _| count += 1);
        count
    }

    /// Call `f(row, column, value)` for every non-zero cell.
    ///
    /// The default walks all cells in row-major order.
    fn visit_nonzeros(&self, f: &mut dyn FnMut(usize, usize, i64)) {
        for row in 0..self.rows() {
            for column in 0..self.columns() {
                let value = self.get_quick(row, column);
                if value != 0 {
                    f(row, column, value);
                }
            }
        }
    }

    /// Fail unless `other` has the same number of rows and columns
    fn check_shape(&self, other: &dyn LongMatrix2D) -> Result<()> {
        if self.rows() != other.rows() || self.columns() != other.columns() {
            return Err(Error::shape_mismatch(&self.describe(), &other.describe()));
        }
        Ok(())
    }

    /// Copy all cells into nested rows
    fn to_rows(&self) -> Vec<Vec<i64>> {
        (0..self.rows())
            .map(|row| {
                (0..self.columns())
                    .map(|column| self.get_quick(row, column))
                    .collect()
            })
            .collect()
    }

    /// Short description used in error messages, e.g. `"3 x 4 matrix"`
    fn describe(&self) -> String {
        format!("{} x {} matrix", self.rows(), self.columns())
    }
}

/// Check that a nested literal is rectangular and return its shape
pub fn rectangular_shape(values: &[Vec<i64>]) -> Result<(usize, usize)> {
    let rows = values.len();
    let columns = values.first().map_or(0, Vec::len);
    if let Some((row, bad)) = values
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != columns)
    {
        return Err(Error::InvalidParameter(format!(
            "All rows of array must have same number of columns: row {row} has {}, expected {columns}",
            bad.len()
        )));
    }
    Ok((rows, columns))
}
