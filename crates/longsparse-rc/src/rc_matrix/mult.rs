//! Matrix-vector and matrix-matrix products

use log::warn;
use longsparse_core::{
    generic, DenseLongMatrix, DenseLongVector, Error, ExecutionEngine, LongMatrix1D,
    LongMatrix2D, Result,
};

use super::SparseRcLongMatrix;

impl<E: ExecutionEngine> SparseRcLongMatrix<E> {
    /// `z = A * y`
    pub fn zmult(&self, y: &dyn LongMatrix1D, z: &mut dyn LongMatrix1D) -> Result<()> {
        self.zmult_scaled(y, z, 1, 0, false)
    }

    /// Allocate `z` and compute `z = A * y`
    pub fn mult(&self, y: &dyn LongMatrix1D) -> Result<DenseLongVector> {
        let mut z = DenseLongVector::new(self.rows);
        self.zmult(y, &mut z)?;
        Ok(z)
    }

    /// `z = alpha * op(A) * y + beta * z`, where `op(A)` is `A` or its
    /// transpose.
    ///
    /// `op(A)` must have as many columns as `y` has cells and at most as many
    /// rows as `z`. Dense `y` and `z` take the optimized path; any other
    /// operand goes through [`generic::zmult_vector`].
    ///
    /// The transposed product accumulates into `z` out of row order. When
    /// partitioned, each block sums into a private buffer and the buffers
    /// are added to `z` in block order after all blocks finished.
    pub fn zmult_scaled(
        &self,
        y: &dyn LongMatrix1D,
        z: &mut dyn LongMatrix1D,
        alpha: i64,
        beta: i64,
        transpose_a: bool,
    ) -> Result<()> {
        let (m, n) = if transpose_a {
            (self.columns, self.rows)
        } else {
            (self.rows, self.columns)
        };
        if n != y.size() || m > z.size() {
            let a_desc = format!("{m} x {n} matrix");
            return Err(Error::incompatible_args(&[
                a_desc.as_str(),
                y.describe().as_str(),
                z.describe().as_str(),
            ]));
        }

        if let (Some(y), Some(z)) = (
            y.as_any().downcast_ref::<DenseLongVector>(),
            z.as_any_mut().downcast_mut::<DenseLongVector>(),
        ) {
            if transpose_a {
                self.zmult_transposed(y, z, alpha, beta);
            } else {
                self.zmult_rows(y, z, alpha, beta);
            }
            return Ok(());
        }

        warn!(
            "zmult: {} and {} are not dense, visiting every cell",
            y.describe(),
            z.describe()
        );
        generic::zmult_vector(self, y, z, alpha, beta, transpose_a)
    }

    fn zmult_rows(&self, y: &DenseLongVector, z: &mut DenseLongVector, alpha: i64, beta: i64) {
        let blocks = self.run_row_ranges("zmult", |rows| {
            rows.map(|row| {
                let mut sum = 0i64;
                for k in self.row_pointers[row]..self.row_pointers[row + 1] {
                    let x = y.get_quick(self.column_indexes[k]);
                    sum = sum.wrapping_add(self.values[k].wrapping_mul(x));
                }
                sum
            })
            .collect::<Vec<i64>>()
        });

        for (row, sum) in blocks.into_iter().flatten().enumerate() {
            let idx = z.index(row);
            let cell = &mut z.elements_mut()[idx];
            *cell = if beta == 0 {
                alpha.wrapping_mul(sum)
            } else {
                alpha
                    .wrapping_mul(sum)
                    .wrapping_add(beta.wrapping_mul(*cell))
            };
        }
    }

    fn zmult_transposed(
        &self,
        y: &DenseLongVector,
        z: &mut DenseLongVector,
        alpha: i64,
        beta: i64,
    ) {
        if beta != 1 {
            z.scale(beta);
        }

        let ranges = self.row_partitions("zmult_transposed");
        if ranges.len() == 1 {
            for (row, column, value) in self.iter() {
                let idx = z.index(column);
                let cell = &mut z.elements_mut()[idx];
                *cell = cell.wrapping_add(value.wrapping_mul(alpha.wrapping_mul(y.get_quick(row))));
            }
            return;
        }

        let partials = self.engine.execute_tasks(ranges, |rows| {
            let mut acc = vec![0i64; self.columns];
            for row in rows {
                let scaled = alpha.wrapping_mul(y.get_quick(row));
                for k in self.row_pointers[row]..self.row_pointers[row + 1] {
                    let slot = &mut acc[self.column_indexes[k]];
                    *slot = slot.wrapping_add(self.values[k].wrapping_mul(scaled));
                }
            }
            acc
        });
        for acc in partials {
            for (column, delta) in acc.into_iter().enumerate() {
                if delta != 0 {
                    let idx = z.index(column);
                    let cell = &mut z.elements_mut()[idx];
                    *cell = cell.wrapping_add(delta);
                }
            }
        }
    }

    /// `C = A * B`
    pub fn zmult_matrix(&self, b: &dyn LongMatrix2D, c: &mut dyn LongMatrix2D) -> Result<()> {
        self.zmult_matrix_scaled(b, c, 1, 0, false, false)
    }

    /// Allocate `C` and compute `C = A * B`
    pub fn mult_matrix(&self, b: &dyn LongMatrix2D) -> Result<DenseLongMatrix> {
        let mut c = DenseLongMatrix::new(self.rows, b.columns());
        self.zmult_matrix(b, &mut c)?;
        Ok(c)
    }

    /// `C = alpha * op(A) * op(B) + beta * C`.
    ///
    /// For every stored `(i, j, v)` of `op(A)` the row `j` of `op(B)`,
    /// scaled by `alpha * v`, is added to row `i` of `C`. This runs in the
    /// calling thread: two nonzeros in different rows of `A` may target the
    /// same row of `C` under transpose.
    pub fn zmult_matrix_scaled(
        &self,
        b: &dyn LongMatrix2D,
        c: &mut dyn LongMatrix2D,
        alpha: i64,
        beta: i64,
        transpose_a: bool,
        transpose_b: bool,
    ) -> Result<()> {
        let (m, n) = if transpose_a {
            (self.columns, self.rows)
        } else {
            (self.rows, self.columns)
        };
        let (b_rows, p) = if transpose_b {
            (b.columns(), b.rows())
        } else {
            (b.rows(), b.columns())
        };
        let a_desc = format!("{m} x {n} matrix");
        let b_desc = format!("{b_rows} x {p} matrix");
        if b_rows != n {
            return Err(Error::IncompatibleArguments(format!(
                "Matrix2D inner dimensions must agree: {a_desc}, {b_desc}"
            )));
        }
        if c.rows() != m || c.columns() != p {
            return Err(Error::IncompatibleArguments(format!(
                "Incompatible result matrix: {a_desc}, {b_desc}, {}",
                c.describe()
            )));
        }

        if let (Some(b), Some(c)) = (
            b.as_any().downcast_ref::<DenseLongMatrix>(),
            c.as_any_mut().downcast_mut::<DenseLongMatrix>(),
        ) {
            self.axpy_rows(b, c, alpha, beta, transpose_a, transpose_b, p);
            return Ok(());
        }

        warn!(
            "zmult_matrix: {} and {} are not dense, visiting every cell",
            b.describe(),
            c.describe()
        );
        generic::zmult_matrix(self, b, c, alpha, beta, transpose_a, transpose_b)
    }

    #[allow(clippy::too_many_arguments)]
    fn axpy_rows(
        &self,
        b: &DenseLongMatrix,
        c: &mut DenseLongMatrix,
        alpha: i64,
        beta: i64,
        transpose_a: bool,
        transpose_b: bool,
        p: usize,
    ) {
        if beta != 1 {
            c.scale(beta);
        }
        // Strides of op(B)
        let (b_row_stride, b_column_stride) = if transpose_b {
            (b.column_stride(), b.row_stride())
        } else {
            (b.row_stride(), b.column_stride())
        };
        let b_zero = b.zero();
        let b_elements = b.elements();

        for (row, column, value) in self.iter() {
            let (target, source) = if transpose_a {
                (column, row)
            } else {
                (row, column)
            };
            let scale = alpha.wrapping_mul(value);
            let b_base = b_zero + source * b_row_stride;
            for k in 0..p {
                let x = b_elements[b_base + k * b_column_stride];
                let idx = c.index(target, k);
                let cell = &mut c.elements_mut()[idx];
                *cell = cell.wrapping_add(scale.wrapping_mul(x));
            }
        }
    }
}
