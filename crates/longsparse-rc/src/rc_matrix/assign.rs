//! Bulk assignment kernels

use log::warn;
use longsparse_core::{generic, Error, ExecutionEngine, LongFunction, LongLongFunction, LongMatrix2D, Result};

use super::SparseRcLongMatrix;

impl<E: ExecutionEngine> SparseRcLongMatrix<E> {
    /// Set every stored nonzero to `value`.
    ///
    /// `value == 0` drops all structure. A non-zero `value` only rewrites the
    /// cells already stored; cells that are zero stay zero.
    pub fn assign_scalar(&mut self, value: i64) -> &mut Self {
        if value == 0 {
            self.column_indexes.clear();
            self.values.clear();
            self.row_pointers.fill(0);
        } else {
            self.values.fill(value);
        }
        self
    }

    /// Replace every stored value `v` with `f(v)`
    pub fn assign_fn(&mut self, f: &LongFunction) -> &mut Self {
        match *f {
            LongFunction::Mult(alpha) => self.scale(alpha),
            LongFunction::Opaque(ref f) => self.for_each_nonzero(|_, _, value| f(value)),
        }
    }

    fn scale(&mut self, alpha: i64) -> &mut Self {
        if alpha == 1 {
            return self;
        }
        if alpha == 0 {
            return self.assign_scalar(0);
        }
        // Carried over from the floating-point family; never true for i64.
        #[allow(clippy::eq_op)]
        if alpha != alpha {
            return self.assign_scalar(alpha);
        }
        let produced_zero = self
            .run_row_blocks("scale", |mut block| {
                block.rewrite(|_, _, value| value.wrapping_mul(alpha))
            })
            .into_iter()
            .any(|zero| zero);
        if produced_zero {
            self.drop_explicit_zeros();
        }
        self
    }

    /// Visit every stored `(row, column, value)` and store what `f` returns.
    ///
    /// Returning zero removes the entry. The order of visits is not
    /// specified: when the engine partitions the rows, blocks run
    /// concurrently, so `f` must only depend on its arguments.
    pub fn for_each_nonzero<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(usize, usize, i64) -> i64 + Sync + Send,
    {
        let produced_zero = self
            .run_row_blocks("for_each_nonzero", |mut block| block.rewrite(&f))
            .into_iter()
            .any(|zero| zero);
        if produced_zero {
            self.drop_explicit_zeros();
        }
        self
    }

    /// Copy all cells of `source`, which must have the same shape.
    ///
    /// A source stored in the same compressed-row layout is copied buffer by
    /// buffer; anything else is cleared and replayed through its nonzeros.
    pub fn assign_matrix(&mut self, source: &dyn LongMatrix2D) -> Result<&mut Self> {
        self.check_shape(source)?;
        if let Some(other) = source.as_any().downcast_ref::<Self>() {
            self.row_pointers.clone_from(&other.row_pointers);
            self.column_indexes.clone_from(&other.column_indexes);
            self.values.clone_from(&other.values);
            return Ok(self);
        }
        self.assign_scalar(0);
        source.visit_nonzeros(&mut |row, column, value| self.set_quick(row, column, value));
        Ok(self)
    }

    /// `self[i, j] = f(self[i, j], other[i, j])` for every cell.
    ///
    /// Shapes must agree. `PlusMultSecond` and `PlusMultFirst` only update
    /// cells where `other` is nonzero. `Div` checks every divisor it will
    /// use before writing anything and fails with [`Error::DivisionByZero`].
    pub fn assign_with(
        &mut self,
        other: &dyn LongMatrix2D,
        f: &LongLongFunction,
    ) -> Result<&mut Self> {
        self.check_shape(other)?;
        match *f {
            LongLongFunction::PlusMultSecond(alpha) => {
                if alpha != 0 {
                    self.update_at_nonzeros(other, |x, y| {
                        x.wrapping_add(alpha.wrapping_mul(y))
                    });
                }
            }
            LongLongFunction::PlusMultFirst(alpha) => {
                if alpha == 0 {
                    return self.assign_matrix(other);
                }
                self.update_at_nonzeros(other, |x, y| alpha.wrapping_mul(x).wrapping_add(y));
            }
            LongLongFunction::Mult => {
                self.combine_stored("mult", other, |x, y| x.wrapping_mul(y));
            }
            LongLongFunction::Div => {
                self.check_divisors(other)?;
                self.combine_stored("div", other, |x, y| x.wrapping_div(y));
            }
            LongLongFunction::Opaque(_) => {
                warn!(
                    "assign_with: opaque operator on {}, visiting every cell",
                    self.describe()
                );
                generic::assign_with(self, other, f)?;
            }
        }
        Ok(self)
    }

    /// `self[i, j] = g(self[i, j], other[i, j])` where `other` is nonzero.
    ///
    /// Cells where `other` is zero keep their value.
    fn update_at_nonzeros<G>(&mut self, other: &dyn LongMatrix2D, g: G)
    where
        G: Fn(i64, i64) -> i64,
    {
        other.visit_nonzeros(&mut |row, column, value| {
            let updated = g(self.get_quick(row, column), value);
            self.set_quick(row, column, updated);
        });
    }

    /// Combine each stored value with the matching cell of `other`.
    ///
    /// Only stored cells are visited, so `g` must map `(0, y)` to zero.
    fn combine_stored<G>(&mut self, kernel: &str, other: &dyn LongMatrix2D, g: G)
    where
        G: Fn(i64, i64) -> i64 + Sync + Send,
    {
        let produced_zero = self
            .run_row_blocks(kernel, |mut block| {
                block.rewrite(|row, column, value| g(value, other.get_quick(row, column)))
            })
            .into_iter()
            .any(|zero| zero);
        if produced_zero {
            self.drop_explicit_zeros();
        }
    }

    /// First stored cell of `self` whose divisor in `other` is zero
    fn check_divisors(&self, other: &dyn LongMatrix2D) -> Result<()> {
        let failures = self.run_row_ranges("div_check", |rows| {
            for row in rows {
                for k in self.row_pointers[row]..self.row_pointers[row + 1] {
                    let column = self.column_indexes[k];
                    if other.get_quick(row, column) == 0 {
                        return Err(Error::DivisionByZero { row, column });
                    }
                }
            }
            Ok(())
        });
        failures.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use longsparse_core::DenseLongMatrix;

    fn sample() -> SparseRcLongMatrix {
        SparseRcLongMatrix::from_rows(&[vec![5, 0, 0], vec![0, 0, 7], vec![0, 3, 0]]).unwrap()
    }

    #[test]
    fn test_scale_by_two() {
        let mut m = sample();
        m.assign_fn(&LongFunction::mult(2));
        assert_eq!(m.get_quick(0, 0), 10);
        assert_eq!(m.get_quick(1, 2), 14);
        assert_eq!(m.get_quick(2, 1), 6);
        assert_eq!(m.cardinality(), 3);
    }

    #[test]
    fn test_scale_special_cases() {
        let mut m = sample();
        m.assign_fn(&LongFunction::mult(1));
        assert_eq!(m, sample());

        m.assign_fn(&LongFunction::mult(0));
        assert_eq!(m.cardinality(), 0);
        assert_eq!(m.row_pointers(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_scale_wrapping_to_zero_is_removed() {
        let mut m = SparseRcLongMatrix::from_rows(&[vec![1 << 62, 3]]).unwrap();
        m.assign_fn(&LongFunction::mult(4));
        assert_eq!(m.cardinality(), 1);
        assert_eq!(m.get_quick(0, 1), 12);
        m.validate().unwrap();
    }

    #[test]
    fn test_assign_scalar() {
        let mut m = sample();
        m.assign_scalar(4);
        assert_eq!(m.values(), &[4, 4, 4]);
        assert_eq!(m.get_quick(0, 1), 0);

        m.assign_scalar(0);
        assert_eq!(m.cardinality(), 0);
        m.validate().unwrap();
    }

    #[test]
    fn test_opaque_function() {
        let mut m = sample();
        m.assign_fn(&LongFunction::from_fn(|x| if x > 4 { x - 5 } else { x }));
        assert_eq!(m.cardinality(), 2);
        assert_eq!(m.get_quick(0, 0), 0);
        assert_eq!(m.get_quick(1, 2), 2);
        m.validate().unwrap();
    }

    #[test]
    fn test_for_each_nonzero_sees_coordinates() {
        let mut m = sample();
        m.for_each_nonzero(|row, column, value| value + (row * 10 + column) as i64);
        assert_eq!(m.get_quick(1, 2), 19);
        assert_eq!(m.get_quick(2, 1), 24);
    }

    #[test]
    fn test_assign_matrix_same_layout() {
        let mut m = SparseRcLongMatrix::new(3, 3);
        m.set_quick(2, 2, 1);
        m.assign_matrix(&sample()).unwrap();
        assert_eq!(m, sample());
    }

    #[test]
    fn test_assign_matrix_from_dense() {
        let mut m = SparseRcLongMatrix::new(3, 3);
        m.set_quick(2, 2, 1);
        let dense = DenseLongMatrix::from_rows(&[vec![0, 1, 0], vec![2, 0, 0], vec![0, 0, 0]])
            .unwrap();
        m.assign_matrix(&dense).unwrap();
        assert_eq!(m.to_dense(), dense);
        assert_eq!(m.cardinality(), 2);
    }

    #[test]
    fn test_assign_matrix_from_equal_copy_is_identity() {
        let mut m = sample();
        let copy = m.clone();
        m.assign_matrix(&copy).unwrap();
        assert_eq!(m, sample());
    }

    #[test]
    fn test_assign_matrix_shape_mismatch_leaves_target() {
        let mut m = sample();
        let err = m.assign_matrix(&SparseRcLongMatrix::new(2, 3)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Incompatible shapes: 3 x 3 matrix, 2 x 3 matrix"
        );
        assert_eq!(m, sample());
    }

    #[test]
    fn test_plus_mult_second() {
        let mut m = sample();
        let other = SparseRcLongMatrix::from_rows(&[vec![1, 0, 0], vec![0, 2, 0], vec![0, -1, 0]])
            .unwrap();
        m.assign_with(&other, &LongLongFunction::plus_mult_second(3))
            .unwrap();
        assert_eq!(
            m.to_dense().to_rows(),
            vec![vec![8, 0, 0], vec![0, 6, 7], vec![0, 0, 0]]
        );
        assert_eq!(m.cardinality(), 3);
        m.validate().unwrap();

        let before = m.clone();
        m.assign_with(&other, &LongLongFunction::plus_mult_second(0))
            .unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_plus_mult_first_keeps_cells_where_other_is_zero() {
        let mut m = SparseRcLongMatrix::from_rows(&[vec![1, 2]]).unwrap();
        let other = SparseRcLongMatrix::from_rows(&[vec![0, 1]]).unwrap();
        m.assign_with(&other, &LongLongFunction::plus_mult_first(3))
            .unwrap();
        assert_eq!(m.to_dense().to_rows(), vec![vec![1, 7]]);

        let mut m = sample();
        let other = SparseRcLongMatrix::from_rows(&[vec![0, 1, 0], vec![0, 0, 0], vec![0, 0, 0]])
            .unwrap();
        m.assign_with(&other, &LongLongFunction::plus_mult_first(2))
            .unwrap();
        assert_eq!(
            m.to_dense().to_rows(),
            vec![vec![5, 1, 0], vec![0, 0, 7], vec![0, 3, 0]]
        );
        assert_eq!(m.cardinality(), 4);

        m.assign_with(&other, &LongLongFunction::plus_mult_first(0))
            .unwrap();
        assert_eq!(m, other);
    }

    #[test]
    fn test_mult_removes_products_of_zero() {
        let mut m = sample();
        let other = SparseRcLongMatrix::from_rows(&[vec![2, 0, 0], vec![0, 0, 0], vec![0, 4, 0]])
            .unwrap();
        m.assign_with(&other, &LongLongFunction::Mult).unwrap();
        assert_eq!(m.cardinality(), 2);
        assert_eq!(m.get_quick(0, 0), 10);
        assert_eq!(m.get_quick(1, 2), 0);
        assert_eq!(m.get_quick(2, 1), 12);
        m.validate().unwrap();
    }

    #[test]
    fn test_div_truncates_and_removes_zeros() {
        let mut m = sample();
        let other = DenseLongMatrix::from_rows(&[vec![2, 1, 1], vec![1, 1, 8], vec![1, -1, 1]])
            .unwrap();
        m.assign_with(&other, &LongLongFunction::Div).unwrap();
        assert_eq!(
            m.to_dense().to_rows(),
            vec![vec![2, 0, 0], vec![0, 0, 0], vec![0, -3, 0]]
        );
        assert_eq!(m.cardinality(), 2);
    }

    #[test]
    fn test_div_by_zero_fails_before_writing() {
        let mut m = sample();
        let other = DenseLongMatrix::from_rows(&[vec![1, 0, 0], vec![0, 0, 1], vec![0, 0, 0]])
            .unwrap();
        let err = m.assign_with(&other, &LongLongFunction::Div).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero { row: 2, column: 1 }));
        assert_eq!(m, sample());
    }

    #[test]
    fn test_opaque_combine_visits_zero_cells() {
        let mut m = sample();
        let other = SparseRcLongMatrix::new(3, 3);
        m.assign_with(&other, &LongLongFunction::from_fn(|x, _| x + 1))
            .unwrap();
        assert_eq!(
            m.to_dense().to_rows(),
            vec![vec![6, 1, 1], vec![1, 1, 8], vec![1, 4, 1]]
        );
        m.validate().unwrap();
    }

    #[test]
    fn test_assign_with_shape_mismatch() {
        let mut m = sample();
        let err = m
            .assign_with(&SparseRcLongMatrix::new(3, 4), &LongLongFunction::Mult)
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }
}
