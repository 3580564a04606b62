//! Cell-by-cell fallbacks for operands without an optimized layout
//!
//! These kernels only use the [`LongMatrix1D`] / [`LongMatrix2D`] accessors,
//! so they work for any combination of operands. They visit every cell,
//! including zeros, and are never partitioned.

use crate::function::LongLongFunction;
use crate::matrix::{LongMatrix1D, LongMatrix2D};
use crate::{Error, Result};

/// `a[i, j] = f(a[i, j], b[i, j])` for every cell.
///
/// For `Div` a zero divisor is only an error under a nonzero dividend; a
/// zero cell stays zero whatever its divisor. Every divisor is checked
/// before anything is written.
pub fn assign_with(
    a: &mut dyn LongMatrix2D,
    b: &dyn LongMatrix2D,
    f: &LongLongFunction,
) -> Result<()> {
    a.check_shape(b)?;
    let div = matches!(f, LongLongFunction::Div);
    if div {
        for row in 0..b.rows() {
            for column in 0..b.columns() {
                if b.get_quick(row, column) == 0 && a.get_quick(row, column) != 0 {
                    return Err(Error::DivisionByZero { row, column });
                }
            }
        }
    }
    for row in 0..a.rows() {
        for column in 0..a.columns() {
            let divisor = b.get_quick(row, column);
            if div && divisor == 0 {
                continue;
            }
            let value = f.apply(a.get_quick(row, column), divisor);
            a.set_quick(row, column, value);
        }
    }
    Ok(())
}

/// `z = alpha * op(a) * y + beta * z` where `op` optionally transposes
pub fn zmult_vector(
    a: &dyn LongMatrix2D,
    y: &dyn LongMatrix1D,
    z: &mut dyn LongMatrix1D,
    alpha: i64,
    beta: i64,
    transpose_a: bool,
) -> Result<()> {
    let (m, n) = if transpose_a {
        (a.columns(), a.rows())
    } else {
        (a.rows(), a.columns())
    };
    if n != y.size() || m > z.size() {
        let a_desc = format!("{m} x {n} matrix");
        return Err(Error::incompatible_args(&[
            a_desc.as_str(),
            y.describe().as_str(),
            z.describe().as_str(),
        ]));
    }
    let at = |i: usize, j: usize| {
        if transpose_a {
            a.get_quick(j, i)
        } else {
            a.get_quick(i, j)
        }
    };
    for i in 0..m {
        let mut sum = 0i64;
        for j in 0..n {
            sum = sum.wrapping_add(at(i, j).wrapping_mul(y.get_quick(j)));
        }
        let value = alpha
            .wrapping_mul(sum)
            .wrapping_add(beta.wrapping_mul(z.get_quick(i)));
        z.set_quick(i, value);
    }
    Ok(())
}

/// `c = alpha * op(a) * op(b) + beta * c` where each `op` optionally transposes
pub fn zmult_matrix(
    a: &dyn LongMatrix2D,
    b: &dyn LongMatrix2D,
    c: &mut dyn LongMatrix2D,
    alpha: i64,
    beta: i64,
    transpose_a: bool,
    transpose_b: bool,
) -> Result<()> {
    let (m, n) = if transpose_a {
        (a.columns(), a.rows())
    } else {
        (a.rows(), a.columns())
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
    for i in 0..m {
        for k in 0..p {
            let mut sum = 0i64;
            for j in 0..n {
                let av = if transpose_a { a.get_quick(j, i) } else { a.get_quick(i, j) };
                let bv = if transpose_b { b.get_quick(k, j) } else { b.get_quick(j, k) };
                sum = sum.wrapping_add(av.wrapping_mul(bv));
            }
            let value = alpha
                .wrapping_mul(sum)
                .wrapping_add(beta.wrapping_mul(c.get_quick(i, k)));
            c.set_quick(i, k, value);
        }
    }
    Ok(())
}
