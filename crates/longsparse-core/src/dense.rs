//! Dense operands
//!
//! A dense operand is a flat element buffer plus a base offset and fixed
//! strides: logical element `i` of a vector lives at `zero + i * stride`,
//! cell `(r, c)` of a matrix at `zero + r * row_stride + c * column_stride`.
//! The sparse product kernels read and write these buffers directly.

use std::any::Any;

use crate::matrix::{rectangular_shape, LongMatrix1D, LongMatrix2D};
use crate::{Error, Result};

/// Dense vector of `i64`
#[derive(Clone, Debug)]
pub struct DenseLongVector {
    elements: Vec<i64>,
    size: usize,
    zero: usize,
    stride: usize,
}

impl DenseLongVector {
    /// Vector of `size` zeros
    pub fn new(size: usize) -> Self {
        Self {
            elements: vec![0; size],
            size,
            zero: 0,
            stride: 1,
        }
    }

    /// Strided view over an existing buffer.
    ///
    /// Fails if the last logical element would fall outside `elements`.
    pub fn from_parts(elements: Vec<i64>, size: usize, zero: usize, stride: usize) -> Result<Self> {
        if size > 0 {
            let last = (size - 1)
                .checked_mul(stride)
                .and_then(|off| off.checked_add(zero));
            match last {
                Some(last) if last < elements.len() => {}
                _ => {
                    return Err(Error::InvalidParameter(format!(
                        "{size} elements with zero {zero} and stride {stride} do not fit a buffer of {}",
                        elements.len()
                    )))
                }
            }
        }
        Ok(Self {
            elements,
            size,
            zero,
            stride,
        })
    }

    /// Offset of logical element `rank` in the element buffer
    #[inline]
    pub fn index(&self, rank: usize) -> usize {
        self.zero + rank * self.stride
    }

    pub fn elements(&self) -> &[i64] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [i64] {
        &mut self.elements
    }

    pub fn zero(&self) -> usize {
        self.zero
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Multiply every logical element by `beta`
    pub fn scale(&mut self, beta: i64) {
        for rank in 0..self.size {
            let idx = self.index(rank);
            self.elements[idx] = self.elements[idx].wrapping_mul(beta);
        }
    }
}

impl From<Vec<i64>> for DenseLongVector {
    fn from(elements: Vec<i64>) -> Self {
        let size = elements.len();
        Self {
            elements,
            size,
            zero: 0,
            stride: 1,
        }
    }
}

impl PartialEq for DenseLongVector {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && (0..self.size).all(|i| self.get_quick(i) == other.get_quick(i))
    }
}

impl LongMatrix1D for DenseLongVector {
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn get_quick(&self, index: usize) -> i64 {
        self.elements[self.index(index)]
    }

    #[inline]
    fn set_quick(&mut self, index: usize, value: i64) {
        let idx = self.index(index);
        self.elements[idx] = value;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Dense matrix of `i64`
#[derive(Clone, Debug)]
pub struct DenseLongMatrix {
    elements: Vec<i64>,
    rows: usize,
    columns: usize,
    zero: usize,
    row_stride: usize,
    column_stride: usize,
}

impl DenseLongMatrix {
    /// Row-major matrix of zeros
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            elements: vec![0; rows * columns],
            rows,
            columns,
            zero: 0,
            row_stride: columns,
            column_stride: 1,
        }
    }

    /// Copy a rectangular nested literal
    pub fn from_rows(values: &[Vec<i64>]) -> Result<Self> {
        let (rows, columns) = rectangular_shape(values)?;
        let elements = values.iter().flatten().copied().collect();
        Ok(Self {
            elements,
            rows,
            columns,
            zero: 0,
            row_stride: columns,
            column_stride: 1,
        })
    }

    /// Offset of cell `(row, column)` in the element buffer
    #[inline]
    pub fn index(&self, row: usize, column: usize) -> usize {
        self.zero + row * self.row_stride + column * self.column_stride
    }

    pub fn elements(&self) -> &[i64] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [i64] {
        &mut self.elements
    }

    pub fn zero(&self) -> usize {
        self.zero
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn column_stride(&self) -> usize {
        self.column_stride
    }

    /// Transpose without copying by swapping the strides
    pub fn view_dice(mut self) -> Self {
        std::mem::swap(&mut self.rows, &mut self.columns);
        std::mem::swap(&mut self.row_stride, &mut self.column_stride);
        self
    }

    /// Multiply every cell by `beta`
    pub fn scale(&mut self, beta: i64) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let idx = self.index(row, column);
                self.elements[idx] = self.elements[idx].wrapping_mul(beta);
            }
        }
    }
}

impl PartialEq for DenseLongMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && (0..self.rows).all(|r| {
                (0..self.columns).all(|c| self.get_quick(r, c) == other.get_quick(r, c))
            })
    }
}

impl LongMatrix2D for DenseLongMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn get_quick(&self, row: usize, column: usize) -> i64 {
        self.elements[self.index(row, column)]
    }

    #[inline]
    fn set_quick(&mut self, row: usize, column: usize, value: i64) {
        let idx = self.index(row, column);
        self.elements[idx] = value;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
