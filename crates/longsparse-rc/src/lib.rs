//! Row-compressed sparse matrix of 64-bit integers
//!
//! [`SparseRcLongMatrix`] keeps its nonzeros in the compressed-row layout and
//! provides:
//!
//! - **Point access**: binary search within a row, structural insert/remove
//!   on `set_quick`
//! - **Bulk assignment**: scalar, unary operator, copy from any matrix, and
//!   elementwise combine with a second operand
//! - **Products**: matrix-vector and matrix-matrix, with optional transpose
//!   and `alpha`/`beta` scaling
//!
//! Bulk kernels are split into row blocks when the matrix's execution engine
//! asks for it. Partitioned and serial runs give bit-identical results.
//!
//! # Example
//!
//! ```rust
//! use longsparse_core::{DenseLongVector, LongFunction, LongMatrix1D};
//! use longsparse_rc::SparseRcLongMatrix;
//!
//! let mut m = SparseRcLongMatrix::new(3, 3);
//! m.set_quick(0, 0, 5);
//! m.set_quick(1, 2, 7);
//! m.set_quick(2, 1, 3);
//! m.assign_fn(&LongFunction::mult(2));
//!
//! let z = m.mult(&DenseLongVector::from(vec![1, 1, 1])).unwrap();
//! assert_eq!(z.to_vec(), vec![10, 14, 6]);
//! ```

pub mod rc_matrix;

pub use rc_matrix::SparseRcLongMatrix;

// Re-export from longsparse-core
pub use longsparse_core::{Error, Result};
