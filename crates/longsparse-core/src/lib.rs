//! Core traits and types for sparse integer matrices
//!
//! This crate provides the pieces shared by the sparse storage crates:
//!
//! 1. **Matrix contracts** - [`LongMatrix1D`] / [`LongMatrix2D`] with
//!    cell-by-cell fallback kernels in [`generic`]
//! 2. **Dense operands** - strided element buffers consumed by the
//!    optimized products
//! 3. **Execution Engines** - the decision whether a bulk kernel is split
//!    into row partitions, and the worker pool that runs them
//! 4. **Operators** - the closed set of algebraic shapes bulk kernels
//!    recognise, plus an opaque escape hatch
//!
//! # Example
//!
//! ```rust
//! use longsparse_core::{
//!     execution::{sequential, ExecutionEngine},
//!     DenseLongVector, LongMatrix1D,
//! };
//!
//! let engine = sequential();
//! assert_eq!(engine.partition_count(1 << 20, 64), None);
//!
//! let v = DenseLongVector::from(vec![1, 0, 3]);
//! assert_eq!(v.cardinality(), 2);
//! ```

pub mod dense;
pub mod error;
pub mod execution;
pub mod function;
pub mod generic;
pub mod matrix;

// Re-export core types
pub use error::{Error, Result};

pub use execution::{
    sequential, split_ranges, split_slice_mut, ExecutionConfig, ExecutionEngine, ExecutionMode,
    ExecutionStrategy, SequentialEngine, DEFAULT_THRESHOLD_2D,
};
#[cfg(feature = "parallel")]
pub use execution::{parallel, ParallelEngine};

pub use dense::{DenseLongMatrix, DenseLongVector};
pub use function::{LongFunction, LongLongFunction};
pub use matrix::{rectangular_shape, LongMatrix1D, LongMatrix2D};
