//! Sparse 64-bit integer matrices
//!
//! Facade over the workspace crates:
//!
//! - [`longsparse_core`]: matrix traits, dense operands, operators, execution engines
//! - [`longsparse_rc`]: the compressed-row matrix [`SparseRcLongMatrix`]
//! - [`longsparse_hashed`]: hashed vectors and their selection views
//!
//! # Example
//!
//! ```rust
//! use longsparse::prelude::*;
//!
//! let mut m = SparseRcLongMatrix::from_rows(&[vec![5, 0, 0], vec![0, 0, 7], vec![0, 3, 0]])?;
//! let other = SparseRcLongMatrix::from_rows(&[vec![1, 0, 0], vec![0, 0, 0], vec![0, 1, 0]])?;
//! m.assign_with(&other, &LongLongFunction::Mult)?;
//! assert_eq!(m.cardinality(), 2);
//! # Ok::<(), longsparse::Error>(())
//! ```

pub use longsparse_core;
pub use longsparse_hashed;
pub use longsparse_rc;

pub use longsparse_core::{Error, Result};
pub use longsparse_hashed::{SelectedSparseLongVector, SparseLongVector};
pub use longsparse_rc::SparseRcLongMatrix;

/// Common imports
pub mod prelude {
    pub use longsparse_core::{
        sequential, DenseLongMatrix, DenseLongVector, Error, ExecutionConfig, ExecutionEngine,
        LongFunction, LongLongFunction, LongMatrix1D, LongMatrix2D, Result, SequentialEngine,
    };
    #[cfg(feature = "parallel")]
    pub use longsparse_core::{parallel, ParallelEngine};
    pub use longsparse_hashed::{SelectedSparseLongVector, SparseLongVector};
    pub use longsparse_rc::SparseRcLongMatrix;
}
