//! Hash-backed sparse integer vectors and selection views
//!
//! [`SparseLongVector`] stores its nonzeros in a shared concurrent map.
//! [`SelectedSparseLongVector`] reads and writes a chosen subset of those
//! cells through an offset table, without copying anything.
//!
//! # Example
//!
//! ```rust
//! use longsparse_core::LongMatrix1D;
//! use longsparse_hashed::SparseLongVector;
//!
//! let v = SparseLongVector::from_values(&[10, 0, 0, 0, 0, 20, 0, 0, 0, 30]);
//! let mut view = v.view_selection(Some(&[9, 0, 5])).unwrap();
//! assert_eq!(view.to_vec(), vec![30, 10, 20]);
//!
//! view.set_quick(1, 0);
//! assert_eq!(v.cardinality(), 2);
//! ```

pub mod selected;
pub mod vector;

pub use selected::SelectedSparseLongVector;
pub use vector::{HashedStorage, SparseLongVector};

// Re-export from longsparse-core
pub use longsparse_core::{Error, Result};
