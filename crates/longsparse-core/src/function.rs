//! Unary and binary operators on `i64` cells
//!
//! Bulk kernels recognise a handful of algebraic shapes and run a dedicated
//! loop for each of them. Everything else is an [`Opaque`](LongFunction::Opaque)
//! callback applied cell by cell.
//!
//! All arithmetic wraps on overflow, like a 64-bit two's-complement
//! accumulator, so serial and partitioned evaluation agree bit for bit.

use std::fmt;
use std::sync::Arc;

/// A function `x -> f(x)` on one cell
#[derive(Clone)]
pub enum LongFunction {
    /// `x -> alpha * x`
    Mult(i64),
    /// Any other function
    Opaque(Arc<dyn Fn(i64) -> i64 + Send + Sync>),
}

impl LongFunction {
    /// `x -> alpha * x`
    pub fn mult(alpha: i64) -> Self {
        Self::Mult(alpha)
    }

    /// Wrap an arbitrary function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        Self::Opaque(Arc::new(f))
    }

    #[inline]
    pub fn apply(&self, x: i64) -> i64 {
        match self {
            Self::Mult(alpha) => alpha.wrapping_mul(x),
            Self::Opaque(f) => f(x),
        }
    }
}

impl fmt::Debug for LongFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mult(alpha) => f.debug_tuple("Mult").field(alpha).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// A function `(x, y) -> f(x, y)` combining a cell with its counterpart in a
/// second operand
#[derive(Clone)]
pub enum LongLongFunction {
    /// `(x, y) -> x + alpha * y`
    PlusMultSecond(i64),
    /// `(x, y) -> alpha * x + y`
    PlusMultFirst(i64),
    /// `(x, y) -> x * y`
    Mult,
    /// `(x, y) -> x / y`
    Div,
    /// Any other function
    Opaque(Arc<dyn Fn(i64, i64) -> i64 + Send + Sync>),
}

impl LongLongFunction {
    /// `(x, y) -> x + alpha * y`
    pub fn plus_mult_second(alpha: i64) -> Self {
        Self::PlusMultSecond(alpha)
    }

    /// `(x, y) -> alpha * x + y`
    pub fn plus_mult_first(alpha: i64) -> Self {
        Self::PlusMultFirst(alpha)
    }

    /// `(x, y) -> x + y`
    pub fn plus() -> Self {
        Self::PlusMultSecond(1)
    }

    /// `(x, y) -> x - y`
    pub fn minus() -> Self {
        Self::PlusMultSecond(-1)
    }

    /// Wrap an arbitrary function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(i64, i64) -> i64 + Send + Sync + 'static,
    {
        Self::Opaque(Arc::new(f))
    }

    /// Apply to one pair of cells.
    ///
    /// # Panics
    /// `Div` panics on a zero divisor; kernels check divisors up front and
    /// report [`Error::DivisionByZero`](crate::Error::DivisionByZero) instead.
    #[inline]
    pub fn apply(&self, x: i64, y: i64) -> i64 {
        match self {
            Self::PlusMultSecond(alpha) => x.wrapping_add(alpha.wrapping_mul(y)),
            Self::PlusMultFirst(alpha) => alpha.wrapping_mul(x).wrapping_add(y),
            Self::Mult => x.wrapping_mul(y),
            Self::Div => x.wrapping_div(y),
            Self::Opaque(f) => f(x, y),
        }
    }
}

impl fmt::Debug for LongLongFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlusMultSecond(alpha) => f.debug_tuple("PlusMultSecond").field(alpha).finish(),
            Self::PlusMultFirst(alpha) => f.debug_tuple("PlusMultFirst").field(alpha).finish(),
            Self::Mult => f.write_str("Mult"),
            Self::Div => f.write_str("Div"),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}
