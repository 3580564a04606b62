//! Index-selected view over a hashed vector
//!
//! Logical cell `rank` of the view lives under the physical key
//!
//! ```text
//! offset + offsets[zero + rank * stride]
//! ```
//!
//! `zero` and `stride` let the view be cut, flipped and strided without
//! touching the offsets; `offsets` never changes after construction.

use std::any::Any;
use std::sync::Arc;

use longsparse_core::{Error, LongMatrix1D, LongMatrix2D, Result};

use crate::vector::{check_indexes, storage_of, write_cell, HashedStorage, SparseLongVector};

/// Read/write view of selected cells of a hashed vector.
///
/// The view shares the backing map of the vector it was built from.
/// Exposing the map or reshaping the view is not supported.
#[derive(Clone, Debug)]
pub struct SelectedSparseLongVector {
    elements: HashedStorage,
    offsets: Arc<[usize]>,
    offset: usize,
    size: usize,
    zero: isize,
    stride: isize,
}

impl SelectedSparseLongVector {
    /// View of the keys `offset + offsets[i]`, in order
    pub fn new(elements: HashedStorage, offsets: Arc<[usize]>, offset: usize) -> Self {
        Self {
            size: offsets.len(),
            elements,
            offsets,
            offset,
            zero: 0,
            stride: 1,
        }
    }

    /// Physical key of logical cell `rank`
    #[inline]
    pub fn index(&self, rank: usize) -> usize {
        let position = self.zero + rank as isize * self.stride;
        self.offset + self.offsets[position as usize]
    }

    pub(crate) fn storage(&self) -> &HashedStorage {
        &self.elements
    }

    /// Always fails: the backing map is not exposed through a selection
    pub fn elements(&self) -> Result<&HashedStorage> {
        Err(Error::UnsupportedOperation(
            "elements of a selection view".to_string(),
        ))
    }

    /// New independent hashed vector of `size` cells
    pub fn like(&self, size: usize) -> SparseLongVector {
        SparseLongVector::new(size)
    }

    /// View of this view's cells at `indexes`; `None` selects every cell.
    ///
    /// The physical keys are resolved now, so the new view does not depend
    /// on this one.
    pub fn view_selection(&self, indexes: Option<&[usize]>) -> Result<Self> {
        let offsets: Vec<usize> = match indexes {
            Some(indexes) => {
                check_indexes(indexes, self.size)?;
                indexes.iter().map(|&rank| self.index(rank)).collect()
            }
            None => (0..self.size).map(|rank| self.index(rank)).collect(),
        };
        Ok(Self::new(Arc::clone(&self.elements), offsets.into(), 0))
    }

    /// Cells `index..index + width` of this view
    pub fn view_part(&self, index: usize, width: usize) -> Result<Self> {
        match index.checked_add(width) {
            Some(end) if end <= self.size => {}
            _ => {
                return Err(Error::InvalidParameter(format!(
                    "part {index}..{index}+{width} out of range for size {}",
                    self.size
                )))
            }
        }
        let mut view = self.clone();
        view.zero += self.stride * index as isize;
        view.size = width;
        Ok(view)
    }

    /// Cells in reverse order
    pub fn view_flip(&self) -> Self {
        let mut view = self.clone();
        if view.size > 0 {
            view.zero += (view.size as isize - 1) * view.stride;
            view.stride = -view.stride;
        }
        view
    }

    /// Every `stride`-th cell, starting with the first
    pub fn view_strides(&self, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(Error::InvalidParameter(
                "stride must be positive".to_string(),
            ));
        }
        let mut view = self.clone();
        view.stride *= stride as isize;
        if view.size != 0 {
            view.size = (view.size - 1) / stride + 1;
        }
        Ok(view)
    }

    /// Always fails: a selection cannot be reshaped
    pub fn reshape_2d(&self, rows: usize, columns: usize) -> Result<Box<dyn LongMatrix2D>> {
        Err(Error::UnsupportedOperation(format!(
            "reshape of a selection view to {rows} x {columns}"
        )))
    }

    /// Always fails: a selection cannot be reshaped
    pub fn reshape_3d(
        &self,
        slices: usize,
        rows: usize,
        columns: usize,
    ) -> Result<Vec<Box<dyn LongMatrix2D>>> {
        Err(Error::UnsupportedOperation(format!(
            "reshape of a selection view to {slices} x {rows} x {columns}"
        )))
    }

    /// Whether `other` reads and writes the same backing map
    pub fn shares_storage_with(&self, other: &dyn LongMatrix1D) -> bool {
        storage_of(other).is_some_and(|storage| Arc::ptr_eq(&self.elements, storage))
    }
}

impl LongMatrix1D for SelectedSparseLongVector {
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn get_quick(&self, rank: usize) -> i64 {
        self.elements
            .get(&self.index(rank))
            .map_or(0, |value| *value)
    }

    #[inline]
    fn set_quick(&mut self, rank: usize, value: i64) {
        write_cell(&self.elements, self.index(rank), value);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keys {0: 10, 5: 20, 9: 30} in a vector of 10 cells
    fn base() -> SparseLongVector {
        let mut v = SparseLongVector::new(10);
        v.set_quick(0, 10);
        v.set_quick(5, 20);
        v.set_quick(9, 30);
        v
    }

    #[test]
    fn test_selection_reads_through_offsets() {
        let v = base();
        let view = v.view_selection(Some(&[9, 0, 5])).unwrap();
        assert_eq!(view.get_quick(0), 30);
        assert_eq!(view.get_quick(1), 10);
        assert_eq!(view.get_quick(2), 20);
        assert_eq!(view.index(2), 5);
    }

    #[test]
    fn test_zero_write_removes_shared_key() {
        let v = base();
        let mut view = v.view_selection(Some(&[9, 0, 5])).unwrap();
        let other = v.view_selection(Some(&[0, 1])).unwrap();

        view.set_quick(1, 0);
        assert!(!v.elements().contains_key(&0));
        assert_eq!(other.get_quick(0), 0);
        assert_eq!(v.cardinality(), 2);

        view.set_quick(1, 4);
        assert_eq!(other.get_quick(0), 4);
    }

    #[test]
    fn test_offset_shifts_keys() {
        let v = base();
        let offsets: Arc<[usize]> = vec![0, 4].into();
        let view = SelectedSparseLongVector::new(Arc::clone(v.elements()), offsets, 5);
        assert_eq!(view.to_vec(), vec![20, 30]);
    }

    #[test]
    fn test_shares_storage() {
        let v = base();
        let a = v.view_selection(Some(&[1, 2])).unwrap();
        let b = a.view_selection(None).unwrap();
        assert!(a.shares_storage_with(&b));
        assert!(a.shares_storage_with(&v));
        assert!(!a.shares_storage_with(&base()));
        assert!(!a.shares_storage_with(&a.like(3)));
        assert!(!a.shares_storage_with(&longsparse_core::DenseLongVector::new(2)));
    }

    #[test]
    fn test_nested_selection_composes() {
        let v = base();
        let outer = v.view_selection(Some(&[9, 0, 5])).unwrap();
        let inner = outer.view_selection(Some(&[2, 0])).unwrap();
        assert_eq!(inner.to_vec(), vec![20, 30]);
        assert!(matches!(
            outer.view_selection(Some(&[3])),
            Err(Error::IndexOutOfBounds { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_flip_part_and_strides() {
        let v = base();
        let view = v.view_selection(None).unwrap();

        let flipped = view.view_flip();
        assert_eq!(flipped.get_quick(0), 30);
        assert_eq!(flipped.get_quick(9), 10);
        assert_eq!(flipped.get_quick(4), 20);

        let part = view.view_part(4, 3).unwrap();
        assert_eq!(part.to_vec(), vec![0, 20, 0]);
        assert!(view.view_part(8, 3).is_err());

        let strided = view.view_strides(3).unwrap();
        assert_eq!(strided.size(), 4);
        assert_eq!(strided.to_vec(), vec![10, 0, 0, 30]);
        assert!(view.view_strides(0).is_err());

        // flipped then strided walks backwards from the last cell
        let back = flipped.view_strides(4).unwrap();
        assert_eq!(back.to_vec(), vec![30, 20, 0]);
    }

    #[test]
    fn test_unsupported_operations() {
        let view = base().view_selection(None).unwrap();
        assert!(matches!(
            view.elements(),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            view.reshape_2d(2, 5),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(matches!(
            view.reshape_3d(1, 2, 5),
            Err(Error::UnsupportedOperation(_))
        ));
    }
}
