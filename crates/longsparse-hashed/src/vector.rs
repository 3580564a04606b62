//! Hash-backed sparse vector

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use longsparse_core::{Error, LongMatrix1D, Result};

use crate::selected::SelectedSparseLongVector;

/// Shared backing store of hashed vectors: physical key to non-zero value
pub type HashedStorage = Arc<DashMap<usize, i64>>;

/// Sparse vector of `i64` keeping its nonzeros in a concurrent hash map.
///
/// Cell `i` is stored under key `i`. Zero cells are never stored. Views
/// created with [`view_selection`](Self::view_selection) share the map with
/// this vector; a write through any of them is visible through all.
///
/// Single cell reads and writes are synchronized by the map. Sequences such
/// as read-modify-write are not atomic: keep one writer at a time.
///
/// `clone` shares the storage as well; [`copy`](Self::copy) does not.
#[derive(Clone, Debug)]
pub struct SparseLongVector {
    size: usize,
    elements: HashedStorage,
}

impl SparseLongVector {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            elements: Arc::new(DashMap::new()),
        }
    }

    /// Vector holding the non-zero cells of `values`
    pub fn from_values(values: &[i64]) -> Self {
        let vector = Self::new(values.len());
        for (index, &value) in values.iter().enumerate() {
            if value != 0 {
                vector.elements.insert(index, value);
            }
        }
        vector
    }

    /// Independent vector with the same cells
    pub fn copy(&self) -> Self {
        let elements = DashMap::with_capacity(self.elements.len());
        for entry in self.elements.iter() {
            elements.insert(*entry.key(), *entry.value());
        }
        Self {
            size: self.size,
            elements: Arc::new(elements),
        }
    }

    /// The backing map
    pub fn elements(&self) -> &HashedStorage {
        &self.elements
    }

    /// View of the cells at `indexes`, in that order; `None` selects every
    /// cell.
    ///
    /// The view shares this vector's storage.
    pub fn view_selection(&self, indexes: Option<&[usize]>) -> Result<SelectedSparseLongVector> {
        let offsets: Vec<usize> = match indexes {
            Some(indexes) => {
                check_indexes(indexes, self.size)?;
                indexes.to_vec()
            }
            None => (0..self.size).collect(),
        };
        Ok(SelectedSparseLongVector::new(
            Arc::clone(&self.elements),
            offsets.into(),
            0,
        ))
    }

    /// Whether `other` reads and writes the same backing map
    pub fn shares_storage_with(&self, other: &dyn LongMatrix1D) -> bool {
        storage_of(other).is_some_and(|storage| Arc::ptr_eq(&self.elements, storage))
    }
}

impl LongMatrix1D for SparseLongVector {
    fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn get_quick(&self, index: usize) -> i64 {
        self.elements.get(&index).map_or(0, |value| *value)
    }

    #[inline]
    fn set_quick(&mut self, index: usize, value: i64) {
        write_cell(&self.elements, index, value);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn cardinality(&self) -> usize {
        self.elements.len()
    }
}

/// Store `value` under `key`, removing the key for zero
#[inline]
pub(crate) fn write_cell(elements: &DashMap<usize, i64>, key: usize, value: i64) {
    if value == 0 {
        elements.remove(&key);
    } else {
        elements.insert(key, value);
    }
}

pub(crate) fn check_indexes(indexes: &[usize], size: usize) -> Result<()> {
    match indexes.iter().find(|&&index| index >= size) {
        Some(&index) => Err(Error::IndexOutOfBounds { index, size }),
        None => Ok(()),
    }
}

/// Backing map of a hashed vector or of a view over one
pub(crate) fn storage_of(vector: &dyn LongMatrix1D) -> Option<&HashedStorage> {
    let any = vector.as_any();
    if let Some(v) = any.downcast_ref::<SparseLongVector>() {
        return Some(&v.elements);
    }
    any.downcast_ref::<SelectedSparseLongVector>()
        .map(SelectedSparseLongVector::storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_never_stored() {
        let mut v = SparseLongVector::new(10);
        v.set_quick(3, 4);
        v.set_quick(7, -1);
        assert_eq!(v.cardinality(), 2);

        v.set_quick(3, 0);
        v.set_quick(5, 0);
        assert_eq!(v.cardinality(), 1);
        assert!(!v.elements().contains_key(&3));
        assert_eq!(v.get_quick(3), 0);
        assert_eq!(v.get_quick(7), -1);
    }

    #[test]
    fn test_from_values() {
        let v = SparseLongVector::from_values(&[0, 2, 0, 3]);
        assert_eq!(v.size(), 4);
        assert_eq!(v.cardinality(), 2);
        assert_eq!(v.to_vec(), vec![0, 2, 0, 3]);
    }

    #[test]
    fn test_checked_access() {
        let mut v = SparseLongVector::new(3);
        assert!(matches!(
            v.set(3, 1),
            Err(Error::IndexOutOfBounds { index: 3, size: 3 })
        ));
        v.set(2, 9).unwrap();
        assert_eq!(v.get(2).unwrap(), 9);
    }

    #[test]
    fn test_clone_shares_storage() {
        let v = SparseLongVector::new(4);
        let mut w = v.clone();
        w.set_quick(1, 8);
        assert_eq!(v.get_quick(1), 8);
        assert!(v.shares_storage_with(&w));
        assert!(!v.shares_storage_with(&SparseLongVector::new(4)));

        let mut copy = v.copy();
        copy.set_quick(1, 0);
        assert_eq!(v.get_quick(1), 8);
        assert!(!v.shares_storage_with(&copy));
    }

    #[test]
    fn test_view_selection_checks_indexes() {
        let v = SparseLongVector::new(4);
        let err = v.view_selection(Some(&[0, 4])).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { index: 4, size: 4 }));

        let all = v.view_selection(None).unwrap();
        assert_eq!(all.size(), 4);
        assert!(v.shares_storage_with(&all));
    }
}
