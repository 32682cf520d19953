//! Ordering functions for [`MinHeap`](super::MinHeap).

use std::cmp::Ordering;

/// A total preorder over `T`.
///
/// Returns [`Ordering::Less`] when `a` should leave the heap before `b`.
/// Any `Fn(&T, &T) -> Ordering` closure or function is a comparator.
///
/// Heaps can only be merged when their comparators compare equal, so
/// comparators meant for merging should be plain values deriving
/// `PartialEq` (unit structs or small config structs).
pub trait Comparator<T> {
    /// Compares two elements.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders elements by their [`Ord`] implementation (smallest first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
