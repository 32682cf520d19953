//! Array-backed binary min-heap.
//!
//! # Layout
//! Element `i` has children `2i + 1` and `2i + 2` and parent `(i - 1) / 2`.
//! For every stored parent/child pair, `compare(parent, child) != Greater`.
//!
//! # Complexity
//! | Operation | Cost |
//! |-----------|------|
//! | `insert` | O(log n), O(1) amortized growth |
//! | `extract_min` | O(log n) |
//! | `peek`, `len` | O(1) |
//! | `merge` | O(m log(n + m)) |

use std::cmp::Ordering;
use std::collections::TryReserveError;

use log::{trace, warn};

use super::{Comparator, HeapError, HeapResult, NaturalOrder};

/// A binary min-heap keyed by a [`Comparator`].
///
/// Elements are owned by the heap: they are moved in by [`insert`](Self::insert)
/// and moved out by [`extract_min`](Self::extract_min).
///
/// # Example
///
/// ```
/// use u_fairshare::heap::MinHeap;
///
/// let mut heap: MinHeap<&str, _> = MinHeap::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// heap.insert("three").unwrap();
/// heap.insert("a").unwrap();
/// heap.insert("to").unwrap();
///
/// assert_eq!(heap.extract_min(), Some("a"));
/// assert_eq!(heap.peek(), Some(&"to"));
/// assert_eq!(heap.len(), 2);
/// ```
#[derive(Debug)]
pub struct MinHeap<T, C = NaturalOrder> {
    data: Vec<T>,
    capacity: usize,
    compare: C,
    #[cfg(test)]
    growth_ceiling: Option<usize>,
}

impl<T: Clone, C: Clone> Clone for MinHeap<T, C> {
    /// Clones with storage reserved for the full logical capacity, so the
    /// clone grows through the same fallible path as the original.
    fn clone(&self) -> Self {
        let mut data = Vec::with_capacity(self.capacity);
        data.extend_from_slice(&self.data);
        Self {
            data,
            capacity: self.capacity,
            compare: self.compare.clone(),
            #[cfg(test)]
            growth_ceiling: self.growth_ceiling,
        }
    }
}

impl<T: Ord> MinHeap<T, NaturalOrder> {
    /// Creates an empty heap ordered by `Ord` with zero capacity.
    pub fn natural() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<T, C: Comparator<T>> MinHeap<T, C> {
    /// Creates an empty heap with zero capacity.
    ///
    /// The first insert grows the capacity to 1.
    pub fn new(compare: C) -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
            compare,
            #[cfg(test)]
            growth_ceiling: None,
        }
    }

    /// Creates an empty heap with room for `capacity` elements.
    ///
    /// # Errors
    /// [`HeapError::AllocationFailure`] if the storage cannot be reserved.
    pub fn with_capacity(capacity: usize, compare: C) -> HeapResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        Ok(Self {
            data,
            capacity,
            compare,
            #[cfg(test)]
            growth_ceiling: None,
        })
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the heap holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current slot count. Never shrinks on insert.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The ordering function this heap was built with.
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Adds an element, growing storage when full.
    ///
    /// # Errors
    /// [`HeapError::AllocationFailure`] if growth fails. The heap is left
    /// unchanged and `value` is dropped.
    pub fn insert(&mut self, value: T) -> HeapResult<()> {
        self.reserve_for(self.data.len().saturating_add(1))?;
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
        self.debug_check();
        Ok(())
    }

    /// Removes and returns the minimum element, or `None` if empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.swap_remove(0);
        self.sift_down(0);
        self.debug_check();
        Some(min)
    }

    /// Returns the minimum element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Iterates over the stored elements in storage order (not sorted).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Removes every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Consumes the heap, returning its elements in storage order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Inserts a copy of every element of `other` into `self`.
    ///
    /// `other` is walked from its last slot to its first and is not modified.
    /// Each element is cloned before insertion, so nothing in `self` refers
    /// to `other`'s storage afterwards.
    ///
    /// # Errors
    /// - [`HeapError::IncompatibleMerge`] if the comparators differ. Nothing
    ///   is inserted.
    /// - [`HeapError::AllocationFailure`] if `self` cannot grow to hold both
    ///   heaps. Room is reserved before anything is inserted, so `self` is
    ///   left unchanged.
    pub fn merge(&mut self, other: &MinHeap<T, C>) -> HeapResult<()>
    where
        T: Clone,
        C: PartialEq,
    {
        if self.compare != other.compare {
            warn!("heap merge rejected: comparators differ");
            return Err(HeapError::IncompatibleMerge);
        }
        self.reserve_for(self.data.len().saturating_add(other.data.len()))?;
        for value in other.data.iter().rev() {
            self.insert(value.clone())?;
        }
        Ok(())
    }

    /// Makes room for `needed` elements, doubling the logical capacity
    /// (0 becomes 1) until it fits. Nothing changes on failure.
    fn reserve_for(&mut self, needed: usize) -> HeapResult<()> {
        let mut target = self.capacity;
        while target < needed {
            target = if target == 0 {
                1
            } else {
                target.saturating_mul(2)
            };
        }

        if self.data.capacity() < target {
            if let Err(e) = self.try_reserve(target) {
                warn!("heap growth {} -> {} failed: {}", self.capacity, target, e);
                return Err(e.into());
            }
        }
        if target != self.capacity {
            trace!("heap grew {} -> {}", self.capacity, target);
            self.capacity = target;
        }
        Ok(())
    }

    fn try_reserve(&mut self, target: usize) -> Result<(), TryReserveError> {
        if self.above_growth_ceiling(target) {
            return Vec::<u8>::new().try_reserve(usize::MAX);
        }
        self.data.try_reserve_exact(target - self.data.len())
    }

    #[cfg(not(test))]
    #[inline(always)]
    fn above_growth_ceiling(&self, _target: usize) -> bool {
        false
    }

    #[cfg(test)]
    fn above_growth_ceiling(&self, target: usize) -> bool {
        self.growth_ceiling.is_some_and(|ceiling| target > ceiling)
    }

    /// Makes every reservation above `ceiling` slots fail.
    #[cfg(test)]
    pub(crate) fn set_growth_ceiling(&mut self, ceiling: Option<usize>) {
        self.growth_ceiling = ceiling;
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.compare.compare(&self.data[a], &self.data[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let size = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < size && self.less(left, index) {
                smallest = left;
            }
            // Right wins only when strictly below both current and left.
            if right < size && self.less(right, index) && self.less(right, left) {
                smallest = right;
            }

            if smallest == index {
                break;
            }
            self.data.swap(index, smallest);
            index = smallest;
        }
    }

    fn debug_check(&self) {
        debug_assert!(self.is_heap_ordered(), "min-heap order violated");
        debug_assert!(self.data.len() <= self.capacity);
    }

    fn is_heap_ordered(&self) -> bool {
        (1..self.data.len()).all(|i| !self.less(i, (i - 1) / 2))
    }
}

impl<T, C: Comparator<T> + Default> Default for MinHeap<T, C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
