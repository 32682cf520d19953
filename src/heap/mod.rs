//! Generic binary min-heap.
//!
//! An array-backed priority queue ordered by a caller-supplied comparator.
//! The heap is the sole ordering authority for the scheduler; it knows
//! nothing about processes.
//!
//! # Growth
//!
//! Capacity is tracked explicitly and doubles when an insert finds the heap
//! full (0 → 1 → 2 → 4 ...). Growth uses fallible allocation, so an insert
//! that cannot grow reports [`HeapError::AllocationFailure`] and leaves the
//! heap exactly as it was.
//!
//! # Tie Policy
//!
//! Sift operations swap only on a strictly smaller comparison. Equal keys are
//! never reordered against each other, so their relative order is arbitrary
//! but fully determined by the insertion sequence.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 6 (Heapsort)

mod comparator;
mod min_heap;

pub use comparator::{Comparator, NaturalOrder};
pub use min_heap::MinHeap;

use std::collections::TryReserveError;
use thiserror::Error;

/// Heap operation errors.
///
/// An empty heap is not an error: `extract_min` and `peek` return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// Backing storage could not be obtained or grown.
    #[error("heap allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),
    /// The two heaps use different ordering functions.
    #[error("cannot merge heaps with different comparators")]
    IncompatibleMerge,
}

/// Heap operation result.
pub type HeapResult<T> = Result<T, HeapError>;
