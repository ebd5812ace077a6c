//! Balanced ordered set.
//!
//! This module provides [`OrderedSet`], an AVL tree keyed by a pluggable
//! total order:
//!
//! - O(log n) insert, remove, and lookup, even for sorted insert orders
//! - In-order iteration without recursion (explicit stack)
//! - Membership decided by the order alone: two values that compare
//!   `Equal` are the same element
//!
//! # Example
//!
//! ```rust
//! use book_exchange::set::OrderedSet;
//!
//! let mut set = OrderedSet::new();
//! assert!(set.insert(10));
//! assert!(set.insert(5));
//! assert!(!set.insert(10)); // duplicate by order
//!
//! assert!(set.remove(&5));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![10]);
//! ```

use std::cmp::Ordering;

mod iter;
mod tree;

pub use iter::Iter;
pub use tree::OrderedSet;

/// A total order over `T`
///
/// Implementations must be consistent (antisymmetric and transitive); the
/// tree's shape depends on it. A comparator that panics on incomparable
/// values is acceptable, since that is a caller bug.
pub trait Comparator<T: ?Sized> {
    /// Compare two values
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}
