//! AVL tree backing [`OrderedSet`].
//!
//! Children are owned slots (`Option<Box<Node>>`) with no parent pointers.
//! Insert and remove recurse down the search path and rebalance on the
//! way back up, so recursion depth is bounded by the tree height, which
//! the AVL invariant keeps below ~1.44 log2(n).

use std::cmp::Ordering;
use std::fmt;

use super::iter::Iter;
use super::{Comparator, NaturalOrder};

type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(super) value: T,
    pub(super) left: Link<T>,
    pub(super) right: Link<T>,
    height: u8,
}

impl<T> Node<T> {
    fn leaf(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn height<T>(link: &Link<T>) -> u8 {
    link.as_ref().map_or(0, |n| n.height)
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restore |balance| <= 1 at `node`, assuming both subtrees are AVL trees
fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // Left-right case
        if node.left.as_ref().map_or(0, |l| l.balance_factor()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // Right-left case
        if node.right.as_ref().map_or(0, |r| r.balance_factor()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn insert_at<T, C: Comparator<T>>(link: Link<T>, value: T, cmp: &C) -> (Box<Node<T>>, bool) {
    let Some(mut node) = link else {
        return (Node::leaf(value), true);
    };

    let inserted = match cmp.compare(&value, &node.value) {
        Ordering::Less => {
            let (child, inserted) = insert_at(node.left.take(), value, cmp);
            node.left = Some(child);
            inserted
        }
        Ordering::Greater => {
            let (child, inserted) = insert_at(node.right.take(), value, cmp);
            node.right = Some(child);
            inserted
        }
        Ordering::Equal => return (node, false),
    };

    if inserted {
        (rebalance(node), true)
    } else {
        (node, false)
    }
}

fn remove_at<T, C: Comparator<T>>(link: Link<T>, probe: &T, cmp: &C) -> (Link<T>, Option<T>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match cmp.compare(probe, &node.value) {
        Ordering::Less => {
            let (child, removed) = remove_at(node.left.take(), probe, cmp);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove_at(node.right.take(), probe, cmp);
            node.right = child;
            removed
        }
        Ordering::Equal => {
            let Node {
                value, left, right, ..
            } = *node;
            let replacement = match (left, right) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    // Successor takes this slot; it is unlinked from the
                    // right subtree in the same descent.
                    let (right, successor) = take_min(right);
                    let mut heir = Node::leaf(successor);
                    heir.left = Some(left);
                    heir.right = right;
                    Some(rebalance(heir))
                }
            };
            return (replacement, Some(value));
        }
    };

    match removed {
        Some(value) => (Some(rebalance(node)), Some(value)),
        None => (Some(node), None),
    }
}

fn take_min<T>(mut node: Box<Node<T>>) -> (Link<T>, T) {
    match node.left.take() {
        None => {
            let Node { value, right, .. } = *node;
            (right, value)
        }
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            (Some(rebalance(node)), min)
        }
    }
}

/// Sorted set backed by an AVL tree.
///
/// Elements are kept in ascending order of the comparator `C`. Two elements
/// that compare `Equal` are considered the same element: inserting the
/// second one is rejected, and removing with either one as the probe
/// removes the stored element.
///
/// # Thread Safety
///
/// This struct is `Send + Sync` when `T` and `C` are, but not internally
/// synchronized. For concurrent access, wrap in `parking_lot::Mutex`.
#[derive(Clone)]
pub struct OrderedSet<T, C = NaturalOrder> {
    root: Link<T>,
    len: usize,
    cmp: C,
}

impl<T: Ord> OrderedSet<T, NaturalOrder> {
    /// Create an empty set ordered by `T`'s `Ord`
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> OrderedSet<T, C> {
    /// Create an empty set ordered by `cmp`
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the set has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty)
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(height(&self.root))
    }

    /// Ascending iterator over the elements
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.len, self.height())
    }

    /// Smallest element
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Largest element
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// The comparator in use
    pub fn comparator(&self) -> &C {
        &self.cmp
    }
}

impl<T, C: Comparator<T>> OrderedSet<T, C> {
    /// Insert `value` unless an order-equal element is already present
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert(&mut self, value: T) -> bool {
        let (root, inserted) = insert_at(self.root.take(), value, &self.cmp);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Remove the element order-equal to `probe`
    ///
    /// Returns `true` if an element was removed.
    pub fn remove(&mut self, probe: &T) -> bool {
        self.take(probe).is_some()
    }

    /// Remove and return the element order-equal to `probe`
    pub fn take(&mut self, probe: &T) -> Option<T> {
        let (root, removed) = remove_at(self.root.take(), probe, &self.cmp);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Look up the stored element order-equal to `probe`
    #[must_use]
    pub fn get(&self, probe: &T) -> Option<&T> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match self.cmp.compare(probe, &n.value) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return Some(&n.value),
            };
        }
        None
    }

    /// Check whether an order-equal element is present
    #[must_use]
    pub fn contains(&self, probe: &T) -> bool {
        self.get(probe).is_some()
    }
}

impl<T, C: Default> Default for OrderedSet<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Comparator<T>> Extend<T> for OrderedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for OrderedSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}
