//! Title-indexed inventory.
//!
//! Two structures hold every listing:
//!
//! - a shelf ([`OrderedSet`]) giving the sorted presentation view
//! - a title index (`FxHashMap<title key, VecDeque<Listing>>`) giving FIFO
//!   lookup by case-folded title
//!
//! All mutations go through [`Inventory`], which updates both before
//! returning.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use crate::set::{Comparator, OrderedSet};
use crate::types::{fold_title, Item};

/// Per-inventory listing sequence number
///
/// Assigned by [`Inventory::add_item`]; orders same-title listings by
/// arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListingId(u64);

impl ListingId {
    /// Raw sequence value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// An item on the shelf. Both structures share the same allocation.
#[derive(Debug, Clone)]
struct Listing {
    id: ListingId,
    key: Arc<str>,
    item: Arc<Item>,
}

/// Shelf order: case-insensitive title, then listing id
///
/// Folded keys compare byte-wise in the same order as a char-wise
/// lower-case comparison, so the precomputed key is used directly.
#[derive(Debug, Default, Clone, Copy)]
struct ShelfOrder;

impl Comparator<Listing> for ShelfOrder {
    fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        a.key.cmp(&b.key).then(a.id.cmp(&b.id))
    }
}

/// Books currently available for matching.
///
/// # Same-title listings
///
/// Listings with the same title coexist: the shelf orders them by arrival,
/// and [`take_by_title`](Self::take_by_title) dispenses the oldest first.
///
/// # Thread Safety
///
/// Not internally synchronized. [`Exchange`](crate::Exchange) holds it
/// behind a single `parking_lot::Mutex`.
#[derive(Clone, Default)]
pub struct Inventory {
    shelf: OrderedSet<Listing, ShelfOrder>,
    by_title: FxHashMap<Arc<str>, VecDeque<Listing>>,
    next_id: u64,
}

impl Inventory {
    /// Create an empty inventory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List an item
    ///
    /// It goes to the back of its title's FIFO queue.
    pub fn add_item(&mut self, item: Item) -> ListingId {
        let id = ListingId(self.next_id);
        self.next_id += 1;

        let key: Arc<str> = Arc::from(item.title_key());
        let listing = Listing {
            id,
            key: Arc::clone(&key),
            item: Arc::new(item),
        };

        let shelved = self.shelf.insert(listing.clone());
        debug_assert!(shelved, "listing ids are unique");
        self.by_title.entry(key).or_default().push_back(listing);

        self.debug_check();
        id
    }

    /// Remove and return the oldest listing of `title` (ignoring case)
    ///
    /// Returns `None` without touching anything if no listing matches.
    pub fn take_by_title(&mut self, title: &str) -> Option<Item> {
        let key = fold_title(title);
        let queue = self.by_title.get_mut(key.as_str())?;
        let listing = queue.pop_front()?;
        if queue.is_empty() {
            self.by_title.remove(key.as_str());
        }

        Some(self.unshelve(listing))
    }

    /// Remove the oldest listing structurally equal to `item`
    ///
    /// Equality is title ignoring case, course code, and seller. Returns
    /// `false` without touching anything if no listing matches.
    pub fn remove_exact(&mut self, item: &Item) -> bool {
        let key = item.title_key();
        let Some(queue) = self.by_title.get_mut(key.as_str()) else {
            return false;
        };
        let Some(pos) = queue.iter().position(|l| *l.item == *item) else {
            return false;
        };
        let Some(listing) = queue.remove(pos) else {
            return false;
        };
        if queue.is_empty() {
            self.by_title.remove(key.as_str());
        }

        self.unshelve(listing);
        true
    }

    fn unshelve(&mut self, listing: Listing) -> Item {
        let removed = self.shelf.remove(&listing);
        debug_assert!(removed, "title index and shelf diverged");
        self.debug_check();

        // The shelf copy is gone, so the index copy is the last owner.
        Arc::try_unwrap(listing.item).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Items in ascending title order (ignoring case), same titles by arrival
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Item> + '_ {
        self.shelf.iter().map(|l| l.item.as_ref())
    }

    /// Owned copy of [`list`](Self::list)
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.list().cloned().collect()
    }

    /// Number of listings
    #[must_use]
    pub fn len(&self) -> usize {
        self.shelf.len()
    }

    /// Check if nothing is listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shelf.is_empty()
    }

    /// Number of listings under `title` (ignoring case)
    #[must_use]
    pub fn count_title(&self, title: &str) -> usize {
        self.by_title
            .get(fold_title(title).as_str())
            .map_or(0, VecDeque::len)
    }

    /// Items whose title or course code contains `query` (ignoring case)
    ///
    /// Results are in [`list`](Self::list) order. An empty query matches
    /// everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Item> {
        let needle = fold_title(query.trim());
        self.shelf
            .iter()
            .filter(|l| {
                l.key.contains(needle.as_str())
                    || fold_title(l.item.course_code()).contains(needle.as_str())
            })
            .map(|l| l.item.as_ref())
            .collect()
    }

    /// Verify that the shelf and the title index hold exactly the same listings
    ///
    /// Every public mutation preserves this; it is exposed for audits and tests.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut shelved: Vec<ListingId> = self.shelf.iter().map(|l| l.id).collect();
        let mut indexed: Vec<ListingId> = Vec::with_capacity(shelved.len());
        for (key, queue) in &self.by_title {
            if queue.is_empty() {
                return false;
            }
            for listing in queue {
                if listing.key != *key {
                    return false;
                }
                indexed.push(listing.id);
            }
            // FIFO queues are in arrival order
            if queue.iter().zip(queue.iter().skip(1)).any(|(a, b)| a.id >= b.id) {
                return false;
            }
        }
        shelved.sort_unstable();
        indexed.sort_unstable();
        shelved == indexed
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert_eq!(
            self.shelf.len(),
            self.by_title.values().map(VecDeque::len).sum::<usize>(),
            "title index and shelf diverged"
        );
    }
}

impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("len", &self.len())
            .field("titles", &self.by_title.len())
            .finish()
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.list())
    }
}

impl Extend<Item> for Inventory {
    fn extend<I: IntoIterator<Item = Item>>(&mut self, iter: I) {
        for item in iter {
            self.add_item(item);
        }
    }
}

impl FromIterator<Item> for Inventory {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut inventory = Self::new();
        inventory.extend(iter);
        inventory
    }
}
