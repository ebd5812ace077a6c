//! Request matching.
//!
//! [`MatchingEngine::process`] drains a [`RequestQueue`] in priority order
//! ([`RequestQueue::drain_by_priority`]) and tries to fill each request
//! from the [`Inventory`]. One item is consumed per match; a request with no
//! available item is logged and dropped, never retried.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Inventory, RequestQueue};
use crate::types::{Item, Request};

/// Outcome of processing one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchLogEntry {
    /// Request filled; `item` left the inventory
    Matched {
        /// The filled request
        request: Request,
        /// The item dispensed for it
        item: Item,
    },
    /// No item with the requested title was available
    Unmatched {
        /// The dropped request
        request: Request,
    },
}

impl MatchLogEntry {
    /// The request this entry is about
    pub fn request(&self) -> &Request {
        match self {
            MatchLogEntry::Matched { request, .. } | MatchLogEntry::Unmatched { request } => {
                request
            }
        }
    }

    /// The dispensed item, if matched
    pub fn item(&self) -> Option<&Item> {
        match self {
            MatchLogEntry::Matched { item, .. } => Some(item),
            MatchLogEntry::Unmatched { .. } => None,
        }
    }

    /// Check if the request was filled
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchLogEntry::Matched { .. })
    }
}

impl fmt::Display for MatchLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchLogEntry::Matched { request, item } => {
                write!(f, "Matched: {request} <-> {item}")
            }
            MatchLogEntry::Unmatched { request } => {
                write!(f, "No available book for: {}", request.title())
            }
        }
    }
}

/// Running totals across every `process` call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Requests drained
    pub processed: u64,
    /// Requests filled
    pub matched: u64,
    /// Requests dropped for lack of inventory
    pub unmatched: u64,
}

/// Pairs pending requests with inventory
///
/// # Example
///
/// ```rust
/// use book_exchange::market::{Inventory, MatchingEngine, RequestQueue};
/// use book_exchange::types::{Item, Request};
/// use rust_decimal::Decimal;
///
/// let mut inventory = Inventory::new();
/// inventory.add_item(Item::new("Calculus", "MATH101", Decimal::new(2500, 2), "Xia"));
///
/// let mut queue = RequestQueue::new();
/// queue.submit(Request::new("calculus", "Ravi", 5));
/// queue.submit(Request::new("Calculus", "Lena", 1));
///
/// let mut engine = MatchingEngine::new();
/// let log = engine.process(&mut queue, &mut inventory);
///
/// assert_eq!(log[0].request().requester(), "Lena");
/// assert!(log[0].is_matched());
/// assert!(!log[1].is_matched());
/// assert!(queue.is_empty() && inventory.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MatchingEngine {
    stats: MatchStats,
}

impl MatchingEngine {
    /// Create an engine with zeroed statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain `requests` and fill what `inventory` allows
    ///
    /// The returned log is in processing order: lowest urgency number first,
    /// earlier submission first among equals. `requests` is always empty
    /// afterwards.
    pub fn process(
        &mut self,
        requests: &mut RequestQueue,
        inventory: &mut Inventory,
    ) -> Vec<MatchLogEntry> {
        let batch = requests.drain_by_priority();
        let mut log = Vec::with_capacity(batch.len());

        for request in batch {
            let entry = match inventory.take_by_title(request.title()) {
                Some(item) => {
                    debug!(
                        id = %request.submitted_at(),
                        title = request.title(),
                        requester = request.requester(),
                        urgency = request.urgency(),
                        seller = item.seller(),
                        "request matched"
                    );
                    self.stats.matched += 1;
                    MatchLogEntry::Matched { request, item }
                }
                None => {
                    debug!(
                        id = %request.submitted_at(),
                        title = request.title(),
                        requester = request.requester(),
                        urgency = request.urgency(),
                        "no inventory for request"
                    );
                    self.stats.unmatched += 1;
                    MatchLogEntry::Unmatched { request }
                }
            };
            self.stats.processed += 1;
            log.push(entry);
        }

        if !log.is_empty() {
            let matched = log.iter().filter(|e| e.is_matched()).count();
            info!(
                processed = log.len(),
                matched,
                unmatched = log.len() - matched,
                remaining_inventory = inventory.len(),
                "request batch processed"
            );
        }

        log
    }

    /// Totals since the engine was created
    #[must_use]
    pub fn stats(&self) -> MatchStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn calculus(seller: &str) -> Item {
        Item::new("Calculus", "MATH101", dec!(25), seller)
    }

    #[test]
    fn test_lower_urgency_number_wins() {
        let mut inventory: Inventory = [calculus("X")].into_iter().collect();
        let mut queue = RequestQueue::new();
        queue.submit(Request::new("Calculus", "R1", 5));
        queue.submit(Request::new("Calculus", "R2", 1));

        let log = MatchingEngine::new().process(&mut queue, &mut inventory);

        assert_eq!(log.len(), 2);
        assert_eq!(log[0].request().requester(), "R2");
        assert_eq!(log[0].item().map(Item::seller), Some("X"));
        assert_eq!(log[1].request().requester(), "R1");
        assert!(!log[1].is_matched());
    }

    #[test]
    fn test_equal_urgency_earlier_submission_wins() {
        let mut inventory: Inventory = [calculus("X")].into_iter().collect();
        let early = Request::new("calculus", "early", 4);
        let late = Request::new("CALCULUS", "late", 4);
        // Submit out of creation order; the stamp decides, not queue position
        let mut queue: RequestQueue = [late, early].into_iter().collect();

        let log = MatchingEngine::new().process(&mut queue, &mut inventory);

        assert!(log[0].is_matched());
        assert_eq!(log[0].request().requester(), "early");
        assert_eq!(log[1].request().requester(), "late");
    }

    #[test]
    fn test_second_process_is_empty() {
        let mut inventory: Inventory = [calculus("X"), calculus("Y")].into_iter().collect();
        let mut queue: RequestQueue = [Request::new("Calculus", "R", 3)].into_iter().collect();
        let mut engine = MatchingEngine::new();

        assert_eq!(engine.process(&mut queue, &mut inventory).len(), 1);
        assert!(queue.is_empty());

        let before = inventory.items();
        assert!(engine.process(&mut queue, &mut inventory).is_empty());
        assert_eq!(inventory.items(), before);
    }

    #[test]
    fn test_each_match_consumes_one_item() {
        let mut inventory: Inventory = [calculus("X"), calculus("Y")].into_iter().collect();
        let mut queue: RequestQueue = (0..3)
            .map(|i| Request::new("Calculus", format!("R{i}"), 2))
            .collect();

        let mut engine = MatchingEngine::new();
        let log = engine.process(&mut queue, &mut inventory);

        let sellers: Vec<_> = log.iter().filter_map(|e| e.item()).map(Item::seller).collect();
        assert_eq!(sellers, vec!["X", "Y"]);
        assert!(inventory.is_empty());
        assert_eq!(
            engine.stats(),
            MatchStats {
                processed: 3,
                matched: 2,
                unmatched: 1
            }
        );
    }

    #[test]
    fn test_log_display() {
        let request = Request::new("Calculus", "Ravi", 2);
        let matched = MatchLogEntry::Matched {
            request: request.clone(),
            item: calculus("Xia"),
        };
        assert_eq!(
            matched.to_string(),
            "Matched: Calculus (Urgency: 2) - Requested by: Ravi <-> Calculus ($25) - Course: MATH101, Seller: Xia"
        );

        let unmatched = MatchLogEntry::Unmatched { request };
        assert_eq!(unmatched.to_string(), "No available book for: Calculus");
    }

    #[test]
    fn test_log_serde_tag() {
        let entry = MatchLogEntry::Unmatched {
            request: Request::new("Physics", "Dan", 7),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["outcome"], "unmatched");
        assert_eq!(json["request"]["title"], "Physics");
    }
}
