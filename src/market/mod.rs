//! Inventory, request queue, and matching.
//!
//! - [`Inventory`] - sorted shelf plus FIFO title index, kept in lockstep
//! - [`RequestQueue`] - pending requests awaiting a matching run
//! - [`MatchingEngine`] - urgency-priority matching of requests to items
//! - [`Exchange`] - validated, lock-guarded facade over all three
//!
//! # Example
//!
//! ```rust
//! use book_exchange::market::{Inventory, MatchingEngine, RequestQueue};
//! use book_exchange::types::{Item, Request};
//! use rust_decimal::Decimal;
//!
//! let mut inventory = Inventory::new();
//! inventory.add_item(Item::new("Data Structures", "CS136", Decimal::new(3999, 2), "Bob"));
//!
//! let mut requests = RequestQueue::new();
//! requests.submit(Request::new("data structures", "Alice", 2));
//!
//! let log = MatchingEngine::new().process(&mut requests, &mut inventory);
//! println!("{}", log[0]);
//! ```

pub mod engine;
pub mod exchange;
pub mod inventory;
pub mod requests;

pub use engine::{MatchLogEntry, MatchStats, MatchingEngine};
pub use exchange::{Exchange, ListingForm, RequestForm};
pub use inventory::{Inventory, ListingId};
pub use requests::RequestQueue;
