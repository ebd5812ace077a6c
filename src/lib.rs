//! # book-exchange
//!
//! In-memory core of a small book exchange: sellers list books, buyers
//! request titles with an urgency rank, and a matching run pairs requests
//! with inventory.
//!
//! ## Features
//!
//! - **Balanced Ordered Set** - AVL tree with pluggable comparators, O(log n)
//!   insert/remove and stack-based in-order iteration
//! - **Title-Indexed Inventory** - sorted presentation view plus FIFO lookup
//!   by case-insensitive title, always consistent
//! - **Priority Matching** - lowest urgency number first, earliest
//!   submission breaks ties, one item consumed per match
//! - **Snapshots** - line-delimited save/load that tolerates bad lines
//!
//! ## Quick Start
//!
//! ```rust
//! use book_exchange::{Config, Exchange, ListingForm, RequestForm};
//!
//! fn main() -> Result<(), book_exchange::Error> {
//!     let exchange = Exchange::new(Config::new())?;
//!
//!     exchange.list_item(ListingForm {
//!         title: "Data Structures",
//!         course_code: "CS136",
//!         price: "39.99",
//!         seller: "Bob",
//!     })?;
//!
//!     exchange.request_item(RequestForm {
//!         title: "data structures",
//!         requester: "Alice",
//!         urgency: "1",
//!     })?;
//!
//!     for entry in exchange.process()? {
//!         println!("{entry}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`set`] - Generic AVL-backed ordered set
//! - [`types`] - Item and request value types
//! - [`market`] - Inventory, request queue, matching engine, exchange facade
//! - [`snapshot`] - Line-delimited persistence
//! - [`config`] - Validation and persistence settings
//! - [`error`] - Error types for the crate
//!
//! ## Concurrency
//!
//! The core types are plain single-threaded structures. [`Exchange`] puts
//! them behind one `parking_lot::Mutex` so each public call is serialized.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod market;
pub mod set;
pub mod snapshot;
pub mod types;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use error::Error;
pub use market::{
    Exchange, Inventory, ListingForm, MatchLogEntry, MatchingEngine, RequestForm, RequestQueue,
};
pub use set::OrderedSet;
pub use types::{Item, Request};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
