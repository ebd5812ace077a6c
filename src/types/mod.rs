//! Value types shared by the inventory, the request queue and the engine.
//!
//! - [`item`] - Listed goods ([`Item`]) and their price type
//! - [`request`] - Buyer requests ([`Request`]) and submission ids

pub mod item;
pub mod request;

pub use item::Item;
pub use request::{Request, SubmissionId};

/// Listing price
///
/// Using `Decimal` instead of floating point for:
/// - Exact arithmetic (49.99 stays 49.99)
/// - Lossless snapshot round trips
pub type Price = rust_decimal::Decimal;

/// Urgency rank (1 = most urgent)
///
/// The accepted range is enforced by [`Exchange`](crate::Exchange) using
/// [`Config::urgency_range`](crate::Config::urgency_range); the core
/// accepts any value.
pub type Urgency = u8;

/// Fold a title into its case-insensitive key
pub(crate) fn fold_title(title: &str) -> String {
    title.chars().flat_map(char::to_lowercase).collect()
}

/// Compare two titles ignoring case, character by character
pub(crate) fn cmp_titles(a: &str, b: &str) -> std::cmp::Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
