//! Listed goods.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{cmp_titles, fold_title, Price};

/// A book listed for sale
///
/// Items are immutable once built. Two items are equal when their titles
/// match ignoring case and their course code and seller match exactly;
/// price does not take part in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    title: String,
    course_code: String,
    price: Price,
    seller: String,
}

impl Item {
    /// Create a new item
    pub fn new(
        title: impl Into<String>,
        course_code: impl Into<String>,
        price: Price,
        seller: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            course_code: course_code.into(),
            price,
            seller: seller.into(),
        }
    }

    /// Title as listed
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Course the book is used in
    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    /// Asking price
    pub fn price(&self) -> Price {
        self.price
    }

    /// Seller name
    pub fn seller(&self) -> &str {
        &self.seller
    }

    /// Case-folded title used as the lookup key
    pub fn title_key(&self) -> String {
        fold_title(&self.title)
    }

    /// Compare titles ignoring case
    pub fn cmp_title(&self, other: &Item) -> Ordering {
        cmp_titles(&self.title, &other.title)
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_title(other) == Ordering::Equal
            && self.course_code == other.course_code
            && self.seller == other.seller
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title_key().hash(state);
        self.course_code.hash(state);
        self.seller.hash(state);
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (${}) - Course: {}, Seller: {}",
            self.title, self.price, self.course_code, self.seller
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_accessors() {
        let item = Item::new("Intro to CS", "CS134", dec!(49.99), "Alice");
        assert_eq!(item.title(), "Intro to CS");
        assert_eq!(item.course_code(), "CS134");
        assert_eq!(item.price(), dec!(49.99));
        assert_eq!(item.seller(), "Alice");
        assert_eq!(item.title_key(), "intro to cs");
    }

    #[test]
    fn test_display() {
        let item = Item::new("Intro to CS", "CS134", dec!(49.99), "Alice");
        assert_eq!(
            item.to_string(),
            "Intro to CS ($49.99) - Course: CS134, Seller: Alice"
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = Item::new("Calculus", "MATH101", dec!(20), "Xavier");
        let b = Item::new("CALCULUS", "MATH101", dec!(35), "Xavier");
        let c = Item::new("Calculus", "MATH101", dec!(20), "Yolanda");
        let d = Item::new("Calculus", "MATH102", dec!(20), "Xavier");

        assert_eq!(a, b); // title case and price ignored
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_cmp_title() {
        let a = Item::new("Data Structures", "CS136", dec!(39.99), "Bob");
        let b = Item::new("intro to CS", "CS134", dec!(49.99), "Alice");
        assert_eq!(a.cmp_title(&b), Ordering::Less);
    }

    #[test]
    fn test_serde_price_as_string() {
        let item = Item::new("Algorithms", "CS101", dec!(49.99), "Alice");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["price"], "49.99");
        assert_eq!(json["course_code"], "CS101");

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.price(), dec!(49.99));
    }
}
