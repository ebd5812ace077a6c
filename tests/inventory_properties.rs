//! Consistency properties of the inventory against a reference model.
//!
//! Run with: cargo test --test inventory_properties

use book_exchange::types::Item;
use book_exchange::Inventory;
use proptest::prelude::*;
use rust_decimal_macros::dec;

const TITLES: [&str; 5] = ["Calculus", "algebra", "Biology", "Zoology", "Anatomy"];
const SELLERS: [&str; 3] = ["Xia", "Yuri", "Zoe"];

#[derive(Debug, Clone)]
enum Op {
    Add { title: usize, seller: usize, shout: bool },
    Take { title: usize, shout: bool },
    RemoveExact { title: usize, seller: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..TITLES.len(), 0..SELLERS.len(), any::<bool>())
            .prop_map(|(title, seller, shout)| Op::Add { title, seller, shout }),
        2 => (0..TITLES.len(), any::<bool>()).prop_map(|(title, shout)| Op::Take { title, shout }),
        1 => (0..TITLES.len(), 0..SELLERS.len())
            .prop_map(|(title, seller)| Op::RemoveExact { title, seller }),
    ]
}

fn title(idx: usize, shout: bool) -> String {
    if shout {
        TITLES[idx].to_uppercase()
    } else {
        TITLES[idx].to_string()
    }
}

fn item(title_idx: usize, seller_idx: usize, shout: bool) -> Item {
    Item::new(title(title_idx, shout), "CS101", dec!(10), SELLERS[seller_idx])
}

/// Items in arrival order; the expected list is a stable sort by folded title
#[derive(Default)]
struct Model {
    arrivals: Vec<Item>,
}

impl Model {
    fn add(&mut self, item: Item) {
        self.arrivals.push(item);
    }

    fn take(&mut self, title: &str) -> Option<Item> {
        let key = title.to_lowercase();
        let pos = self.arrivals.iter().position(|i| i.title_key() == key)?;
        Some(self.arrivals.remove(pos))
    }

    fn remove_exact(&mut self, item: &Item) -> bool {
        match self.arrivals.iter().position(|i| i == item) {
            Some(pos) => {
                self.arrivals.remove(pos);
                true
            }
            None => false,
        }
    }

    fn expected_list(&self) -> Vec<(String, String)> {
        let mut sorted = self.arrivals.clone();
        sorted.sort_by_key(Item::title_key);
        sorted
            .iter()
            .map(|i| (i.title().to_string(), i.seller().to_string()))
            .collect()
    }
}

fn listed(inventory: &Inventory) -> Vec<(String, String)> {
    inventory
        .list()
        .map(|i| (i.title().to_string(), i.seller().to_string()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Sorted view and title index stay consistent and match the model
    #[test]
    fn random_ops_stay_consistent(ops in prop::collection::vec(op(), 0..200)) {
        let mut inventory = Inventory::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Add { title, seller, shout } => {
                    let it = item(title, seller, shout);
                    model.add(it.clone());
                    inventory.add_item(it);
                }
                Op::Take { title: idx, shout } => {
                    let wanted = title(idx, !shout);
                    prop_assert_eq!(inventory.take_by_title(&wanted), model.take(&wanted));
                }
                Op::RemoveExact { title, seller } => {
                    let probe = item(title, seller, false);
                    prop_assert_eq!(inventory.remove_exact(&probe), model.remove_exact(&probe));
                }
            }

            prop_assert!(inventory.is_consistent());
            prop_assert_eq!(inventory.len(), model.arrivals.len());
            prop_assert_eq!(listed(&inventory), model.expected_list());
        }
    }

    /// list() is the case-insensitive title sort regardless of insertion order
    #[test]
    fn list_is_sorted_for_any_insertion_order(
        picks in prop::collection::vec((0..TITLES.len(), any::<bool>()), 0..100)
    ) {
        let inventory: Inventory = picks
            .iter()
            .map(|&(t, shout)| item(t, 0, shout))
            .collect();

        let mut expected: Vec<String> = picks.iter().map(|&(t, _)| TITLES[t].to_lowercase()).collect();
        expected.sort();

        let actual: Vec<String> = inventory.list().map(Item::title_key).collect();
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn test_fifo_across_sellers() {
    let mut inventory = Inventory::new();
    inventory.add_item(Item::new("Calculus", "MATH101", dec!(20), "X"));
    inventory.add_item(Item::new("Calculus", "MATH101", dec!(22), "Y"));

    let a = inventory.take_by_title("calculus").unwrap();
    let b = inventory.take_by_title("calculus").unwrap();
    assert_eq!(a.seller(), "X");
    assert_eq!(b.seller(), "Y");
    assert!(inventory.take_by_title("calculus").is_none());
}

#[test]
fn test_failed_operations_do_not_mutate() {
    let mut inventory = Inventory::new();
    inventory.add_item(Item::new("Calculus", "MATH101", dec!(20), "X"));
    let before = inventory.items();

    assert!(inventory.take_by_title("Geometry").is_none());
    assert!(!inventory.remove_exact(&Item::new("Calculus", "MATH101", dec!(20), "Nobody")));
    assert!(!inventory.remove_exact(&Item::new("Calculus", "MATH999", dec!(20), "X")));

    assert_eq!(inventory.items(), before);
    assert!(inventory.is_consistent());
}
