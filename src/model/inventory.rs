// src/model/inventory.rs

use std::collections::VecDeque;

/// A single perishable unit of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub age: u32,
}

impl Item {
    pub fn new(age: u32) -> Self {
        Self { age }
    }
}

/// The items currently on the shelf, oldest at the front.
///
/// Purchases are appended at age 0 and every item ages by the same amount,
/// so the front always holds the oldest item and selling from the front is
/// both FIFO and oldest-first.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: VecDeque<Item>,
}

impl Inventory {
    /// Builds an inventory from arbitrary starting ages.
    pub fn from_ages(ages: &[u32]) -> Self {
        let mut sorted = ages.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        Self {
            items: sorted.into_iter().map(Item::new).collect(),
        }
    }

    /// Adds `quantity` fresh items at the back.
    pub fn receive(&mut self, quantity: u32) {
        self.items
            .extend(std::iter::repeat(Item::new(0)).take(quantity as usize));
    }

    /// One day passes for every item on the shelf.
    pub fn age_all(&mut self) {
        for item in self.items.iter_mut() {
            item.age = item.age.saturating_add(1);
        }
    }

    /// Removes every item with `age >= age_limit`, returning how many went.
    pub fn clear_expired(&mut self, age_limit: u32) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.age < age_limit);
        before - self.items.len()
    }

    /// Sells the oldest item, if any.
    pub fn sell_oldest(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

    /// Number of items younger than `age_limit`.
    pub fn count_fresh(&self, age_limit: u32) -> u32 {
        self.items.iter().filter(|item| item.age < age_limit).count() as u32
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}
