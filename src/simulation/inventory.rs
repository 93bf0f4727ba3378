//! Items and the bounded player inventory
//!
//! One unit occupies one slot, so a capacity of 25 means 25 units in total.
//! Units with names that match case-insensitively are interchangeable and are
//! grouped into stacks only for display.

use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};

/// An immutable item with a unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
}

impl Item {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Whether this item stacks with `name`
    pub fn matches(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

/// Case-insensitive name comparison used for items, crops and ingredients
pub fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// What a mutating inventory call changed
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryChange {
    Added(String),
    Removed(String),
}

/// A named stack for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
    revision: u64,
    dirty: bool,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            revision: 0,
            dirty: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn free_slots(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Bumped on every successful mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Report whether anything changed since the last call, clearing the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    pub fn add_item(&mut self, item: Item) -> SimResult<InventoryChange> {
        if self.is_full() {
            return Err(SimError::InventoryFull {
                capacity: self.capacity,
            });
        }
        let change = InventoryChange::Added(item.name.clone());
        self.items.push(item);
        self.touch();
        Ok(change)
    }

    /// Remove the first unit whose name matches. `None` when nothing matches.
    pub fn remove_item(&mut self, name: &str) -> Option<(Item, InventoryChange)> {
        let index = self.items.iter().position(|item| item.matches(name))?;
        let item = self.items.remove(index);
        self.touch();
        let change = InventoryChange::Removed(item.name.clone());
        Some((item, change))
    }

    pub fn count(&self, name: &str) -> usize {
        self.items.iter().filter(|item| item.matches(name)).count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.matches(name))
    }

    /// True when every name is present, counting repeats
    pub fn contains_all<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.first_missing(names).is_none()
    }

    /// First name that cannot be covered by the inventory, counting repeats
    pub fn first_missing<'a, S: AsRef<str>>(&self, names: &'a [S]) -> Option<&'a str> {
        let mut available: Vec<bool> = vec![true; self.items.len()];
        for name in names {
            let name = name.as_ref();
            let found = self
                .items
                .iter()
                .enumerate()
                .position(|(i, item)| available[i] && item.matches(name));
            match found {
                Some(i) => available[i] = false,
                None => return Some(name),
            }
        }
        None
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Units grouped by name in first-seen order
    pub fn stacks(&self) -> Vec<ItemStack> {
        let mut stacks: Vec<ItemStack> = Vec::new();
        for item in &self.items {
            match stacks.iter_mut().find(|stack| names_match(&stack.name, &item.name)) {
                Some(stack) => stack.count += 1,
                None => stacks.push(ItemStack {
                    name: item.name.clone(),
                    count: 1,
                }),
            }
        }
        stacks
    }
}
