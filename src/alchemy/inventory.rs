use super::error::InventoryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A finite stock of ingredients, name to quantity.
///
/// Names are kept sorted so iteration order (and everything derived from it)
/// is reproducible. A name whose quantity reaches zero is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries with a zero quantity are dropped; repeated names saturate at `u32::MAX`.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut inventory = Self::new();
        for (name, qty) in items {
            if qty > 0 {
                let held = inventory.items.entry(name.into()).or_insert(0);
                *held = held.saturating_add(qty);
            }
        }
        inventory
    }

    /// One of each named ingredient.
    pub fn from_ingredients<S: AsRef<str>>(names: &[S]) -> Self {
        let mut inventory = Self::new();
        for n in names {
            inventory.items.insert(n.as_ref().to_string(), 1);
        }
        inventory
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str, qty: u32) -> bool {
        self.quantity(name) >= qty
    }

    pub fn contains(&self, name: &str) -> bool {
        self.has(name, 1)
    }

    /// Names with a positive quantity, sorted.
    pub fn available_ingredients(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(n, &q)| (&n[..], q))
    }

    pub fn total_items(&self) -> u64 {
        self.items.values().map(|&q| q as u64).sum()
    }

    pub fn unique_items(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take one of `name`. Returns false (and changes nothing) if there is none.
    pub fn consume(&mut self, name: &str) -> bool {
        self.consume_recipe(&[name])
    }

    /// Take every listed ingredient, counting repeats, or nothing at all.
    pub fn consume_recipe<S: AsRef<str>>(&mut self, names: &[S]) -> bool {
        let mut required: BTreeMap<&str, u32> = BTreeMap::new();
        for n in names {
            *required.entry(n.as_ref()).or_insert(0) += 1;
        }

        if !required.iter().all(|(name, &qty)| self.has(name, qty)) {
            return false;
        }

        for (name, qty) in required {
            let remaining = self.quantity(name) - qty;
            if remaining == 0 {
                self.items.remove(name);
            } else {
                self.items.insert(name.to_string(), remaining);
            }
        }

        true
    }

    pub fn add(&mut self, name: &str, qty: u32) -> Result<(), InventoryError> {
        if qty == 0 {
            return Err(InventoryError::NonPositiveQuantity {
                name: name.to_string(),
                qty,
            });
        }
        let held = self.quantity(name);
        let total = held
            .checked_add(qty)
            .ok_or_else(|| InventoryError::QuantityOverflow {
                name: name.to_string(),
                held,
                qty,
            })?;
        self.items.insert(name.to_string(), total);
        Ok(())
    }

    /// Independent copy for what-if branches.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Inventory(empty)");
        }
        write!(
            f,
            "Inventory({} types, {} total)",
            self.unique_items(),
            self.total_items()
        )?;
        for (name, qty) in self.iter() {
            write!(f, "\n  {}: {}", name, qty)?;
        }
        Ok(())
    }
}
