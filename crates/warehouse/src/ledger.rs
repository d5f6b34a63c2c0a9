//! Warehouse Ledger
//!
//! The single source of truth for stock levels. Created empty at process
//! start, mutated only through the stock tools, never persisted.

use std::collections::BTreeMap;

use crate::error::{LedgerError, Result};

/// In-memory stock ledger: item name → quantity on hand
///
/// Quantities are strictly positive while an entry exists; an item that
/// reaches zero is removed entirely. Iteration order is the item-name order,
/// which keeps snapshots deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    items: BTreeMap<String, u64>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stock, creating the entry if absent
    ///
    /// Returns the new total for the item. Fails without mutating the
    /// ledger if the total would exceed the representable maximum, so a
    /// runaway addition can never wrap or panic. Argument validation
    /// (positive quantity, non-empty name) happens in the tool layer before
    /// this is reached.
    pub fn add(&mut self, item: &str, quantity: u64) -> Result<u64> {
        let current = self.items.get(item).copied().unwrap_or(0);
        let total = current
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::StockLimitExceeded {
                item: item.to_string(),
                available: current,
            })?;
        self.items.insert(item.to_string(), total);
        Ok(total)
    }

    /// Remove stock, deleting the entry when it reaches exactly zero
    ///
    /// Returns the remaining quantity. Fails without mutating the ledger if
    /// the item is absent or the requested amount exceeds stock; the
    /// insufficient-stock error reports the exact current quantity.
    pub fn remove(&mut self, item: &str, quantity: u64) -> Result<u64> {
        let Some(total) = self.items.get_mut(item) else {
            return Err(LedgerError::NotFound(item.to_string()));
        };

        if *total < quantity {
            return Err(LedgerError::InsufficientStock {
                item: item.to_string(),
                available: *total,
            });
        }

        *total -= quantity;
        let remaining = *total;
        if remaining == 0 {
            self.items.remove(item);
        }
        Ok(remaining)
    }

    /// Immutable copy of the full mapping; `None` is the explicit empty marker
    pub fn snapshot(&self) -> Option<BTreeMap<String, u64>> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items.clone())
        }
    }

    /// Current quantity for an item, if present
    pub fn quantity(&self, item: &str) -> Option<u64> {
        self.items.get(item).copied()
    }

    /// Number of distinct items in stock
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the warehouse is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
