//! Warehouse Stock Tools
//!
//! The three operations the agent may invoke against the ledger. All tools
//! share one ledger handle; the surrounding dialogue is strictly
//! sequential, so the lock only expresses sharing, not contention.

mod add_item;
mod get_inventory;
mod remove_item;

pub use add_item::AddItemTool;
pub use get_inventory::GetInventoryTool;
pub use remove_item::RemoveItemTool;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use agent_core::tool::JsonMap;

use crate::ledger::Ledger;

/// Ledger handle shared across the stock tools
pub type SharedLedger = Arc<RwLock<Ledger>>;

/// Create a fresh shared ledger
pub fn shared_ledger() -> SharedLedger {
    Arc::new(RwLock::new(Ledger::new()))
}

/// Extract and validate the common add/remove argument pair
///
/// Type-level checks already ran in the dispatch layer; this enforces the
/// domain rules: non-blank item name, strictly positive quantity. The error
/// string becomes the payload message.
pub(crate) fn stock_arguments(arguments: &JsonMap) -> Result<(String, u64), String> {
    let item = arguments
        .get("item_name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim();
    if item.is_empty() {
        return Err("Parameter 'item_name' must be a non-empty string.".into());
    }

    let quantity = arguments.get("quantity").and_then(Value::as_u64).unwrap_or(0);
    if quantity == 0 {
        return Err("Parameter 'quantity' must be a positive integer.".into());
    }

    Ok((item.to_string(), quantity))
}
