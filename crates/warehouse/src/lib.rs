//! # warehouse
//!
//! In-memory warehouse ledger and the conversational tools that mutate and
//! query it.
//!
//! ## Model
//!
//! The ledger is a flat mapping from item name to a non-negative stock
//! count. Two invariants hold at all times:
//!
//! - quantities never go negative: removals exceeding stock are rejected
//!   with the current count reported back
//! - no zero-quantity entry persists: an item reaching zero disappears
//!   from the ledger entirely
//!
//! ## Example: a session over an empty warehouse
//!
//! ```text
//! You: add 5 apples
//!   → add_item(item_name="apples", quantity=5)
//!   ← {"status":"success","message":"Added 5 of 'apples'."}
//! You: remove 8 apples
//!   → remove_item(item_name="apples", quantity=8)
//!   ← {"status":"error","message":"Insufficient quantity of 'apples'. Currently have 5."}
//! You: what's in stock?
//!   → get_inventory()
//!   ← {"status":"success","inventory":{"apples":5}}
//! ```
//!
//! Domain errors are data: they travel back to the model as error-status
//! payloads so it can narrate them, and never abort an operation batch.

pub mod error;
pub mod ledger;
pub mod svckit;

pub use error::{LedgerError, Result};
pub use ledger::Ledger;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{AddItemTool, GetInventoryTool, RemoveItemTool};
}

/// System prompt for the warehouse agent
pub const WAREHOUSE_AGENT_PROMPT: &str = "\
You are a helpful warehouse management assistant. \
Use the available functions (add_item, remove_item, get_inventory) to manage \
stock based on the user's requests. \
If the user asks to add or remove items, call the corresponding function. \
If the user asks about current stock or requests a report, use get_inventory. \
Confirm completed actions or provide the requested stock information. \
If you cannot satisfy a request with the available functions, explain why. \
If a function call returns an error status, tell the user about the error.";
