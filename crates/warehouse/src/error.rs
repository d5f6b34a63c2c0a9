//! Error Types for the Warehouse Ledger
//!
//! Display strings double as the wire-level result messages, so the exact
//! wording here is part of the tool payload contract.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Item '{0}' not found.")]
    NotFound(String),

    #[error("Insufficient quantity of '{item}'. Currently have {available}.")]
    InsufficientStock { item: String, available: u64 },

    #[error("Cannot add that much '{item}': stock limit reached. Currently have {available}.")]
    StockLimitExceeded { item: String, available: u64 },
}
