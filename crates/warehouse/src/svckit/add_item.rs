//! Add-Item Tool
//!
//! Adds a quantity of an item to the warehouse, creating the entry if it
//! does not exist yet.

use async_trait::async_trait;

use agent_core::tool::{JsonMap, ParameterSchema, Tool, ToolPayload, ToolSchema};

use crate::svckit::{stock_arguments, SharedLedger};

/// Tool for adding stock to the warehouse
pub struct AddItemTool {
    ledger: SharedLedger,
}

impl AddItemTool {
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for AddItemTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "add_item".into(),
            description: "Add the specified quantity of an item to the warehouse.".into(),
            parameters: vec![
                ParameterSchema::string("item_name", "Name of the item to add."),
                ParameterSchema::integer("quantity", "Number of units to add."),
            ],
        }
    }

    async fn execute(&self, arguments: &JsonMap) -> anyhow::Result<ToolPayload> {
        let (item, quantity) = match stock_arguments(arguments) {
            Ok(pair) => pair,
            Err(message) => return Ok(ToolPayload::error(message)),
        };

        tracing::info!(item = %item, quantity, "Adding stock");

        let mut ledger = self.ledger.write().await;
        match ledger.add(&item, quantity) {
            Ok(_total) => Ok(ToolPayload::success(format!(
                "Added {quantity} of '{item}'."
            ))),
            Err(err) => Ok(ToolPayload::error(err.to_string())),
        }
    }
}
