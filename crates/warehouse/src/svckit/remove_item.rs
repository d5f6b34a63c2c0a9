//! Remove-Item Tool
//!
//! Removes a quantity of an item from the warehouse. Domain failures (item
//! absent, more requested than on hand) come back as error-status payloads
//! with the ledger untouched.

use async_trait::async_trait;

use agent_core::tool::{JsonMap, ParameterSchema, Tool, ToolPayload, ToolSchema};

use crate::svckit::{stock_arguments, SharedLedger};

/// Tool for removing stock from the warehouse
pub struct RemoveItemTool {
    ledger: SharedLedger,
}

impl RemoveItemTool {
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for RemoveItemTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "remove_item".into(),
            description: "Remove the specified quantity of an item from the warehouse.".into(),
            parameters: vec![
                ParameterSchema::string("item_name", "Name of the item to remove."),
                ParameterSchema::integer("quantity", "Number of units to remove."),
            ],
        }
    }

    async fn execute(&self, arguments: &JsonMap) -> anyhow::Result<ToolPayload> {
        let (item, quantity) = match stock_arguments(arguments) {
            Ok(pair) => pair,
            Err(message) => return Ok(ToolPayload::error(message)),
        };

        tracing::info!(item = %item, quantity, "Removing stock");

        let mut ledger = self.ledger.write().await;
        match ledger.remove(&item, quantity) {
            Ok(_remaining) => Ok(ToolPayload::success(format!(
                "Removed {quantity} of '{item}'."
            ))),
            Err(err) => Ok(ToolPayload::error(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svckit::shared_ledger;

    fn args(json: &str) -> JsonMap {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn removes_and_reports_wire_exact_message() {
        let ledger = shared_ledger();
        ledger.write().await.add("apples", 5).unwrap();
        let tool = RemoveItemTool::new(ledger.clone());

        let payload = tool
            .execute(&args(r#"{"item_name":"apples","quantity":2}"#))
            .await
            .unwrap();

        assert_eq!(
            payload.to_wire(),
            r#"{"status":"success","message":"Removed 2 of 'apples'."}"#
        );
        assert_eq!(ledger.read().await.quantity("apples"), Some(3));
    }

    #[tokio::test]
    async fn removing_all_stock_drops_the_entry() {
        let ledger = shared_ledger();
        ledger.write().await.add("apples", 5).unwrap();
        let tool = RemoveItemTool::new(ledger.clone());

        tool.execute(&args(r#"{"item_name":"apples","quantity":5}"#))
            .await
            .unwrap();

        assert!(ledger.read().await.snapshot().is_none());
    }

    #[tokio::test]
    async fn missing_item_is_a_domain_error_payload() {
        let ledger = shared_ledger();
        let tool = RemoveItemTool::new(ledger.clone());

        let payload = tool
            .execute(&args(r#"{"item_name":"pears","quantity":1}"#))
            .await
            .unwrap();

        assert_eq!(
            payload.to_wire(),
            r#"{"status":"error","message":"Item 'pears' not found."}"#
        );
    }

    #[tokio::test]
    async fn over_removal_reports_current_stock_exactly() {
        let ledger = shared_ledger();
        ledger.write().await.add("apples", 3).unwrap();
        let tool = RemoveItemTool::new(ledger.clone());

        let payload = tool
            .execute(&args(r#"{"item_name":"apples","quantity":5}"#))
            .await
            .unwrap();

        assert_eq!(
            payload.to_wire(),
            r#"{"status":"error","message":"Insufficient quantity of 'apples'. Currently have 3."}"#
        );
        assert_eq!(ledger.read().await.quantity("apples"), Some(3));
    }
}
