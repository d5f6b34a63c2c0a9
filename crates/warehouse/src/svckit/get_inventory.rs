//! Get-Inventory Tool
//!
//! Read-only snapshot of the warehouse. The payload carries either the full
//! stock mapping or the literal empty-warehouse marker string under the
//! `inventory` key.

use async_trait::async_trait;
use serde_json::Value;

use agent_core::tool::{JsonMap, Tool, ToolPayload, ToolSchema};

use crate::svckit::SharedLedger;

/// Literal marker reported when the warehouse holds nothing
pub const EMPTY_WAREHOUSE: &str = "Warehouse is empty.";

/// Tool for reporting the current warehouse contents
pub struct GetInventoryTool {
    ledger: SharedLedger,
}

impl GetInventoryTool {
    pub fn new(ledger: SharedLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for GetInventoryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_inventory".into(),
            description: "Get a report of the current warehouse stock.".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _arguments: &JsonMap) -> anyhow::Result<ToolPayload> {
        tracing::info!("Reporting warehouse stock");

        let ledger = self.ledger.read().await;
        let inventory = match ledger.snapshot() {
            Some(items) => serde_json::to_value(items)?,
            None => Value::String(EMPTY_WAREHOUSE.into()),
        };

        Ok(ToolPayload::success_with("inventory", inventory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svckit::shared_ledger;

    #[tokio::test]
    async fn empty_warehouse_reports_the_marker() {
        let tool = GetInventoryTool::new(shared_ledger());

        let payload = tool.execute(&JsonMap::new()).await.unwrap();

        assert_eq!(
            payload.to_wire(),
            r#"{"status":"success","inventory":"Warehouse is empty."}"#
        );
    }

    #[tokio::test]
    async fn stocked_warehouse_reports_the_mapping() {
        let ledger = shared_ledger();
        {
            let mut ledger = ledger.write().await;
            ledger.add("apples", 5).unwrap();
            ledger.add("bolts", 12).unwrap();
        }
        let tool = GetInventoryTool::new(ledger.clone());

        let payload = tool.execute(&JsonMap::new()).await.unwrap();

        assert_eq!(
            payload.to_wire(),
            r#"{"status":"success","inventory":{"apples":5,"bolts":12}}"#
        );
    }

    #[tokio::test]
    async fn report_has_no_side_effects() {
        let ledger = shared_ledger();
        ledger.write().await.add("apples", 5).unwrap();
        let tool = GetInventoryTool::new(ledger.clone());

        tool.execute(&JsonMap::new()).await.unwrap();
        tool.execute(&JsonMap::new()).await.unwrap();

        assert_eq!(ledger.read().await.quantity("apples"), Some(5));
        assert_eq!(ledger.read().await.len(), 1);
    }
}
