//! Tool System
//!
//! Catalog schemas, the wire-level result payload, and the dispatch layer
//! that turns one backend-requested call into exactly one structured result.
//!
//! Every failure mode of a dispatch (unknown operation, malformed argument
//! JSON, schema mismatch, unexpected tool failure) is captured and
//! converted into an error payload tagged with the original correlation id,
//! so the dialogue can always continue and sibling calls in a batch still
//! execute.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DispatchError;

/// Argument map handed to a tool after parsing and validation
pub type JsonMap = serde_json::Map<String, Value>;

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// Semantic type: "string" or "integer"
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

impl ParameterSchema {
    /// Required string parameter
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
        }
    }

    /// Required integer parameter
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "integer".into(),
            description: description.into(),
            required: true,
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the model)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Render the JSON-Schema object the chat-completions API expects
    pub fn parameters_json(&self) -> Value {
        let mut properties = JsonMap::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        let mut schema = JsonMap::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), Value::Array(required));
        }
        Value::Object(schema)
    }
}

/// Operation request produced by the backend
///
/// `arguments` is the raw serialized payload exactly as the backend emitted
/// it; it is parsed and validated only at dispatch time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned correlation id
    pub id: String,

    /// Requested operation name
    pub name: String,

    /// Raw JSON argument payload
    pub arguments: String,
}

/// Outcome status of an executed operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStatus {
    Success,
    Error,
}

/// Wire-level operation result
///
/// Serializes as `{"status": "success"|"error"}` plus either a `message`
/// or domain-specific fields such as `inventory`. Domain errors (a missing
/// item, insufficient stock) are carried here as error-status payloads, not
/// as Rust errors: the model sees them and narrates them to the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolPayload {
    pub status: PayloadStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Domain-specific fields, flattened into the payload object
    #[serde(flatten)]
    pub fields: JsonMap,
}

impl ToolPayload {
    /// Success with a human-readable message
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: PayloadStatus::Success,
            message: Some(message.into()),
            fields: JsonMap::new(),
        }
    }

    /// Success carrying a single domain field instead of a message
    pub fn success_with(key: impl Into<String>, value: Value) -> Self {
        let mut fields = JsonMap::new();
        fields.insert(key.into(), value);
        Self {
            status: PayloadStatus::Success,
            message: None,
            fields,
        }
    }

    /// Error with a human-readable message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: PayloadStatus::Error,
            message: Some(message.into()),
            fields: JsonMap::new(),
        }
    }

    /// Whether this payload reports success
    pub fn is_success(&self) -> bool {
        self.status == PayloadStatus::Success
    }

    /// Serialize for the transcript / backend
    pub fn to_wire(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"status":"error","message":"unserializable result"}"#.into())
    }
}

/// Result of one dispatched call, tagged with its correlation id
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Correlation id from the originating [`ToolCall`]
    pub id: String,

    /// Operation name from the originating call
    pub name: String,

    /// Structured outcome
    pub payload: ToolPayload,
}

/// Tool trait - implement to add new operations
///
/// `execute` receives arguments already parsed and validated against
/// [`ToolSchema`]. Domain-level failures must be returned as `Ok` payloads
/// with error status; an `Err` is treated as an unexpected execution
/// failure.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with validated arguments
    async fn execute(&self, arguments: &JsonMap) -> anyhow::Result<ToolPayload>;
}

/// Registry for available tools, doubling as the dispatch table
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all tool schemas (the catalog handed to the backend)
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch one call, producing exactly one result
    ///
    /// Infallible by contract: every failure is rendered into an
    /// error-status payload so the batch and the dialogue continue.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        tracing::debug!(tool = %call.name, id = %call.id, "Dispatching tool call");

        let payload = match self.try_dispatch(call).await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(tool = %call.name, error = %err, "Tool dispatch failed");
                ToolPayload::error(err.to_string())
            }
        };

        ToolResult {
            id: call.id.clone(),
            name: call.name.clone(),
            payload,
        }
    }

    async fn try_dispatch(&self, call: &ToolCall) -> Result<ToolPayload, DispatchError> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| DispatchError::UnknownOperation(call.name.clone()))?;

        let arguments = parse_arguments(&call.name, &call.arguments)?;
        validate_arguments(&tool.schema(), &arguments)?;

        tool.execute(&arguments)
            .await
            .map_err(|err| DispatchError::ExecutionFailure {
                name: call.name.clone(),
                cause: err.to_string(),
            })
    }
}

/// Parse the raw argument payload into an object map
///
/// An empty payload and JSON `null` are accepted as the empty map, matching
/// what backends emit for zero-parameter operations.
fn parse_arguments(name: &str, raw: &str) -> Result<JsonMap, DispatchError> {
    if raw.trim().is_empty() {
        return Ok(JsonMap::new());
    }

    let value: Value = serde_json::from_str(raw)
        .map_err(|err| DispatchError::MalformedArguments(err.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(JsonMap::new()),
        other => Err(DispatchError::InvalidArguments {
            name: name.to_string(),
            detail: format!("argument payload must be a JSON object, got {other}"),
        }),
    }
}

/// Validate parsed arguments against the parameter schema
fn validate_arguments(schema: &ToolSchema, arguments: &JsonMap) -> Result<(), DispatchError> {
    for param in &schema.parameters {
        let Some(value) = arguments.get(&param.name) else {
            if param.required {
                return Err(DispatchError::InvalidArguments {
                    name: schema.name.clone(),
                    detail: format!("missing required parameter '{}'", param.name),
                });
            }
            continue;
        };

        let matches = match param.param_type.as_str() {
            "string" => value.is_string(),
            "integer" => value.is_i64() || value.is_u64(),
            _ => true,
        };
        if !matches {
            return Err(DispatchError::InvalidArguments {
                name: schema.name.clone(),
                detail: format!(
                    "parameter '{}' expects {}, got {value}",
                    param.name, param.param_type
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct EchoTool {
        executions: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo an item name and count".into(),
                parameters: vec![
                    ParameterSchema::string("item_name", "Item to echo"),
                    ParameterSchema::integer("quantity", "How many"),
                ],
            }
        }

        async fn execute(&self, arguments: &JsonMap) -> anyhow::Result<ToolPayload> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            let item = arguments.get("item_name").and_then(Value::as_str).unwrap_or("?");
            Ok(ToolPayload::success(format!("echoed '{item}'")))
        }
    }

    fn registry_with_counter() -> (ToolRegistry, Arc<AtomicU32>) {
        let executions = Arc::new(AtomicU32::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool {
            executions: executions.clone(),
        });
        (registry, executions)
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    #[tokio::test]
    async fn dispatch_success() {
        let (registry, executions) = registry_with_counter();
        let result = registry
            .dispatch(&call("echo", r#"{"item_name":"apples","quantity":5}"#))
            .await;

        assert_eq!(result.id, "call_1");
        assert_eq!(result.name, "echo");
        assert!(result.payload.is_success());
        assert_eq!(executions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_operation_is_error_payload() {
        let (registry, executions) = registry_with_counter();
        let result = registry.dispatch(&call("teleport", "{}")).await;

        assert!(!result.payload.is_success());
        assert_eq!(
            result.payload.message.as_deref(),
            Some("Unknown operation 'teleport'.")
        );
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_arguments_never_reach_the_tool() {
        let (registry, executions) = registry_with_counter();
        let result = registry.dispatch(&call("echo", "{not json")).await;

        assert!(!result.payload.is_success());
        assert!(
            result
                .payload
                .message
                .as_deref()
                .unwrap()
                .starts_with("Malformed JSON arguments")
        );
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_required_parameter_is_invalid() {
        let (registry, executions) = registry_with_counter();
        let result = registry.dispatch(&call("echo", r#"{"item_name":"apples"}"#)).await;

        let message = result.payload.message.unwrap();
        assert!(message.contains("missing required parameter 'quantity'"));
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wrong_type_is_invalid() {
        let (registry, executions) = registry_with_counter();
        let result = registry
            .dispatch(&call("echo", r#"{"item_name":"apples","quantity":"five"}"#))
            .await;

        let message = result.payload.message.unwrap();
        assert!(message.contains("'quantity' expects integer"));
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_arguments_accepted_for_no_param_tools() {
        struct NoParams;

        #[async_trait]
        impl Tool for NoParams {
            fn schema(&self) -> ToolSchema {
                ToolSchema {
                    name: "report".into(),
                    description: "No parameters".into(),
                    parameters: vec![],
                }
            }

            async fn execute(&self, _arguments: &JsonMap) -> anyhow::Result<ToolPayload> {
                Ok(ToolPayload::success_with("inventory", Value::String("empty".into())))
            }
        }

        let mut registry = ToolRegistry::new();
        registry.register(NoParams);

        for raw in ["", "{}", "null"] {
            let result = registry.dispatch(&call("report", raw)).await;
            assert!(result.payload.is_success(), "raw payload {raw:?} rejected");
        }
    }

    #[test]
    fn payload_wire_shapes() {
        assert_eq!(
            ToolPayload::success("Added 5 of 'apples'.").to_wire(),
            r#"{"status":"success","message":"Added 5 of 'apples'."}"#
        );
        assert_eq!(
            ToolPayload::error("Item 'pears' not found.").to_wire(),
            r#"{"status":"error","message":"Item 'pears' not found."}"#
        );
        assert_eq!(
            ToolPayload::success_with("inventory", serde_json::json!({"apples": 3})).to_wire(),
            r#"{"status":"success","inventory":{"apples":3}}"#
        );
    }

    #[test]
    fn parameters_json_shape() {
        let schema = ToolSchema {
            name: "add_item".into(),
            description: "Add stock".into(),
            parameters: vec![
                ParameterSchema::string("item_name", "Name of the item to add."),
                ParameterSchema::integer("quantity", "Number of units to add."),
            ],
        };

        let json = schema.parameters_json();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["item_name"]["type"], "string");
        assert_eq!(json["properties"]["quantity"]["type"], "integer");
        assert_eq!(json["required"], serde_json::json!(["item_name", "quantity"]));
    }
}
