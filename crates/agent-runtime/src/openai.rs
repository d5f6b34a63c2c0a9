//! OpenAI Chat Backend
//!
//! Implementation of `ChatBackend` against the chat-completions API with
//! function calling. Also works with any OpenAI-compatible endpoint by
//! pointing `OPENAI_BASE_URL` somewhere else.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{ChatBackend, ChatTurn, FinishReason, GenerationOptions, TokenUsage},
    tool::{ToolCall, ToolSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAI backend configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key (required)
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Default model
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Read configuration from the environment
    ///
    /// `OPENAI_API_KEY` is mandatory; `OPENAI_BASE_URL` and `OPENAI_MODEL`
    /// fall back to api.openai.com and gpt-4o-mini.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("OPENAI_BASE_URL").ok(),
            std::env::var("OPENAI_MODEL").ok(),
        )
    }

    fn from_vars(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self> {
        let api_key = api_key.ok_or_else(|| {
            AgentError::Config("OPENAI_API_KEY environment variable is not set".into())
        })?;

        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".into()),
            model: model.unwrap_or_else(|| "gpt-4o-mini".into()),
            timeout_secs: 120,
        })
    }
}

/// OpenAI chat backend
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
}

/// Wire message for a chat-completions request
#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Tool call in the wire format (nested `function` object)
#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAiBackend {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    /// Model this backend was configured with
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Convert transcript turns to the wire format
    ///
    /// Timestamps and other local bookkeeping stay out of the request body.
    fn convert_messages(messages: &[Message]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "tool",
                };
                let tool_calls = if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(m.tool_calls.iter().map(WireToolCall::from_call).collect())
                };
                WireMessage {
                    role,
                    content: m.content.clone(),
                    tool_calls,
                    tool_call_id: m.tool_call_id.clone(),
                    name: m.name.clone(),
                }
            })
            .collect()
    }

    /// Render the tool catalog in the function-calling format
    fn convert_tools(tools: &[ToolSchema]) -> Vec<Value> {
        tools
            .iter()
            .map(|schema| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": schema.name,
                        "description": schema.description,
                        "parameters": schema.parameters_json(),
                    },
                })
            })
            .collect()
    }

    fn build_request(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> ChatRequest {
        let model = if options.model.is_empty() {
            self.config.model.clone()
        } else {
            options.model.clone()
        };
        let (wire_tools, tool_choice) = if tools.is_empty() {
            (None, None)
        } else {
            (Some(Self::convert_tools(tools)), Some("auto"))
        };

        ChatRequest {
            model,
            messages: Self::convert_messages(messages),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            tools: wire_tools,
            tool_choice,
        }
    }

    fn convert_response(response: ChatResponse) -> Result<ChatTurn> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("response contained no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let finish_reason = choice.finish_reason.as_deref().map(|reason| match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" => FinishReason::ToolCalls,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Error,
        });

        Ok(ChatTurn {
            content: choice.message.content,
            tool_calls,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason,
        })
    }

    /// Map a non-success HTTP status to the matching error variant
    fn status_error(status: reqwest::StatusCode, body: String) -> AgentError {
        match status.as_u16() {
            401 | 403 => AgentError::Auth(body),
            429 => AgentError::RateLimited(body),
            _ => AgentError::Provider(format!("{status}: {body}")),
        }
    }
}

impl WireToolCall {
    fn from_call(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function".into(),
            function: WireFunction {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<ChatTurn> {
        let request = self.build_request(messages, tools, options);
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(
            model = %request.model,
            turns = messages.len(),
            catalog = tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Chat completion request failed");
            return Err(Self::status_error(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("invalid response body: {e}")))?;

        Self::convert_response(parsed)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::tool::{ParameterSchema, ToolPayload, ToolResult};

    fn config() -> OpenAiConfig {
        OpenAiConfig {
            api_key: "sk-test".into(),
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            timeout_secs: 5,
        }
    }

    fn catalog() -> Vec<ToolSchema> {
        vec![ToolSchema {
            name: "add_item".into(),
            description: "Add stock".into(),
            parameters: vec![
                ParameterSchema::string("item_name", "Item name"),
                ParameterSchema::integer("quantity", "Units to add"),
            ],
        }]
    }

    #[test]
    fn request_with_catalog_offers_tools() {
        let backend = OpenAiBackend::from_config(config()).unwrap();
        let messages = vec![Message::system("sys"), Message::user("add 5 apples")];
        let request = backend.build_request(&messages, &catalog(), &GenerationOptions::default());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "add_item");
        assert_eq!(
            json["tools"][0]["function"]["parameters"]["required"],
            serde_json::json!(["item_name", "quantity"])
        );
    }

    #[test]
    fn request_without_catalog_omits_tool_fields() {
        let backend = OpenAiBackend::from_config(config()).unwrap();
        let messages = vec![Message::system("sys"), Message::user("hi")];
        let request = backend.build_request(&messages, &[], &GenerationOptions::default());

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("\"tools\""));
        assert!(!json.contains("tool_choice"));
    }

    #[test]
    fn transcript_round_trips_tool_turns() {
        let calls = vec![ToolCall {
            id: "call_1".into(),
            name: "add_item".into(),
            arguments: r#"{"item_name":"apples","quantity":5}"#.into(),
        }];
        let result = ToolResult {
            id: "call_1".into(),
            name: "add_item".into(),
            payload: ToolPayload::success("Added 5 of 'apples'."),
        };

        let messages = vec![Message::assistant_tool_calls(calls), Message::tool_result(&result)];
        let wire = OpenAiBackend::convert_messages(&messages);

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json[0]["role"], "assistant");
        assert_eq!(json[0]["tool_calls"][0]["id"], "call_1");
        assert_eq!(json[0]["tool_calls"][0]["function"]["name"], "add_item");
        assert_eq!(json[1]["role"], "tool");
        assert_eq!(json[1]["tool_call_id"], "call_1");
        // no local bookkeeping on the wire
        assert!(json[0].get("timestamp").is_none());
    }

    #[test]
    fn response_with_tool_calls_parses() {
        let body = r#"{
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "remove_item",
                            "arguments": "{\"item_name\":\"apples\",\"quantity\":2}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        let turn = OpenAiBackend::convert_response(parsed).unwrap();

        assert!(turn.has_tool_calls());
        assert_eq!(turn.tool_calls[0].id, "call_abc");
        assert_eq!(turn.tool_calls[0].name, "remove_item");
        assert_eq!(turn.finish_reason, Some(FinishReason::ToolCalls));
        assert_eq!(turn.usage.as_ref().map(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn response_without_choices_is_an_error() {
        let body = r#"{"model": "gpt-4o-mini", "choices": [], "usage": null}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        let err = OpenAiBackend::convert_response(parsed).unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
    }

    #[test]
    fn status_codes_map_to_error_kinds() {
        let auth = OpenAiBackend::status_error(reqwest::StatusCode::UNAUTHORIZED, "nope".into());
        assert!(matches!(auth, AgentError::Auth(_)));

        let limited =
            OpenAiBackend::status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow".into());
        assert!(matches!(limited, AgentError::RateLimited(_)));
        assert!(limited.is_retryable());

        let server =
            OpenAiBackend::status_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert!(matches!(server, AgentError::Provider(_)));
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = OpenAiConfig::from_vars(None, None, None).unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn config_defaults_apply() {
        let cfg = OpenAiConfig::from_vars(Some("sk-test".into()), None, None).unwrap();
        assert_eq!(cfg.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.model, "gpt-4o-mini");
    }
}
