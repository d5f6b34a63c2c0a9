//! Chat Backend Strategy Pattern
//!
//! Defines a common interface for chat-completions backends (OpenAI-style
//! APIs, local inference servers, test doubles) so the dialogue loop can
//! work with any of them without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{ChatBackend, GenerationOptions};
//!
//! let backend = OpenAiBackend::from_env()?;
//! let turn = backend.chat(transcript.messages(), &catalog, &options).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::tool::{ToolCall, ToolSchema};

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_top_p() -> f32 {
    0.9
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}

/// One assistant response from the backend
///
/// Exactly one of `content` / `tool_calls` is populated in this design's
/// usage: plain text ends the turn, a non-empty batch of calls starts the
/// dispatch phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Text reply, if the backend answered directly
    pub content: Option<String>,

    /// Operation requests, if the backend chose to call tools
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl ChatTurn {
    /// Whether the backend requested any operations
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Strategy trait for chat-completions backends
///
/// Implement this trait to add support for new services. The dialogue loop
/// works exclusively through this interface.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Request one completion
    ///
    /// `tools` is the catalog offered for this call; an empty slice means no
    /// catalog is offered at all (a pure summarization call).
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<ChatTurn>;

    /// Check if the backend is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;
}
