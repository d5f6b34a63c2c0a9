//! Dialogue Loop
//!
//! Drives one user turn against the chat backend: offer the tool catalog,
//! execute any requested operation batch, feed the structured results back,
//! and return the backend's final natural-language reply.
//!
//! The loop makes at most two backend calls per user turn. The second is a
//! pure summarization call with no catalog offered, so the backend cannot
//! chain further operation batches within the same turn.

use std::sync::Arc;

use crate::error::Result;
use crate::message::{Message, Transcript};
use crate::provider::{ChatBackend, GenerationOptions};
use crate::tool::ToolRegistry;

/// Dialogue loop configuration
#[derive(Clone, Debug, Default)]
pub struct DialogueConfig {
    /// Generation options for both backend calls
    pub options: GenerationOptions,
}

/// The dialogue loop controller
pub struct DialogueLoop {
    backend: Arc<dyn ChatBackend>,
    tools: Arc<ToolRegistry>,
    config: DialogueConfig,
}

impl DialogueLoop {
    /// Create a new dialogue loop
    pub fn new(backend: Arc<dyn ChatBackend>, tools: Arc<ToolRegistry>, config: DialogueConfig) -> Self {
        Self {
            backend,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(backend: Arc<dyn ChatBackend>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(backend, tools, DialogueConfig::default())
    }

    /// Generation options used for both backend calls
    pub fn options(&self) -> &GenerationOptions {
        &self.config.options
    }

    /// Process one user turn, always yielding user-facing text
    ///
    /// Backend failures abort the turn and surface as a fixed apology string
    /// carrying the failure kind; operation-request and result turns already
    /// appended for this batch are not rolled back. The caller appends the
    /// returned text as an assistant turn when non-empty.
    pub async fn run_turn(&self, transcript: &mut Transcript, user_input: &str) -> String {
        match self.process_turn(transcript, user_input).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(error = %err, "Turn aborted by backend failure");
                err.user_message()
            }
        }
    }

    async fn process_turn(&self, transcript: &mut Transcript, user_input: &str) -> Result<String> {
        transcript.trim_to_window();
        transcript.push(Message::user(user_input));

        let catalog = self.tools.schemas();
        let first = self
            .backend
            .chat(transcript.messages(), &catalog, &self.config.options)
            .await?;

        if !first.has_tool_calls() {
            return Ok(first.content.unwrap_or_default());
        }

        tracing::debug!(batch = first.tool_calls.len(), "Backend requested operations");

        let calls = first.tool_calls;
        transcript.push(Message::assistant_tool_calls(calls.clone()));
        for call in &calls {
            let result = self.tools.dispatch(call).await;
            transcript.push(Message::tool_result(&result));
        }

        let second = self
            .backend
            .chat(transcript.messages(), &[], &self.config.options)
            .await?;

        if second.has_tool_calls() {
            tracing::warn!("Backend requested operations on the summarization call; not executed");
        }

        Ok(second.content.unwrap_or_default())
    }
}
