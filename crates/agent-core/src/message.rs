//! Transcript Messages
//!
//! Standard turn format used across the agent system, plus the bounded
//! transcript window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tool::{ToolCall, ToolResult};

/// Role of a message sender
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response or operation-request batch
    Assistant,
    /// Tool result (one per executed call)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single turn in a transcript
///
/// An assistant turn carries either text `content` or a non-empty batch of
/// `tool_calls`, never both. A tool turn carries the serialized result
/// payload as `content`, tagged with the correlation id and tool name of the
/// call it answers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content (`None` for operation-request-only assistant turns)
    pub content: Option<String>,

    /// Operation requests produced by the backend, preserved verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    /// Correlation id of the call this turn answers (tool turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Name of the tool that produced this turn (tool turns only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: Option<String>) -> Self {
        Self {
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, Some(content.into()))
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, Some(content.into()))
    }

    /// Create a plain-text assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Some(content.into()))
    }

    /// Create an assistant operation-request turn
    ///
    /// The backend-assigned correlation ids inside `tool_calls` are kept
    /// as-is so the following tool turns can reference them on replay.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        let mut msg = Self::new(Role::Assistant, None);
        msg.tool_calls = tool_calls;
        msg
    }

    /// Create a tool turn from an executed result
    pub fn tool_result(result: &ToolResult) -> Self {
        let mut msg = Self::new(Role::Tool, Some(result.payload.to_wire()));
        msg.tool_call_id = Some(result.id.clone());
        msg.name = Some(result.name.clone());
        msg
    }

    /// Whether this turn is an operation-request batch
    pub fn is_tool_request(&self) -> bool {
        self.role == Role::Assistant && !self.tool_calls.is_empty()
    }
}

/// Default transcript window, counted in turns including the system turn
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Bounded conversation transcript
///
/// Turn 0 is always the immutable system instruction. Growth is bounded by
/// `max_turns`: before each user turn, everything but the system turn and the
/// most recent turns is discarded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,

    #[serde(default = "default_max_turns")]
    max_turns: usize,
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}

impl Transcript {
    /// Create a transcript seeded with the system instruction
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Override the window size (must be at least 2: system + one turn)
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(2);
        self
    }

    /// Add a turn
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all turns
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last turn
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Trim to the configured window
    ///
    /// Retains turn 0 plus the most recent `max_turns - 1` turns. The cut
    /// never separates an operation-request turn from its result turns: if
    /// it would land on orphaned tool turns, it advances past them so the
    /// whole group is discarded together with its request.
    pub fn trim_to_window(&mut self) {
        if self.messages.len() <= self.max_turns {
            return;
        }

        let mut cut = self.messages.len() - (self.max_turns - 1);
        while cut < self.messages.len() && self.messages[cut].role == Role::Tool {
            cut += 1;
        }

        let dropped = cut - 1;
        let mut kept = Vec::with_capacity(1 + self.messages.len() - cut);
        kept.push(self.messages[0].clone());
        kept.extend(self.messages.drain(cut..));
        self.messages = kept;

        tracing::debug!(dropped, retained = self.messages.len(), "Trimmed transcript window");
    }
}
