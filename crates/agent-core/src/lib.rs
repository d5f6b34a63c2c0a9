//! # agent-core
//!
//! Core dialogue machinery with a provider-agnostic chat-backend abstraction
//! and a structured tool-dispatch layer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DialogueLoop                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Transcript │  │    Tool     │  │   ChatBackend       │  │
//! │  │  (windowed) │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `ChatBackend` trait enables swapping between OpenAI-compatible
//! services or any other chat-completions provider without changing dialogue
//! logic. Tool calls requested by the backend are dispatched through the
//! `ToolRegistry`, which converts every failure mode into a structured error
//! payload so one bad request never aborts a batch.

pub mod dialogue;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

pub use dialogue::{DialogueConfig, DialogueLoop};
pub use error::{AgentError, DispatchError, Result};
pub use message::{Message, Role, Transcript};
pub use provider::{ChatBackend, ChatTurn, GenerationOptions};
pub use tool::{Tool, ToolCall, ToolPayload, ToolRegistry, ToolResult, ToolSchema};
