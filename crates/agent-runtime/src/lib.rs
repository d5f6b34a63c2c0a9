//! # agent-runtime
//!
//! Chat backends for the warehouse-agent system.
//!
//! ## Backends
//!
//! - **OpenAI** (default): chat-completions API with function calling
//! - **Anthropic** (coming soon): Claude API integration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::openai::OpenAiBackend;
//!
//! let backend = OpenAiBackend::from_env()?;
//! let dialogue = DialogueLoop::with_defaults(Arc::new(backend), tools);
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiBackend, OpenAiConfig};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, ChatBackend, DialogueLoop, Message, Result, Role, Tool, ToolRegistry, Transcript,
};
