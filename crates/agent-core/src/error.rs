//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
///
/// These cover the backend boundary and process-level concerns. Failures
/// inside tool dispatch are the separate [`DispatchError`]: they are data,
/// converted to structured payloads, and never propagate.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Chat backend returned an error response
    #[error("Backend error: {0}")]
    Provider(String),

    /// Backend unavailable or not responding
    #[error("Backend unavailable: {0}")]
    ProviderUnavailable(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::ProviderUnavailable(_) | AgentError::RateLimited(_) | AgentError::Io(_)
        )
    }

    /// Convert to a user-facing apology carrying the failure kind
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Provider(msg) => {
                format!("Sorry, an error occurred while talking to the AI model: {msg}")
            }
            AgentError::ProviderUnavailable(msg) => {
                format!("Sorry, the AI model is currently unreachable: {msg}")
            }
            AgentError::Auth(_) => {
                "Authentication error: make sure your OPENAI_API_KEY is set correctly.".into()
            }
            AgentError::RateLimited(_) => {
                "Sorry, too many requests right now. Please wait a moment and try again.".into()
            }
            _ => "Sorry, an unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}

/// Failure modes of a single tool dispatch
///
/// Never returned from [`ToolRegistry::dispatch`](crate::tool::ToolRegistry):
/// each variant is rendered into an error payload tagged with the original
/// call id so sibling requests in the same batch still execute.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Requested operation is not in the catalog
    #[error("Unknown operation '{0}'.")]
    UnknownOperation(String),

    /// Argument payload is not valid JSON
    #[error("Malformed JSON arguments: {0}.")]
    MalformedArguments(String),

    /// Arguments parsed but do not match the parameter schema
    #[error("Invalid arguments for '{name}': {detail}.")]
    InvalidArguments { name: String, detail: String },

    /// The tool itself failed unexpectedly
    #[error("Execution of '{name}' failed: {cause}.")]
    ExecutionFailure { name: String, cause: String },
}
