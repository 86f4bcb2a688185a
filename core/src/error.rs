//! Error types and handling for the Gaia agent core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Gaia agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Gaia agent core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reasoning engine errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool dispatch errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Control loop errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Final answer formatting errors
    #[error("Answer error: {0}")]
    Answer(#[from] AnswerError),

    /// Trajectory recording errors
    #[error("Trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing API key: set {env_var} or add it to the config file")]
    MissingApiKey { env_var: String },

    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {message}")]
    InvalidFormat { message: String },
}

/// Reasoning engine errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Tool dispatch errors.
///
/// These never abort the control loop: the registry returns them as data
/// inside a [`crate::tools::ToolResult`] and the controller feeds them back
/// to the reasoning engine as observations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Unsupported operation: {operation}. Use one of: add, subtract, multiply, divide, modulus, or try the wolfram tool for complex math")]
    InvalidOperation { operation: String },

    #[error("Cannot divide by zero")]
    DivisionByZero,

    #[error("Upstream failure: {message}")]
    UpstreamFailure { message: String },

    #[error("No results found for query: {query}")]
    NoResults { query: String },

    #[error("Invalid URL (only http and https are supported): {url}")]
    InvalidUrl { url: String },

    #[error("Failed to fetch page: {message}")]
    FetchFailure { message: String },
}

/// Control loop errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Maximum iterations exceeded: {max_steps}")]
    LoopExceeded { max_steps: usize },

    #[error("Run cancelled by caller")]
    Cancelled,
}

/// Final answer formatting errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnswerError {
    #[error("Format violation: {message}")]
    FormatViolation { message: String },
}

/// Trajectory recording errors
#[derive(Error, Debug)]
pub enum TrajectoryError {
    #[error("Failed to record trajectory: {message}")]
    RecordingFailed { message: String },

    #[error("Failed to load trajectory: {path}")]
    LoadFailed { path: String },
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}
