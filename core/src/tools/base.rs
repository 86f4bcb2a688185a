//! Base tool trait and call/result structures

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Declared type of one tool parameter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Any JSON number
    Number,

    /// A JSON string
    Text,
}

/// Typed descriptor for one named tool parameter.
///
/// Parameter order matters: the controller maps the bracketed positional
/// arguments of an `Action:` directive onto the declared order.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Trait for all tool adapters.
///
/// Adapters are pure request/response: stateless apart from immutable
/// configuration, no internal retries, and any timeout surfaces as a
/// [`ToolError::UpstreamFailure`] rather than hanging.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Identifier used in `Action:` directives
    fn name(&self) -> &str;

    /// One-line description shown in the system prompt
    fn description(&self) -> &str;

    /// Ordered parameter descriptors, validated by the registry before dispatch
    fn params(&self) -> &[ParamSpec];

    /// Execute a call whose arguments have already been validated
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Render `name[param1, param2, ...]` for the system prompt
    fn signature(&self) -> String {
        let params: Vec<&str> = self.params().iter().map(|p| p.name).collect();
        format!("{}[{}]", self.name(), params.join(", "))
    }
}

/// A validated call to a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Named arguments with typed JSON values
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<S: Into<String>>(name: S, arguments: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }

    /// Get a required string argument
    pub fn text_arg(&self, key: &str) -> Result<&str, ToolError> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments {
                message: format!("missing or non-string argument: {}", key),
            })
    }

    /// Get an optional string argument
    pub fn text_arg_opt(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }

    /// Get a required numeric argument
    pub fn number_arg(&self, key: &str) -> Result<f64, ToolError> {
        self.arguments
            .get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| ToolError::InvalidArguments {
                message: format!("missing or non-numeric argument: {}", key),
            })
    }
}

/// Outcome of a tool dispatch.
///
/// Errors are carried as data so the controller can fold them into the
/// trace as observations; nothing raises past the registry boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ToolResult {
    Success { content: String },
    Error { error: ToolError },
}

impl ToolResult {
    pub fn success<S: Into<String>>(content: S) -> Self {
        Self::Success {
            content: content.into(),
        }
    }

    pub fn error(error: ToolError) -> Self {
        Self::Error { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The observation text fed back to the reasoning engine. Errors are
    /// prefixed with a marker so the engine can see and react to them.
    pub fn observation(&self) -> String {
        match self {
            Self::Success { content } => content.clone(),
            Self::Error { error } => format!("TOOL ERROR: {}", error),
        }
    }
}

impl From<Result<String, ToolError>> for ToolResult {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(content) => Self::Success { content },
            Err(error) => Self::Error { error },
        }
    }
}
