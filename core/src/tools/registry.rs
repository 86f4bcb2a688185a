//! Tool registry: lookup, schema validation and dispatch

use crate::error::ToolError;
use crate::tools::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps tool identifiers to adapters and validates calls before dispatch.
///
/// The registry is read-mostly after initialization and can be shared
/// behind an `Arc` by any number of concurrently running controllers.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool adapter under its own name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// All registered tool names, sorted for stable prompt rendering
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Ordered parameter descriptors for a tool, if registered
    pub fn params_of(&self, name: &str) -> Option<&[ParamSpec]> {
        self.tools.get(name).map(|t| t.params())
    }

    /// Render `name[a, b, ...] - description` lines for the system prompt
    pub fn signatures(&self) -> Vec<String> {
        self.list()
            .into_iter()
            .map(|name| {
                let tool = &self.tools[name];
                format!("{} - {}", tool.signature(), tool.description())
            })
            .collect()
    }

    /// Validate and execute one call, invoking at most one adapter.
    ///
    /// Unknown tools and schema mismatches are returned as error results
    /// without touching any adapter; adapter failures come back as data.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.tools.get(&call.name) {
            Some(tool) => tool,
            None => {
                return ToolResult::error(ToolError::UnknownTool {
                    name: call.name.clone(),
                })
            }
        };

        if let Err(error) = validate_arguments(tool.params(), call) {
            return ToolResult::error(error);
        }

        debug!(tool = %call.name, id = %call.id, "dispatching tool call");
        tool.execute(call).await
    }
}

impl Default for ToolRegistry {
    /// Registry with all five built-in adapters. The Wolfram adapter is
    /// registered unkeyed and reports an upstream failure if used without
    /// an app id; use [`ToolRegistry::with_builtins`] to key it.
    fn default() -> Self {
        Self::with_builtins("")
    }
}

impl ToolRegistry {
    /// Build a registry with all built-in adapters and the given Wolfram
    /// Alpha app id
    pub fn with_builtins(wolfram_app_id: &str) -> Self {
        use crate::tools::builtin::{Calculator, PageExtractor, WebSearch, WikiSearch, WolframQuery};

        let mut registry = Self::new();
        registry.register(Arc::new(Calculator::new()));
        registry.register(Arc::new(WolframQuery::new(wolfram_app_id)));
        registry.register(Arc::new(WikiSearch::new()));
        registry.register(Arc::new(WebSearch::new()));
        registry.register(Arc::new(PageExtractor::new()));
        registry
    }
}

/// Check argument presence and JSON type against the declared params
fn validate_arguments(params: &[ParamSpec], call: &ToolCall) -> Result<(), ToolError> {
    for param in params {
        match call.arguments.get(param.name) {
            None if param.required => {
                return Err(ToolError::InvalidArguments {
                    message: format!("missing required argument: {}", param.name),
                });
            }
            None => {}
            Some(value) => {
                let matches = match param.kind {
                    ParamKind::Number => value.is_number(),
                    ParamKind::Text => value.is_string(),
                };
                if !matches {
                    return Err(ToolError::InvalidArguments {
                        message: format!(
                            "argument '{}' has wrong type, expected {:?}",
                            param.name, param.kind
                        ),
                    });
                }
            }
        }
    }

    let known: Vec<&str> = params.iter().map(|p| p.name).collect();
    if let Some(unexpected) = call.arguments.keys().find(|k| !known.contains(&k.as_str())) {
        return Err(ToolError::InvalidArguments {
            message: format!("unexpected argument: {}", unexpected),
        });
    }

    Ok(())
}

/// Coerce raw positional argument strings into a typed argument mapping.
///
/// This is how the controller turns `Action: calculator[7, 6, multiply]`
/// into a [`ToolCall`]: each raw string lands on the parameter in the same
/// position, parsed according to the declared kind.
pub fn coerce_positional(
    params: &[ParamSpec],
    raw: &[String],
) -> Result<serde_json::Map<String, Value>, ToolError> {
    if raw.len() > params.len() {
        return Err(ToolError::InvalidArguments {
            message: format!("expected at most {} arguments, got {}", params.len(), raw.len()),
        });
    }

    let mut arguments = serde_json::Map::new();
    for (param, value) in params.iter().zip(raw.iter()) {
        let value = value.trim();
        let json = match param.kind {
            ParamKind::Number => {
                let number: f64 = value.parse().map_err(|_| ToolError::InvalidArguments {
                    message: format!("argument '{}' is not a number: {}", param.name, value),
                })?;
                // Preserve integers as integers so adapters see clean values
                if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
                    Value::from(number as i64)
                } else {
                    Value::from(number)
                }
            }
            ParamKind::Text => Value::from(value),
        };
        arguments.insert(param.name.to_string(), json);
    }

    Ok(arguments)
}
