//! Wolfram Alpha symbolic math query tool

use crate::error::ToolError;
use crate::tools::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const PARAMS: &[ParamSpec] = &[ParamSpec::required("expression", ParamKind::Text)];

const SHORT_ANSWERS_URL: &str = "https://api.wolframalpha.com/v1/result";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Queries the Wolfram Alpha short-answers API for symbolic math.
pub struct WolframQuery {
    client: Client,
    app_id: String,
}

impl WolframQuery {
    pub fn new(app_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            app_id: app_id.into(),
        }
    }

    async fn query(&self, expression: &str) -> Result<String, ToolError> {
        if self.app_id.is_empty() {
            return Err(ToolError::UpstreamFailure {
                message: "missing Wolfram Alpha app id (WOLFRAM_APP_ID)".to_string(),
            });
        }

        let response = self
            .client
            .get(SHORT_ANSWERS_URL)
            .query(&[("appid", self.app_id.as_str()), ("i", expression)])
            .send()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::UpstreamFailure {
                message: e.to_string(),
            })?;

        if !status.is_success() {
            // The short-answers API returns 501 with a plain-text reason
            // when it cannot interpret the input.
            return Err(ToolError::UpstreamFailure {
                message: format!("Wolfram Alpha returned {}: {}", status.as_u16(), body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Tool for WolframQuery {
    fn name(&self) -> &str {
        "wolfram"
    }

    fn description(&self) -> &str {
        "Answer a free-text mathematical query via Wolfram Alpha, e.g. 'integrate x^2' or 'solve x^2 + 3x + 2 = 0'"
    }

    fn params(&self) -> &[ParamSpec] {
        PARAMS
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let expression = match call.text_arg("expression") {
            Ok(expression) => expression,
            Err(error) => return ToolResult::error(error),
        };
        self.query(expression).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_app_id_is_an_upstream_failure() {
        let tool = WolframQuery::new("");
        let mut args = serde_json::Map::new();
        args.insert("expression".to_string(), json!("2+2"));
        let call = ToolCall::new("wolfram", args);

        match tool.execute(&call).await {
            ToolResult::Error {
                error: ToolError::UpstreamFailure { message },
            } => assert!(message.contains("WOLFRAM_APP_ID")),
            other => panic!("expected UpstreamFailure, got {:?}", other),
        }
    }
}
