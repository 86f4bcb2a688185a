//! Basic arithmetic tool

use crate::error::ToolError;
use crate::tools::{ParamKind, ParamSpec, Tool, ToolCall, ToolResult};
use async_trait::async_trait;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::required("a", ParamKind::Number),
    ParamSpec::required("b", ParamKind::Number),
    ParamSpec::required("operation", ParamKind::Text),
];

/// Performs basic arithmetic between two numeric operands.
///
/// Purely local; the only adapter that never touches the network.
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Self
    }

    fn apply(a: f64, b: f64, operation: &str) -> Result<f64, ToolError> {
        match operation {
            "add" | "sum" => Ok(a + b),
            "subtract" => Ok(a - b),
            "multiply" => Ok(a * b),
            "divide" | "div" => {
                if b == 0.0 {
                    Err(ToolError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }
            "modulus" | "mod" => {
                if b == 0.0 {
                    Err(ToolError::DivisionByZero)
                } else {
                    Ok(a % b)
                }
            }
            other => Err(ToolError::InvalidOperation {
                operation: other.to_string(),
            }),
        }
    }

    /// Render without a trailing `.0` so integer answers grade cleanly
    fn render(value: f64) -> String {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform basic arithmetic between two numbers. Operations: add, subtract, multiply, divide, modulus"
    }

    fn params(&self) -> &[ParamSpec] {
        PARAMS
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let result = (|| {
            let a = call.number_arg("a")?;
            let b = call.number_arg("b")?;
            let operation = call.text_arg("operation")?;
            Self::apply(a, b, operation).map(Self::render)
        })();
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(a: f64, b: f64, operation: &str) -> ToolCall {
        let mut args = serde_json::Map::new();
        args.insert("a".to_string(), json!(a));
        args.insert("b".to_string(), json!(b));
        args.insert("operation".to_string(), json!(operation));
        ToolCall::new("calculator", args)
    }

    #[tokio::test]
    async fn supported_operations_are_correct() {
        let calc = Calculator::new();
        let cases = [
            (10.0, 4.0, "add", "14"),
            (10.0, 4.0, "sum", "14"),
            (10.0, 4.0, "subtract", "6"),
            (7.0, 6.0, "multiply", "42"),
            (10.0, 4.0, "divide", "2.5"),
            (10.0, 5.0, "div", "2"),
            (10.0, 4.0, "modulus", "2"),
            (10.0, 4.0, "mod", "2"),
        ];
        for (a, b, op, expected) in cases {
            assert_eq!(
                calc.execute(&call(a, b, op)).await,
                ToolResult::success(expected),
                "{} {} {}",
                a,
                op,
                b
            );
        }
    }

    #[tokio::test]
    async fn divide_by_zero_is_reported() {
        let calc = Calculator::new();
        assert_eq!(
            calc.execute(&call(10.0, 0.0, "divide")).await,
            ToolResult::error(ToolError::DivisionByZero)
        );
        assert_eq!(
            calc.execute(&call(10.0, 0.0, "modulus")).await,
            ToolResult::error(ToolError::DivisionByZero)
        );
    }

    #[tokio::test]
    async fn unrecognized_operation_is_reported() {
        let calc = Calculator::new();
        match calc.execute(&call(1.0, 2.0, "exponent")).await {
            ToolResult::Error {
                error: ToolError::InvalidOperation { operation },
            } => assert_eq!(operation, "exponent"),
            other => panic!("expected InvalidOperation, got {:?}", other),
        }
    }
}
