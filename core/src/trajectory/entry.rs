//! Trajectory entry types

use crate::tools::{ToolCall, ToolResult};
use crate::trace::FinalAnswer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped event in a question's execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryEntry {
    /// When this entry was recorded
    pub timestamp: DateTime<Utc>,

    /// The event payload
    #[serde(flatten)]
    pub event: Event,
}

/// Event payloads recorded during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A question's run started
    TaskStart { question: String },

    /// The reasoning engine produced a turn
    EngineReply { step: usize, text: String },

    /// A tool was dispatched and returned a result
    ToolDispatch {
        step: usize,
        call: ToolCall,
        result: ToolResult,
    },

    /// The loop terminated
    TaskComplete {
        answer: FinalAnswer,
        steps: usize,
        duration_ms: u64,
    },
}

impl TrajectoryEntry {
    fn new(event: Event) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn task_start<S: Into<String>>(question: S) -> Self {
        Self::new(Event::TaskStart {
            question: question.into(),
        })
    }

    pub fn engine_reply<S: Into<String>>(step: usize, text: S) -> Self {
        Self::new(Event::EngineReply {
            step,
            text: text.into(),
        })
    }

    pub fn tool_dispatch(step: usize, call: ToolCall, result: ToolResult) -> Self {
        Self::new(Event::ToolDispatch { step, call, result })
    }

    pub fn task_complete(answer: FinalAnswer, steps: usize, duration_ms: u64) -> Self {
        Self::new(Event::TaskComplete {
            answer,
            steps,
            duration_ms,
        })
    }
}
