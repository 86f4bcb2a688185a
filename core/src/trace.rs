//! Data model for one question's reasoning history
//!
//! A [`Trace`] is owned by exactly one controller invocation. It grows
//! monotonically: steps are appended after each loop iteration and never
//! mutated afterwards. External callers may serialize it for logging; the
//! core itself never persists it.

use crate::llm::{ChatMessage, Role};
use crate::tools::ToolCall;
use serde::{Deserialize, Serialize};

/// An immutable benchmark question plus optional attachment metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The question text
    pub text: String,

    /// Optional reference to an attached file
    pub file: Option<String>,
}

impl Question {
    /// Create a question without attachments
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            file: None,
        }
    }

    /// Attach a file reference
    pub fn with_file<S: Into<String>>(mut self, file: S) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// One Thought/Action/Observation triple, produced once per loop iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Free-text reasoning emitted by the engine this turn
    pub thought: String,

    /// The tool call dispatched this turn, if any
    pub action: Option<ToolCall>,

    /// Tool output or error text fed back to the engine, if any
    pub observation: Option<String>,
}

impl ReasoningStep {
    /// A step that only carries reasoning text
    pub fn thought_only<S: Into<String>>(thought: S) -> Self {
        Self {
            thought: thought.into(),
            action: None,
            observation: None,
        }
    }

    /// A step that dispatched a tool and recorded its observation
    pub fn acted<S: Into<String>>(thought: S, action: ToolCall, observation: S) -> Self {
        Self {
            thought: thought.into(),
            action: Some(action),
            observation: Some(observation.into()),
        }
    }
}

/// Ordered history of one question's reasoning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    /// The fixed instruction text, first element of every transcript
    pub system_prompt: String,

    /// The question being answered
    pub question: Question,

    /// Append-only list of reasoning steps
    steps: Vec<ReasoningStep>,
}

impl Trace {
    /// Seed a trace with the system prompt and question
    pub fn new<S: Into<String>>(system_prompt: S, question: Question) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            question,
            steps: Vec::new(),
        }
    }

    /// Append a completed step
    pub fn push(&mut self, step: ReasoningStep) {
        self.steps.push(step);
    }

    /// Number of steps recorded so far
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether any steps have been recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All recorded steps, oldest first
    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    /// Render the trace as the chat transcript sent to the reasoning engine.
    ///
    /// Each past step becomes an assistant message (the engine's own words)
    /// followed by a user message carrying the observation, so the engine
    /// always sees a causally ordered history.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2 + self.steps.len() * 2);
        messages.push(ChatMessage::new(Role::System, &self.system_prompt));

        let mut question_text = self.question.text.clone();
        if let Some(file) = &self.question.file {
            question_text.push_str(&format!("\n\nAttached file: {}", file));
        }
        messages.push(ChatMessage::new(Role::User, question_text));

        for step in &self.steps {
            messages.push(ChatMessage::new(Role::Assistant, &step.thought));
            if let Some(observation) = &step.observation {
                messages.push(ChatMessage::new(
                    Role::User,
                    format!("Observation: {}", observation),
                ));
            }
        }

        messages
    }
}

/// Declared type of a final answer, driving its formatting rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// A bare numeral
    Number,

    /// A short phrase
    Text,

    /// A separated sequence of numbers and/or phrases
    List,
}

/// The terminal answer string extracted from a trace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalAnswer {
    /// The answer payload, exactly as it will be graded
    pub value: String,

    /// Which formatting rules apply
    pub kind: AnswerKind,
}

impl FinalAnswer {
    /// Sentinel returned when the loop is cut off without any candidate
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new<S: Into<String>>(value: S, kind: AnswerKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// The designated best-effort answer for a forced termination
    pub fn unknown() -> Self {
        Self::new(Self::UNKNOWN, AnswerKind::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_renders_causally_ordered_transcript() {
        let mut trace = Trace::new("system", Question::new("What is 7 times 6?"));
        trace.push(ReasoningStep {
            thought: "Thought: multiply them\nAction: calculator[7, 6, multiply]".to_string(),
            action: None,
            observation: Some("42".to_string()),
        });

        let messages = trace.to_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3].role, Role::User);
        assert!(messages[3].content.starts_with("Observation: 42"));
    }

    #[test]
    fn question_file_reference_appears_in_transcript() {
        let trace = Trace::new(
            "system",
            Question::new("Summarize the attachment").with_file("data.csv"),
        );
        let messages = trace.to_messages();
        assert!(messages[1].content.contains("Attached file: data.csv"));
    }

    #[test]
    fn trace_round_trips_through_serde() {
        let mut trace = Trace::new("system", Question::new("q"));
        trace.push(ReasoningStep::thought_only("just thinking"));

        let json = serde_json::to_string(&trace).unwrap();
        let restored: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.steps()[0].thought, "just thinking");
    }
}
