//! Reasoning/acting controller
//!
//! Drives the Thought → Action → Observation loop for one question. The
//! loop is strictly sequential: each reasoning-engine call and each tool
//! dispatch blocks before the next step is issued, so the engine always
//! sees a causally ordered trace.

use crate::agent::parser::{self, Directive};
use crate::agent::prompt::build_system_prompt;
use crate::answer;
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::llm::ReasoningEngine;
use crate::tools::{coerce_positional, ToolCall, ToolRegistry, ToolResult};
use crate::trace::{FinalAnswer, Question, ReasoningStep, Trace};
use crate::trajectory::{TrajectoryEntry, TrajectoryRecorder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Control loop states
enum State {
    /// Submit the trace to the engine and parse its reply
    Reasoning,

    /// A recognized Action: coerce arguments and dispatch the tool
    Dispatching {
        thought: String,
        tool: String,
        raw_args: Vec<String>,
    },

    /// A final answer was produced or the loop was cut off
    Terminated(FinalAnswer),
}

/// One controller drives one question at a time; the registry handle may
/// be shared across any number of parallel controllers.
pub struct Controller {
    config: AgentConfig,
    engine: Arc<dyn ReasoningEngine>,
    registry: Arc<ToolRegistry>,
    recorder: Option<TrajectoryRecorder>,
    cancel: Arc<AtomicBool>,
}

impl Controller {
    pub fn new(
        config: AgentConfig,
        engine: Arc<dyn ReasoningEngine>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            config,
            engine,
            registry,
            recorder: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a trajectory recorder
    pub fn with_recorder(mut self, recorder: TrajectoryRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Use a shared cancellation flag. The flag is checked cooperatively
    /// at the top of each Reasoning step; a dispatch in flight completes.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn recorder(&self) -> Option<&TrajectoryRecorder> {
        self.recorder.as_ref()
    }

    /// Answer one question, returning the validated (or best-effort) final
    /// answer together with the full trace for external logging.
    pub async fn run(&self, question: Question) -> Result<(FinalAnswer, Trace)> {
        let start_time = Instant::now();
        let mut trace = Trace::new(build_system_prompt(&self.registry), question);
        let mut corrections = 0usize;
        let mut candidate: Option<FinalAnswer> = None;
        let mut state = State::Reasoning;

        self.record(TrajectoryEntry::task_start(trace.question.text.clone()))
            .await;
        info!(model = self.engine.model_name(), "starting question");

        let answer = loop {
            state = match state {
                State::Reasoning => {
                    if self.cancel.load(Ordering::Relaxed) {
                        warn!("run cancelled between iterations");
                        return Err(AgentError::Cancelled.into());
                    }
                    if trace.len() >= self.config.max_steps {
                        warn!(max_steps = self.config.max_steps, "iteration bound hit");
                        State::Terminated(forced_answer(candidate.take()))
                    } else {
                        let reply = self.engine.reason(&trace.to_messages()).await?;
                        self.record(TrajectoryEntry::engine_reply(trace.len() + 1, reply.clone()))
                            .await;

                        match parser::parse(&reply) {
                            Directive::Finish { payload } => {
                                let kind = answer::classify(&payload);
                                let attempt = FinalAnswer::new(payload, kind);
                                match answer::validate(attempt.clone()) {
                                    Ok(valid) => {
                                        trace.push(ReasoningStep::thought_only(reply));
                                        State::Terminated(valid)
                                    }
                                    Err(violation) => {
                                        // Keep the rejected payload as the
                                        // best-effort candidate for a cutoff.
                                        candidate = Some(attempt);
                                        corrections += 1;
                                        if corrections > self.config.max_correction_retries {
                                            trace.push(ReasoningStep::thought_only(reply));
                                            State::Terminated(forced_answer(candidate.take()))
                                        } else {
                                            debug!(%violation, "final answer rejected");
                                            trace.push(ReasoningStep {
                                                thought: reply,
                                                action: None,
                                                observation: Some(format!(
                                                    "FORMAT ERROR: {}. Reply again with a corrected FINAL ANSWER line.",
                                                    violation
                                                )),
                                            });
                                            State::Reasoning
                                        }
                                    }
                                }
                            }
                            Directive::Action { tool, raw_args } => {
                                corrections = 0;
                                State::Dispatching {
                                    thought: reply,
                                    tool,
                                    raw_args,
                                }
                            }
                            Directive::Unparseable => {
                                corrections += 1;
                                if corrections > self.config.max_correction_retries {
                                    trace.push(ReasoningStep::thought_only(reply));
                                    State::Terminated(forced_answer(candidate.take()))
                                } else {
                                    debug!("unparseable engine output, issuing corrective note");
                                    trace.push(ReasoningStep {
                                        thought: reply,
                                        action: None,
                                        observation: Some(
                                            "Your reply matched neither 'Action: tool[arg1, arg2, ...]' \
                                             nor 'FINAL ANSWER: <answer>'. Use exactly one of those forms."
                                                .to_string(),
                                        ),
                                    });
                                    State::Reasoning
                                }
                            }
                        }
                    }
                }

                State::Dispatching {
                    thought,
                    tool,
                    raw_args,
                } => {
                    let (call, result) = self.dispatch(&tool, &raw_args).await;
                    self.record(TrajectoryEntry::tool_dispatch(
                        trace.len() + 1,
                        call.clone(),
                        result.clone(),
                    ))
                    .await;

                    trace.push(ReasoningStep {
                        thought,
                        action: Some(call),
                        observation: Some(result.observation()),
                    });
                    State::Reasoning
                }

                State::Terminated(answer) => break answer,
            };
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(answer = %answer.value, steps = trace.len(), duration_ms, "question finished");
        self.record(TrajectoryEntry::task_complete(
            answer.clone(),
            trace.len(),
            duration_ms,
        ))
        .await;

        Ok((answer, trace))
    }

    /// Coerce positional arguments and dispatch through the registry.
    /// Every failure mode comes back as an error-carrying result.
    async fn dispatch(&self, tool: &str, raw_args: &[String]) -> (ToolCall, ToolResult) {
        match self.registry.params_of(tool) {
            Some(params) => match coerce_positional(params, raw_args) {
                Ok(arguments) => {
                    let call = ToolCall::new(tool, arguments);
                    let result = self.registry.dispatch(&call).await;
                    (call, result)
                }
                Err(error) => (
                    ToolCall::new(tool, serde_json::Map::new()),
                    ToolResult::error(error),
                ),
            },
            // Unknown tool: let the registry produce the canonical error.
            None => {
                let call = ToolCall::new(tool, serde_json::Map::new());
                let result = self.registry.dispatch(&call).await;
                (call, result)
            }
        }
    }

    async fn record(&self, entry: TrajectoryEntry) {
        if let Some(recorder) = &self.recorder {
            if let Err(e) = recorder.record(entry).await {
                warn!("failed to record trajectory entry: {}", e);
            }
        }
    }
}

/// Best-effort answer for a forced termination: the last candidate seen,
/// or the designated sentinel if none exists.
fn forced_answer(candidate: Option<FinalAnswer>) -> FinalAnswer {
    candidate.unwrap_or_else(FinalAnswer::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::error::Error;
    use crate::llm::ChatMessage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub engine that replays scripted turns
    struct ScriptedEngine {
        turns: Mutex<Vec<String>>,
    }

    impl ScriptedEngine {
        fn new(turns: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                turns: Mutex::new(turns.iter().rev().map(|s| s.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl ReasoningEngine for ScriptedEngine {
        async fn reason(&self, _messages: &[ChatMessage]) -> Result<String> {
            self.turns
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| Error::Generic("script exhausted".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }

        fn provider_name(&self) -> &str {
            "test"
        }
    }

    fn controller(engine: Arc<ScriptedEngine>, config: AgentConfig) -> Controller {
        Controller::new(config, engine, Arc::new(ToolRegistry::default()))
    }

    #[tokio::test]
    async fn multiplication_question_runs_to_answer() {
        let engine = ScriptedEngine::new(&[
            "Thought: I should multiply.\nAction: calculator[7, 6, multiply]",
            "Thought: The observation says 42.\nFINAL ANSWER: 42",
        ]);
        let ctrl = controller(engine, AgentConfig::default());

        let (answer, trace) = ctrl.run(Question::new("What is 7 times 6?")).await.unwrap();
        assert_eq!(answer.value, "42");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].observation.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn division_by_zero_becomes_observation_and_loop_continues() {
        let engine = ScriptedEngine::new(&[
            "Action: calculator[10, 0, divide]",
            "Thought: that failed, it is undefined.\nFINAL ANSWER: undefined",
        ]);
        let ctrl = controller(engine, AgentConfig::default());

        let (answer, trace) = ctrl.run(Question::new("What is 10 / 0?")).await.unwrap();
        assert_eq!(answer.value, "undefined");
        let observation = trace.steps()[0].observation.as_deref().unwrap();
        assert!(observation.starts_with("TOOL ERROR: "));
        assert!(observation.contains("divide by zero"));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_observation_without_terminating() {
        let engine = ScriptedEngine::new(&[
            "Action: teleport[somewhere]",
            "Thought: no such tool.\nFINAL ANSWER: 1",
        ]);
        let ctrl = controller(engine, AgentConfig::default());

        let (answer, trace) = ctrl.run(Question::new("q")).await.unwrap();
        assert_eq!(answer.value, "1");
        let observation = trace.steps()[0].observation.as_deref().unwrap();
        assert!(observation.contains("Unknown tool: teleport"));
    }

    #[tokio::test]
    async fn unparseable_output_gets_bounded_corrections_then_sentinel() {
        let engine = ScriptedEngine::new(&[
            "I am rambling without a directive.",
            "Still rambling.",
            "More rambling.",
            "Yet more rambling.",
        ]);
        let config = AgentConfig {
            max_correction_retries: 3,
            ..AgentConfig::default()
        };
        let ctrl = controller(engine, config);

        let (answer, trace) = ctrl.run(Question::new("q")).await.unwrap();
        assert_eq!(answer.value, FinalAnswer::UNKNOWN);
        // 3 corrective steps plus the final rejected turn
        assert_eq!(trace.len(), 4);
        assert!(trace.steps()[0]
            .observation
            .as_deref()
            .unwrap()
            .contains("matched neither"));
    }

    #[tokio::test]
    async fn iteration_bound_forces_termination_with_sentinel() {
        let engine = ScriptedEngine::new(&[
            "Action: calculator[1, 1, add]",
            "Action: calculator[2, 2, add]",
            "Action: calculator[3, 3, add]",
        ]);
        let config = AgentConfig {
            max_steps: 3,
            ..AgentConfig::default()
        };
        let ctrl = controller(engine, config);

        let (answer, trace) = ctrl.run(Question::new("q")).await.unwrap();
        assert_eq!(answer.value, FinalAnswer::UNKNOWN);
        assert_eq!(trace.len(), 3);
    }

    #[tokio::test]
    async fn format_violation_feeds_corrective_note_then_accepts_fix() {
        let engine = ScriptedEngine::new(&[
            "FINAL ANSWER: 5,876",
            "Thought: drop the separator.\nFINAL ANSWER: 5876",
        ]);
        let ctrl = controller(engine, AgentConfig::default());

        let (answer, trace) = ctrl.run(Question::new("q")).await.unwrap();
        assert_eq!(answer.value, "5876");
        assert!(trace.steps()[0]
            .observation
            .as_deref()
            .unwrap()
            .starts_with("FORMAT ERROR: "));
    }

    #[tokio::test]
    async fn cancellation_checkpoint_aborts_between_iterations() {
        let engine = ScriptedEngine::new(&["FINAL ANSWER: 42"]);
        let cancel = Arc::new(AtomicBool::new(true));
        let ctrl =
            controller(engine, AgentConfig::default()).with_cancel_flag(cancel);

        let result = ctrl.run(Question::new("q")).await;
        assert!(matches!(
            result,
            Err(Error::Agent(AgentError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn multi_hop_question_mixes_tools() {
        // Encyclopedia lookup then arithmetic, ending in a string;number pair.
        let engine = ScriptedEngine::new(&[
            "Thought: find the surname first.\nAction: teleport[x]",
            "Thought: wrong tool, compute the number.\nAction: calculator[5870, 6, add]",
            "FINAL ANSWER: White; 5876",
        ]);
        let ctrl = controller(engine, AgentConfig::default());

        let (answer, trace) = ctrl.run(Question::new("multi-hop")).await.unwrap();
        assert_eq!(answer.value, "White; 5876");
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.steps()[1].observation.as_deref(), Some("5876"));
    }

    #[tokio::test]
    async fn records_trajectory_when_recorder_attached() {
        let engine = ScriptedEngine::new(&["FINAL ANSWER: 42"]);
        let ctrl = controller(engine, AgentConfig::default())
            .with_recorder(TrajectoryRecorder::new());

        ctrl.run(Question::new("q")).await.unwrap();
        // task_start + engine_reply + task_complete
        assert_eq!(ctrl.recorder().unwrap().entry_count().await, 3);
    }
}
