//! # gaia-core
//!
//! Core library for the Gaia agent: a ReAct (Thought/Action/Observation)
//! control loop for multi-step benchmark questions, with a validated tool
//! registry, an injected reasoning engine, and strict final-answer
//! formatting for exact-match grading.

// Core modules
pub mod agent;
pub mod answer;
pub mod config;
pub mod error;
pub mod llm;
pub mod tools;
pub mod trace;
pub mod trajectory;

// Re-export commonly used types
pub use agent::Controller;
pub use config::{AgentConfig, LlmConfig, Settings};
pub use error::{Error, Result};
pub use llm::{OpenRouterEngine, ReasoningEngine};
pub use tools::ToolRegistry;
pub use trace::{FinalAnswer, Question, Trace};
pub use trajectory::TrajectoryRecorder;

/// Current version of the gaia-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
