//! Reasoning engine abstraction and providers

pub mod client;
pub mod message;
pub mod openrouter;

pub use client::ReasoningEngine;
pub use message::{ChatMessage, Role};
pub use openrouter::OpenRouterEngine;
