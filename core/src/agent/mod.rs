//! Reasoning/acting control loop

pub mod controller;
pub mod parser;
pub mod prompt;

pub use controller::Controller;
pub use parser::Directive;
pub use prompt::build_system_prompt;
