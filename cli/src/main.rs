//! # gaia CLI
//!
//! Command-line front end for the Gaia agent.
//!
//! ## Usage
//!
//! - `gaia "What is 7 times 6?"` - Answer a single question
//! - `gaia --file questions.txt` - Answer a batch of questions in parallel
//! - `gaia tools` - Show available tools

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{run_command, tools_command, RunOptions};

/// gaia - a ReAct agent for multi-step benchmark questions
#[derive(Parser)]
#[command(name = "gaia")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Answer multi-step benchmark questions with a tool-using ReAct loop")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Maximum number of reasoning steps per question
    #[arg(long)]
    max_steps: Option<usize>,

    /// Write the execution trajectory to this JSON file
    #[arg(long)]
    trajectory_file: Option<PathBuf>,

    /// File with one question per line, answered in parallel
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// The question to answer (single-question mode)
    question: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if let Some(Commands::Tools) = cli.command {
        return tools_command();
    }

    if cli.question.is_some() && cli.file.is_some() {
        tracing::error!("Error: pass either a question or --file, not both");
        std::process::exit(1);
    }
    if cli.question.is_none() && cli.file.is_none() {
        tracing::error!("Error: no question given; try `gaia \"your question\"` or `gaia --help`");
        std::process::exit(1);
    }

    let options = RunOptions {
        config_path: cli.config,
        api_key: cli.api_key,
        base_url: cli.base_url,
        model: cli.model,
        max_steps: cli.max_steps,
        trajectory_file: cli.trajectory_file,
    };
    run_command(cli.question, cli.file, options).await
}
