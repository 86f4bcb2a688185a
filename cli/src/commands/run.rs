//! Question execution command

use anyhow::{Context, Result};
use colored::Colorize;
use gaia_core::{
    Controller, OpenRouterEngine, Question, ReasoningEngine, Settings, ToolRegistry,
    TrajectoryRecorder,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Overrides collected from CLI flags
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_steps: Option<usize>,
    pub trajectory_file: Option<PathBuf>,
}

/// Answer a single question or a file of questions
pub async fn run_command(
    question: Option<String>,
    file: Option<PathBuf>,
    options: RunOptions,
) -> Result<()> {
    let mut settings = Settings::load(options.config_path.as_deref())?;
    if let Some(api_key) = options.api_key {
        settings.llm.api_key = api_key;
    }
    if let Some(base_url) = options.base_url {
        settings.llm.base_url = base_url;
    }
    if let Some(model) = options.model {
        settings.llm.model = model;
    }
    if let Some(max_steps) = options.max_steps {
        settings.agent.max_steps = max_steps;
    }
    settings.require_api_key()?;

    info!(model = %settings.llm.model, "using reasoning engine");

    let engine: Arc<dyn ReasoningEngine> = Arc::new(OpenRouterEngine::new(&settings.llm)?);
    let registry = Arc::new(ToolRegistry::with_builtins(&settings.agent.wolfram_app_id));

    // Ctrl-C flips the shared flag; each controller checks it
    // cooperatively at the top of its next reasoning step.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            warn!("interrupt received, cancelling after current step");
            cancel.store(true, Ordering::Relaxed);
        })
        .context("failed to install interrupt handler")?;
    }

    match (question, file) {
        (Some(question), None) => {
            run_one(
                question,
                &settings,
                engine,
                registry,
                cancel,
                options.trajectory_file,
            )
            .await
        }
        (None, Some(path)) => {
            run_batch(path, &settings, engine, registry, cancel).await
        }
        _ => unreachable!("argument validation happens in main"),
    }
}

async fn run_one(
    question: String,
    settings: &Settings,
    engine: Arc<dyn ReasoningEngine>,
    registry: Arc<ToolRegistry>,
    cancel: Arc<AtomicBool>,
    trajectory_file: Option<PathBuf>,
) -> Result<()> {
    let mut controller = Controller::new(settings.agent.clone(), engine, registry)
        .with_cancel_flag(cancel);
    if let Some(path) = &trajectory_file {
        controller = controller.with_recorder(TrajectoryRecorder::with_file(path));
        info!(path = %path.display(), "recording trajectory");
    }

    let (answer, trace) = controller.run(Question::new(question)).await?;

    println!(
        "{} {}",
        "FINAL ANSWER:".bold().green(),
        answer.value.bold()
    );
    println!("{}", format!("({} steps)", trace.len()).dimmed());
    Ok(())
}

/// Answer every non-empty line of the file in parallel. Each question
/// gets its own controller and trace; the registry handle is shared.
async fn run_batch(
    path: PathBuf,
    settings: &Settings,
    engine: Arc<dyn ReasoningEngine>,
    registry: Arc<ToolRegistry>,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    let questions: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    info!(count = questions.len(), "running question batch");

    let mut handles = Vec::with_capacity(questions.len());
    for question in questions {
        let controller = Controller::new(
            settings.agent.clone(),
            engine.clone(),
            registry.clone(),
        )
        .with_cancel_flag(cancel.clone());

        handles.push(tokio::spawn(async move {
            let result = controller.run(Question::new(question.clone())).await;
            (question, result)
        }));
    }

    let mut failures = 0usize;
    for handle in handles {
        let (question, result) = handle.await?;
        match result {
            Ok((answer, trace)) => {
                println!("{} {}", "Q:".bold(), question);
                println!(
                    "{} {} {}",
                    "A:".bold().green(),
                    answer.value,
                    format!("({} steps)", trace.len()).dimmed()
                );
            }
            Err(e) => {
                failures += 1;
                println!("{} {}", "Q:".bold(), question);
                println!("{} {}", "A:".bold().red(), format!("failed: {}", e));
            }
        }
    }

    if failures > 0 {
        warn!(failures, "some questions failed");
    }
    Ok(())
}
