// src/cli/chain.rs — Default command: run an image chain

use std::path::PathBuf;
use std::sync::Arc;

use super::Cli;
use crate::core::orchestrator::ChainOrchestrator;
use crate::core::retry;
use crate::core::types::ChainRequest;
use crate::infra::config::Config;
use crate::provider::openai::OpenAIProvider;
use crate::provider::{EditSettings, ImageEditProvider};

/// Reject inputs the orchestrator should never be handed from the command line.
pub fn validate(prompt: &str, n: usize, max_iterations: usize) -> Result<(), String> {
    if prompt.trim().is_empty() {
        return Err("Please enter a prompt".into());
    }
    if n < 1 {
        return Err("Number of iterations must be at least 1".into());
    }
    if n > max_iterations {
        return Err(format!(
            "Number of iterations must be at most {max_iterations}"
        ));
    }
    Ok(())
}

pub async fn run_chain(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    validate(&cli.prompt, cli.n, config.chain.max_iterations).map_err(anyhow::Error::msg)?;

    // Missing credentials fail here, before any workspace exists.
    let provider: Arc<dyn ImageEditProvider> =
        Arc::new(OpenAIProvider::from_config(&config.provider)?);

    let output_root = cli
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.chain.output_root.clone());

    let mut orchestrator = ChainOrchestrator::new(
        provider,
        EditSettings::from(&config.provider),
        output_root,
    );
    if !cli.quiet {
        orchestrator = orchestrator.with_progress(super::progress::terminal_progress());
    }

    let policy = retry::policy_for(cli.retries.or(config.chain.retries));
    let request = ChainRequest::new(&cli.image, &cli.prompt, cli.n).with_correction(cli.correct);

    tracing::debug!(
        image = %cli.image,
        iterations = cli.n,
        correct = cli.correct,
        "Starting chain"
    );
    let run = orchestrator.run(&request, policy.as_ref()).await?;

    if cli.correct {
        println!("Generated and corrected images:");
    } else {
        println!("Generated images:");
    }
    for path in run.paths() {
        println!("{}", path.display());
    }
    eprintln!("{}", run.status_message());

    Ok(())
}
