//! Check command - verify the completion endpoint answers

use anyhow::{Context, Result, bail};
use dinner_decider_core::PipelineConfig;
use dinner_decider_core::llm::{CompletionClient, OllamaProvider};
use std::path::Path;
use tracing::warn;

/// Handle the check command
pub async fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::load(config_path).context("Failed to load configuration")?;
    let provider = OllamaProvider::create(config.ollama_config())
        .context("Failed to create completion client")?;

    println!("🔍 Checking {} at {}...", provider.name(), config.endpoint);

    if provider.is_available().await {
        println!("✅ Endpoint is reachable, model: {}", provider.model());
        Ok(())
    } else {
        warn!("Endpoint {} did not respond", config.endpoint);
        bail!("Completion endpoint {} is not reachable", config.endpoint)
    }
}
