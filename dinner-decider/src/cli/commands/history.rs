//! History command - show or clear recently suggested meals

use anyhow::{Context, Result};
use dinner_decider_core::{HistoryStore, PipelineConfig};
use std::path::Path;
use tracing::info;

use crate::cli::app::HistoryArgs;

/// Handle the history command
pub async fn execute(args: HistoryArgs, config_path: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::load(config_path).context("Failed to load configuration")?;
    let store = HistoryStore::new(&config.history_path);

    if args.clear {
        store.clear().await.context("Failed to clear meal history")?;
        info!("Cleared meal history at {}", store.path().display());
        println!("✅ Meal history cleared");
        return Ok(());
    }

    let meals = store.read_all().await;
    print!("{}", render_history(&meals, config.history_capacity));

    Ok(())
}

fn render_history(meals: &[String], capacity: usize) -> String {
    if meals.is_empty() {
        return "No meals suggested yet.\n".to_string();
    }

    let mut out = format!("Recently suggested meals ({} of {}, oldest first):\n", meals.len(), capacity);
    for (i, meal) in meals.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, meal));
    }
    out
}
