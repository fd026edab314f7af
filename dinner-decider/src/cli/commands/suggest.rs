//! Suggest command - run the three-stage pipeline and show the result

use anyhow::{Context, Result};
use dinner_decider_core::llm::OllamaProvider;
use dinner_decider_core::{PipelineConfig, PipelineRunner, PreferenceInput, RunOutcome, StageKind};
use serde_json::json;
use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::app::SuggestArgs;

/// Handle the suggest command
pub async fn execute(args: SuggestArgs, config_path: Option<&Path>) -> Result<()> {
    let config = PipelineConfig::load(config_path).context("Failed to load configuration")?;

    let preferences = if args.interactive || (!args.has_preferences() && std::io::stdin().is_terminal()) {
        ask_preferences().context("Failed to read preferences")?
    } else {
        preferences_from_args(&args)
    };
    debug!("Preferences: {:?}", preferences);

    let provider = OllamaProvider::create(config.ollama_config())
        .context("Failed to create completion client")?;
    let runner = PipelineRunner::new(&provider, &config);

    if !args.json {
        println!("\nStarting the dinner planning pipeline...\n");
    }
    info!("Running pipeline with model {} at {}", config.model, config.endpoint);

    let outcome = runner.run(preferences).await.context("Dinner planning failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
    } else {
        print!("{}", render_outcome(&outcome));
    }

    Ok(())
}

fn preferences_from_args(args: &SuggestArgs) -> PreferenceInput {
    PreferenceInput::from_raw(
        args.dietary.as_deref().unwrap_or_default(),
        args.cuisine.as_deref().unwrap_or_default(),
        args.time.as_deref().unwrap_or_default(),
        args.ingredients_to_use.as_deref().unwrap_or_default(),
        args.ingredients_to_avoid.as_deref().unwrap_or_default(),
    )
}

/// Ask the five preference questions on the terminal
fn ask_preferences() -> Result<PreferenceInput> {
    println!("Hello! I'm your Dinner Decider. Let's plan your meal.");
    println!("Please answer the following questions about your dinner preferences:");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let dietary = ask(&mut input, "Dietary preference (e.g., Vegetarian, Vegan, Gluten-Free, None): ")?;
    let cuisine = ask(&mut input, "Cuisine preference (e.g., Italian, Mexican, Asian, Indian, None): ")?;
    let time = ask(&mut input, "Desired cooking time (e.g., <30min, 30-60min, >60min): ")?;
    let to_use = ask(&mut input, "Ingredients to use (comma-separated, e.g., pasta, spinach): ")?;
    let to_avoid = ask(&mut input, "Ingredients to avoid (comma-separated, e.g., mushrooms): ")?;

    Ok(PreferenceInput::from_raw(&dietary, &cuisine, &time, &to_use, &to_avoid))
}

fn ask(input: &mut impl BufRead, question: &str) -> Result<String> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer)
}

/// Human-readable trace of a run
pub fn render_outcome(outcome: &RunOutcome) -> String {
    let mut out = String::new();

    if outcome.preferences_unresolved() {
        out.push_str(&format!(
            "⚠️  Could not make sense of your preferences after {} attempt(s); \
             the suggestion below may not fit them.\n",
            outcome.attempts
        ));
    }

    out.push_str("\n--- Stage Outputs ---\n");
    for kind in StageKind::ALL {
        out.push_str(&format!("\n{}:\n{}\n", kind.title(), outcome.output(kind).trim()));
    }

    out.push_str("\n\n##################################\n");
    out.push_str("## Here is your dinner suggestion for today!\n");
    out.push_str("##################################\n\n");
    out.push_str(outcome.suggestion().trim());
    out.push('\n');

    if !outcome.warnings.is_empty() {
        out.push_str("\n⚠️  Warnings:\n");
        for warning in &outcome.warnings {
            out.push_str(&format!("   - {}\n", warning));
        }
    }

    out
}

fn outcome_json(outcome: &RunOutcome) -> serde_json::Value {
    json!({
        "run_id": outcome.run_id,
        "preferences": outcome.preferences,
        "stages": outcome.outputs,
        "meal_name": outcome.meal_name,
        "attempts": outcome.attempts,
        "exhausted": outcome.exhausted,
        "transitions": outcome.transitions,
        "history": outcome.history,
        "warnings": outcome.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "started_at": outcome.started_at,
        "finished_at": outcome.finished_at,
    })
}
