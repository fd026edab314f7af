//! Sequential three-stage runner with whole-chain retries

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::history::HistoryStore;
use crate::llm::{CompletionClient, CompletionOptions};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::errors::{PipelineError, PipelineResult};
use crate::preferences::PreferenceInput;
use crate::stages::{PromptContext, StageKind};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Stage0Running,
    Stage1Running,
    Stage2Running,
    /// About to start attempt number `attempt` (1-based)
    Retrying { attempt: usize },
    Done,
}

impl RunState {
    fn running(kind: StageKind) -> Self {
        match kind {
            StageKind::ParsePreferences => RunState::Stage0Running,
            StageKind::Brainstorm => RunState::Stage1Running,
            StageKind::SelectAndDetail => RunState::Stage2Running,
        }
    }
}

/// Raw text produced by one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutput {
    pub kind: StageKind,
    pub text: String,
}

impl StageOutput {
    pub fn is_valid(&self) -> bool {
        is_valid_output(&self.text)
    }
}

/// Result of a run that was not aborted
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub preferences: PreferenceInput,
    /// Outputs of the last attempt, in stage order
    pub outputs: Vec<StageOutput>,
    /// Name recorded in the meal history
    pub meal_name: String,
    /// Chain executions performed
    pub attempts: usize,
    /// True when attempts ran out and invalid output was accepted
    pub exhausted: bool,
    pub transitions: Vec<RunState>,
    /// Meal history after this run, oldest first
    pub history: Vec<String>,
    /// Non-fatal problems: invalid output after exhaustion, history write failures
    pub warnings: Vec<PipelineError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn output(&self, kind: StageKind) -> &str {
        self.outputs
            .iter()
            .find(|o| o.kind == kind)
            .map(|o| o.text.as_str())
            .unwrap_or_default()
    }

    /// The detailed meal suggestion
    pub fn suggestion(&self) -> &str {
        self.output(StageKind::SelectAndDetail)
    }

    /// True when the parse stage never produced usable output
    pub fn preferences_unresolved(&self) -> bool {
        !is_valid_output(self.output(StageKind::ParsePreferences))
    }
}

/// Output is usable when it is not blank and not just an empty list
pub fn is_valid_output(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed != "[]"
}

/// Runs the stages in order against one completion client
pub struct PipelineRunner<'a> {
    client: &'a dyn CompletionClient,
    config: &'a PipelineConfig,
    history: HistoryStore,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(client: &'a dyn CompletionClient, config: &'a PipelineConfig) -> Self {
        Self { client, config, history: HistoryStore::new(&config.history_path) }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Run the full chain for one set of preferences.
    ///
    /// If any stage output is invalid the whole chain is repeated, up to
    /// `max_attempts` times; the last attempt is accepted regardless. A
    /// completion failure aborts immediately and leaves the history untouched.
    pub async fn run(&self, preferences: PreferenceInput) -> PipelineResult<RunOutcome> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("pipeline_run", run_id = %run_id, model = %self.client.model());

        async move {
            let preferences = preferences.normalized();
            let preference_text = preferences.to_prompt_text();
            let options = self.config.completion_options();
            let recent_meals = self.history.read_all().await;
            let max_attempts = self.config.max_attempts.max(1);

            let mut transitions = vec![RunState::Idle];
            let mut warnings = Vec::new();
            let mut attempts = 0;
            let mut exhausted = false;

            let outputs = loop {
                attempts += 1;
                if attempts > 1 {
                    transitions.push(RunState::Retrying { attempt: attempts });
                    info!("Retrying chain, attempt {} of {}", attempts, max_attempts);
                }

                let outputs = self
                    .run_chain(&preference_text, &recent_meals, &options, &mut transitions)
                    .await?;

                let invalid: Vec<StageKind> =
                    outputs.iter().filter(|o| !o.is_valid()).map(|o| o.kind).collect();

                if invalid.is_empty() {
                    break outputs;
                }

                if attempts >= max_attempts {
                    warn!("Accepting invalid output from {:?} after {} attempt(s)", invalid, attempts);
                    exhausted = true;
                    warnings.extend(
                        invalid
                            .into_iter()
                            .map(|stage| PipelineError::InvalidStageOutput { stage, attempts }),
                    );
                    break outputs;
                }

                warn!("Invalid output from {:?} on attempt {}", invalid, attempts);
            };

            let suggestion = outputs
                .iter()
                .find(|o| o.kind == StageKind::SelectAndDetail)
                .map(|o| o.text.as_str())
                .unwrap_or_default();
            let meal_name = regex_utils::whitespace::collapse(
                &regex_utils::meal_suggestion::extract_or_whole(suggestion),
            );

            let history = match self
                .history
                .append_and_trim(&meal_name, self.config.history_capacity)
                .await
            {
                Ok(history) => history,
                Err(e) => {
                    warn!("{}", e);
                    warnings.push(PipelineError::from(e));
                    recent_meals
                }
            };

            transitions.push(RunState::Done);
            info!(meal = %meal_name, attempts, "Pipeline run finished");

            Ok::<_, PipelineError>(RunOutcome {
                run_id,
                preferences,
                outputs,
                meal_name,
                attempts,
                exhausted,
                transitions,
                history,
                warnings,
                started_at,
                finished_at: Utc::now(),
            })
        }
        .instrument(span)
        .await
    }

    /// One pass through all three stages, each fed the previous raw text
    async fn run_chain(
        &self,
        preference_text: &str,
        recent_meals: &[String],
        options: &CompletionOptions,
        transitions: &mut Vec<RunState>,
    ) -> PipelineResult<Vec<StageOutput>> {
        let mut outputs: Vec<StageOutput> = Vec::with_capacity(StageKind::ALL.len());

        for kind in StageKind::ALL {
            transitions.push(RunState::running(kind));

            let previous_output = outputs.last().map(|o| o.text.as_str()).unwrap_or_default();
            let ctx = PromptContext {
                preferences: preference_text,
                previous_output,
                recent_meals: match kind {
                    StageKind::Brainstorm => recent_meals,
                    _ => &[],
                },
            };

            let text = self.run_stage(kind, &ctx, options).await?;
            outputs.push(StageOutput { kind, text });
        }

        Ok(outputs)
    }

    async fn run_stage(
        &self,
        kind: StageKind,
        ctx: &PromptContext<'_>,
        options: &CompletionOptions,
    ) -> PipelineResult<String> {
        let prompt = self.config.stages.get(kind).build_prompt(ctx);

        async {
            debug!(prompt = %prompt, "Stage prompt");
            let text = self
                .client
                .complete(&prompt, options)
                .await
                .map_err(|source| PipelineError::completion(kind, source))?;
            debug!(response = %text, "Stage response");
            Ok::<_, PipelineError>(text)
        }
        .instrument(info_span!("pipeline_stage", stage = %kind))
        .await
    }
}
