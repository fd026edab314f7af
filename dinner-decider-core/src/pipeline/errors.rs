use crate::history::HistoryError;
use crate::llm::LLMError;
use crate::stages::StageKind;
use thiserror::Error;

/// Failures of a pipeline run.
///
/// Only `CompletionFailed` aborts a run. The other two are recorded as
/// warnings on the outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The model call for a stage failed
    #[error("Completion failed during {stage} stage: {source}")]
    CompletionFailed {
        stage: StageKind,
        #[source]
        source: LLMError,
    },

    /// A stage kept producing blank output until attempts ran out
    #[error("The {stage} stage produced no usable output after {attempts} attempt(s)")]
    InvalidStageOutput { stage: StageKind, attempts: usize },

    /// The meal history could not be written
    #[error(transparent)]
    PersistenceFailed(#[from] HistoryError),
}

impl PipelineError {
    pub fn completion(stage: StageKind, source: LLMError) -> Self {
        Self::CompletionFailed { stage, source }
    }

    /// Whether this error ends the run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CompletionFailed { .. })
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
