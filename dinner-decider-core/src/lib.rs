//! Core functionality for dinner-decider
//!
//! This crate contains the prompting pipeline that turns loose dinner
//! preferences into one detailed meal suggestion, along with the completion
//! client it talks to and the rolling meal history it keeps.

pub mod history;
pub mod llm;
pub mod pipeline;
pub mod preferences;
pub mod stages;

pub use history::{HistoryError, HistoryStore};
pub use pipeline::{PipelineConfig, PipelineError, PipelineRunner, RunOutcome};
pub use preferences::PreferenceInput;
pub use stages::{StageKind, StageSet};
