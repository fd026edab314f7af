//! Three-stage dinner suggestion pipeline
//!
//! Parse the user's preferences, brainstorm candidate meals, then pick one and
//! detail it. Each stage's raw text is handed to the next unchanged.

pub mod config;
pub mod errors;
pub mod runner;

#[cfg(test)]
mod tests;

pub use config::PipelineConfig;
pub use errors::{PipelineError, PipelineResult};
pub use runner::{PipelineRunner, RunOutcome, RunState, StageOutput, is_valid_output};
