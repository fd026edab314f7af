//! Language model access
//!
//! A narrow completion interface, its Ollama adapter, and the error type every
//! provider reports through.

pub mod errors;
pub mod mock;
pub mod ollama;
pub mod traits;
pub mod types;

pub use errors::LLMError;
pub use ollama::{OllamaConfig, OllamaProvider, OllamaProviderBuilder};
pub use traits::CompletionClient;
pub use types::{CompletionOptions, Message, Role};
