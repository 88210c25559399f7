//! Generation backends and the tool-dispatching client

pub mod backend;
pub mod client;
pub mod gemini;

pub use backend::{Completion, CompletionRequest, LlmBackend, ToolExchange};
pub use client::GenerationClient;
pub use gemini::GeminiBackend;
