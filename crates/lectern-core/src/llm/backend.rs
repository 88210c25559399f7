//! Backend contract for text generation with tool calls

use crate::error::Result;
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use serde_json::Value;

/// One completed tool round: the model's call plus our result text
#[derive(Debug, Clone)]
pub struct ToolExchange {
    pub name: String,
    pub arguments: Value,
    pub output: String,
}

/// A single generation request
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Full prompt: instructions, optional history block, user question
    pub prompt: String,
    /// Tools the model may call this round; empty disables calling
    pub tools: Vec<ToolDefinition>,
    /// Tool rounds already executed for this query, oldest first
    pub exchanges: Vec<ToolExchange>,
}

/// Backend reply: either final text or a request to run a tool
#[derive(Debug, Clone)]
pub enum Completion {
    Text(String),
    ToolCall { name: String, arguments: Value },
}

/// Contract implemented by generation service adapters
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;

    /// Model identifier used by this backend
    fn model_name(&self) -> &str;
}
