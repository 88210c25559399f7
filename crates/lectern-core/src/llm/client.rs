//! Tool-dispatching generation client

use crate::error::{LecternError, Result};
use crate::llm::backend::{Completion, CompletionRequest, LlmBackend, ToolExchange};
use crate::tools::ToolSet;
use std::sync::Arc;
use std::time::Duration;

/// Fixed behavioral instructions prepended to every request
const SYSTEM_PROMPT: &str = "\
You are an assistant for a course materials database. For any question about \
course content, outlines, topics, or educational materials you must use the \
search_course_content tool.

Rules:
1. Always search first for questions about course content, outlines, lessons, \
or concepts covered in a course.
2. Call search_course_content with focused query terms. Include course_name \
when a course is mentioned (e.g. \"MCP\", \"Chroma\", \"Anthropic\") and \
lesson_number when a specific lesson is named.
3. Use get_course_outline when asked for a course's structure or lesson list.
4. Use at most one search per response.
5. Answer from the search results: keep it concise and educational, include \
concrete examples from the content found, and do not mention the search \
process.
6. Only skip searching for general conversation such as greetings or thanks.";

/// Generation client that lets the model call retrieval tools.
///
/// The prompt instructions ask for at most one search, and the client
/// enforces it mechanically: after `max_tool_rounds` dispatches the
/// backend is re-invoked without tools, so every query terminates in a
/// text answer. Each backend round runs under the configured timeout.
pub struct GenerationClient {
    backend: Arc<dyn LlmBackend>,
    max_tool_rounds: usize,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn LlmBackend>, max_tool_rounds: usize, timeout_secs: u64) -> Self {
        Self {
            backend,
            max_tool_rounds,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Produce the final answer text for one user query
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&ToolSet>,
    ) -> Result<String> {
        let mut request = CompletionRequest {
            prompt: build_prompt(query, history),
            tools: tools.map(|set| set.definitions()).unwrap_or_default(),
            exchanges: Vec::new(),
        };

        let mut rounds_used = 0;

        loop {
            let completion = self.complete_with_timeout(&request).await?;

            let (name, arguments) = match completion {
                Completion::Text(text) => return Ok(text),
                Completion::ToolCall { name, arguments } => (name, arguments),
            };

            let set = match tools {
                Some(set) if rounds_used < self.max_tool_rounds => set,
                _ => {
                    tracing::warn!(
                        "Dropping tool call '{}' and asking {} for a text answer",
                        name,
                        self.backend.model_name()
                    );
                    if request.tools.is_empty() {
                        // The backend insists on calling tools it was not
                        // offered; give up with an empty answer
                        return Ok(String::new());
                    }
                    request.tools.clear();
                    continue;
                }
            };

            tracing::info!("Dispatching tool call: {}", name);
            tracing::debug!("Tool arguments: {}", arguments);

            let output = set.dispatch(&name, &arguments).await;
            rounds_used += 1;
            request.exchanges.push(ToolExchange {
                name,
                arguments,
                output,
            });
        }
    }

    async fn complete_with_timeout(&self, request: &CompletionRequest) -> Result<Completion> {
        match tokio::time::timeout(self.timeout, self.backend.complete(request)).await {
            Ok(Ok(completion)) => Ok(completion),
            Ok(Err(err)) => Err(classify_backend_error(err)),
            Err(_) => Err(LecternError::generation(format!(
                "request to model {} timed out after {}s",
                self.backend.model_name(),
                self.timeout.as_secs()
            ))),
        }
    }
}

fn build_prompt(query: &str, history: Option<&str>) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    if let Some(history) = history {
        prompt.push_str("\n\nConversation history:\n");
        prompt.push_str(history);
    }
    prompt.push_str("\n\nUser question: ");
    prompt.push_str(query);
    prompt
}

/// Wrap a backend failure into a classified generation error, leaving
/// already classified errors untouched
fn classify_backend_error(err: LecternError) -> LecternError {
    match err {
        LecternError::Generation { .. } => err,
        other => LecternError::generation(other.to_string()),
    }
}
