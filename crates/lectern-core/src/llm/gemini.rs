//! REST adapter for the Gemini generateContent API

use crate::config::Config;
use crate::error::{LecternError, Result};
use crate::llm::backend::{Completion, CompletionRequest, LlmBackend};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Gemini generateContent client with function calling.
///
/// The prior tool exchanges of a request are replayed as alternating
/// model functionCall / user functionResponse contents, which is how
/// the API expects a tool round to be continued.
pub struct GeminiBackend {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend from configuration, failing fast on blank
    /// credentials
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LecternError::Config(
                "api_key must not be empty (set LECTERN_API_KEY or GEMINI_API_KEY)".to_string(),
            ));
        }
        if config.model.trim().is_empty() {
            return Err(LecternError::Config(
                "model must not be empty (set LECTERN_MODEL)".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LecternError::Http)?;

        Ok(Self {
            http_client,
            base_url: config.llm_url.trim_end_matches('/').to_string(),
            model: config.model.trim().to_string(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    fn build_body(&self, request: &CompletionRequest) -> GenerateRequest {
        let mut contents = vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: Some(request.prompt.clone()),
                ..Default::default()
            }],
        }];

        for exchange in &request.exchanges {
            contents.push(Content {
                role: "model".to_string(),
                parts: vec![Part {
                    function_call: Some(FunctionCall {
                        name: exchange.name.clone(),
                        args: exchange.arguments.clone(),
                    }),
                    ..Default::default()
                }],
            });
            contents.push(Content {
                role: "user".to_string(),
                parts: vec![Part {
                    function_response: Some(FunctionResponse {
                        name: exchange.name.clone(),
                        response: serde_json::json!({ "content": exchange.output }),
                    }),
                    ..Default::default()
                }],
            });
        }

        let tools = if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![ToolBlock {
                function_declarations: request
                    .tools
                    .iter()
                    .map(|tool| FunctionDeclaration {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.input_schema.clone(),
                    })
                    .collect(),
            }]
        };

        GenerateRequest { contents, tools }
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = self.build_body(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!(
            "Sending generateContent request: model={} tools={} exchanges={}",
            self.model,
            request.tools.len(),
            request.exchanges.len()
        );

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(LecternError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LecternError::generation(format!(
                "Gemini API error (HTTP {}): {}",
                status, text
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(LecternError::Http)?;

        let parts = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        for part in &parts {
            if let Some(ref call) = part.function_call {
                return Ok(Completion::ToolCall {
                    name: call.name.clone(),
                    arguments: if call.args.is_null() {
                        serde_json::json!({})
                    } else {
                        call.args.clone()
                    },
                });
            }
        }

        // An answer without text parts normalizes to the empty string
        let text = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        Ok(Completion::Text(text))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolBlock>,
}

#[derive(Debug, Serialize)]
struct ToolBlock {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
