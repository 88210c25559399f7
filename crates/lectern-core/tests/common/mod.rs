//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use lectern_core::{
    Completion, CompletionRequest, Config, CourseMetadata, CourseStore, LecternError, Lesson,
    LlmBackend, MemoryCourseStore, Result, SearchResults,
};
use std::sync::Mutex;

/// Backend that replays a scripted sequence of completions and records
/// every request it receives
pub struct StubBackend {
    script: Mutex<Vec<Result<Completion>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubBackend {
    pub fn new(script: Vec<Result<Completion>>) -> Self {
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Backend answering every request with the same text
    pub fn text(reply: &str) -> Self {
        Self::new(vec![Ok(Completion::Text(reply.to_string()))])
    }

    pub fn request(&self, index: usize) -> CompletionRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmBackend for StubBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        self.requests.lock().unwrap().push(request.clone());
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            // Scripts answer text once exhausted so followup queries work
            Ok(Completion::Text(String::new()))
        } else {
            script.remove(0)
        }
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// Store whose every call fails at the trait level
pub struct OfflineStore;

#[async_trait]
impl CourseStore for OfflineStore {
    async fn search(
        &self,
        _query: &str,
        _course_name: Option<&str>,
        _lesson_number: Option<u32>,
    ) -> Result<SearchResults> {
        Err(LecternError::Store("course index offline".to_string()))
    }

    async fn get_all_courses_metadata(&self) -> Result<Vec<CourseMetadata>> {
        Err(LecternError::Store("course index offline".to_string()))
    }

    async fn get_lesson_link(
        &self,
        _course_title: &str,
        _lesson_number: u32,
    ) -> Result<Option<String>> {
        Err(LecternError::Store("course index offline".to_string()))
    }
}

/// Two-course catalog with chunks, links, and an instructor
pub fn sample_store() -> MemoryCourseStore {
    let mut store = MemoryCourseStore::new(5);

    store.add_course(CourseMetadata {
        title: "Introduction to MCP".to_string(),
        course_link: Some("https://example.com/mcp".to_string()),
        instructor: Some("R. Rivera".to_string()),
        lessons: vec![
            Lesson {
                number: 1,
                title: "Protocol Basics".to_string(),
                link: Some("https://example.com/mcp/1".to_string()),
            },
            Lesson {
                number: 2,
                title: "Servers and Clients".to_string(),
                link: Some("https://example.com/mcp/2".to_string()),
            },
        ],
    });
    store.add_course(CourseMetadata {
        title: "Advanced Retrieval with Chroma".to_string(),
        course_link: Some("https://example.com/chroma".to_string()),
        instructor: None,
        lessons: vec![Lesson {
            number: 1,
            title: "Embeddings and Collections".to_string(),
            link: None,
        }],
    });

    store.add_chunk(
        "Introduction to MCP",
        Some(1),
        "MCP is a protocol for connecting models to tools and data sources.",
    );
    store.add_chunk(
        "Introduction to MCP",
        Some(2),
        "An MCP server exposes tools over a transport such as stdio.",
    );
    store.add_chunk(
        "Advanced Retrieval with Chroma",
        Some(1),
        "Chroma stores embeddings in collections for semantic retrieval.",
    );

    store
}

/// Config fixture decoupled from the environment
pub fn test_config() -> Config {
    Config {
        api_key: "test-key".to_string(),
        model: "gemini-2.5-flash".to_string(),
        llm_url: "https://generativelanguage.googleapis.com".to_string(),
        max_results: 5,
        max_history: 2,
        timeout_secs: 5,
        max_tool_rounds: 1,
    }
}
