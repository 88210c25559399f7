//! Course content search tool

use super::{RetrievalTool, SourceTracker, ToolDefinition};
use crate::store::{CourseStore, SearchResults, Source};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Searches course chunks with optional course and lesson scoping.
///
/// Every successful call with results replaces the tracker's citations
/// with one source per returned chunk, in result order.
pub struct CourseSearchTool {
    store: Arc<dyn CourseStore>,
    tracker: SourceTracker,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn CourseStore>, tracker: SourceTracker) -> Self {
        Self { store, tracker }
    }

    async fn format_results(&self, results: &SearchResults) -> String {
        let mut formatted = Vec::new();
        let mut sources = Vec::new();

        for (doc, meta) in results.documents.iter().zip(results.metadata.iter()) {
            let mut header = format!("[{}", meta.course_title);
            if let Some(n) = meta.lesson_number {
                header.push_str(&format!(" - Lesson {}", n));
            }
            header.push(']');

            let mut label = meta.course_title.clone();
            let mut link = None;
            if let Some(n) = meta.lesson_number {
                label.push_str(&format!(" - Lesson {}", n));
                link = self
                    .store
                    .get_lesson_link(&meta.course_title, n)
                    .await
                    .ok()
                    .flatten();
            }
            sources.push(Source { text: label, link });

            formatted.push(format!("{}\n{}", header, doc));
        }

        self.tracker.record(sources);
        formatted.join("\n\n")
    }
}

#[async_trait]
impl RetrievalTool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_course_content".to_string(),
            description:
                "Search course materials with smart course name matching and optional lesson filtering"
                    .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn invoke(&self, args: &Value) -> String {
        let query = match args.get("query").and_then(|v| v.as_str()) {
            Some(q) if !q.trim().is_empty() => q,
            _ => return "A search query is required.".to_string(),
        };
        let course_name = args.get("course_name").and_then(|v| v.as_str());
        let lesson_number = args
            .get("lesson_number")
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok());

        tracing::debug!("Searching course content: {:?}", query);

        let mut results = match self.store.search(query, course_name, lesson_number).await {
            Ok(results) => results,
            Err(e) => return format!("Search error: {}", e),
        };

        if let Some(error) = results.error.take() {
            return error;
        }

        if results.is_empty() {
            let mut filter_info = String::new();
            if let Some(name) = course_name {
                filter_info.push_str(&format!(" in course '{}'", name));
            }
            if let Some(n) = lesson_number {
                filter_info.push_str(&format!(" in lesson {}", n));
            }
            return format!("No relevant content found{}.", filter_info);
        }

        self.format_results(&results).await
    }
}
