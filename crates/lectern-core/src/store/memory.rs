//! In-memory course store for tests and examples

use super::{ChunkMetadata, CourseMetadata, CourseStore, SearchResults};
use crate::error::Result;
use crate::resolver::resolve_course_title;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct StoredChunk {
    course_title: String,
    lesson_number: Option<u32>,
    content: String,
}

/// Substring-matching store over an in-memory catalog.
///
/// Stands in for the embedded vector store where tests and examples
/// need a working corpus: matching is case-insensitive substring
/// containment over chunk content, ranking is insertion order, and
/// course-name scoping goes through the same fuzzy title resolution
/// the outline tool uses. Not a real retrieval engine.
pub struct MemoryCourseStore {
    courses: Vec<CourseMetadata>,
    chunks: Vec<StoredChunk>,
    max_results: usize,
    fail_next: Mutex<Option<String>>,
}

impl MemoryCourseStore {
    /// Create an empty store returning at most `max_results` chunks
    pub fn new(max_results: usize) -> Self {
        Self {
            courses: Vec::new(),
            chunks: Vec::new(),
            max_results: max_results.max(1),
            fail_next: Mutex::new(None),
        }
    }

    pub fn add_course(&mut self, course: CourseMetadata) {
        self.courses.push(course);
    }

    pub fn add_chunk(&mut self, course_title: &str, lesson_number: Option<u32>, content: &str) {
        self.chunks.push(StoredChunk {
            course_title: course_title.to_string(),
            lesson_number,
            content: content.to_string(),
        });
    }

    /// Make the next search report this failure through the results
    /// error channel
    pub fn fail_next_search(&self, message: &str) {
        let mut fail_next = self
            .fail_next
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *fail_next = Some(message.to_string());
    }

    fn take_failure(&self) -> Option<String> {
        self.fail_next
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults> {
        if let Some(message) = self.take_failure() {
            return Ok(SearchResults::from_error(message));
        }

        let scope_title = match course_name {
            Some(name) => {
                let titles: Vec<&str> =
                    self.courses.iter().map(|c| c.title.as_str()).collect();
                match resolve_course_title(name, &titles) {
                    Some(title) => Some(title.to_string()),
                    None => {
                        return Ok(SearchResults::from_error(format!(
                            "No course found matching '{}'",
                            name
                        )))
                    }
                }
            }
            None => None,
        };

        let needle = query.to_lowercase();
        let mut results = SearchResults::default();

        for chunk in &self.chunks {
            if let Some(ref title) = scope_title {
                if chunk.course_title != *title {
                    continue;
                }
            }
            if let Some(wanted) = lesson_number {
                if chunk.lesson_number != Some(wanted) {
                    continue;
                }
            }
            if !chunk.content.to_lowercase().contains(&needle) {
                continue;
            }

            results.documents.push(chunk.content.clone());
            results.metadata.push(ChunkMetadata {
                course_title: chunk.course_title.clone(),
                lesson_number: chunk.lesson_number,
            });
            if results.documents.len() >= self.max_results {
                break;
            }
        }

        Ok(results)
    }

    async fn get_all_courses_metadata(&self) -> Result<Vec<CourseMetadata>> {
        Ok(self.courses.clone())
    }

    async fn get_lesson_link(
        &self,
        course_title: &str,
        lesson_number: u32,
    ) -> Result<Option<String>> {
        Ok(self
            .courses
            .iter()
            .find(|course| course.title == course_title)
            .and_then(|course| {
                course
                    .lessons
                    .iter()
                    .find(|lesson| lesson.number == lesson_number)
            })
            .and_then(|lesson| lesson.link.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Lesson;

    fn sample() -> MemoryCourseStore {
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
                    link: None,
                },
            ],
        });
        store.add_course(CourseMetadata {
            title: "Advanced Retrieval with Chroma".to_string(),
            course_link: None,
            instructor: None,
            lessons: Vec::new(),
        });
        store.add_chunk(
            "Introduction to MCP",
            Some(1),
            "MCP is a protocol for connecting models to tools.",
        );
        store.add_chunk(
            "Introduction to MCP",
            Some(2),
            "An MCP server exposes tools over a transport.",
        );
        store.add_chunk(
            "Advanced Retrieval with Chroma",
            Some(1),
            "Chroma stores embeddings for semantic retrieval.",
        );
        store
    }

    #[tokio::test]
    async fn test_search_matches_substring() {
        let store = sample();
        let results = store.search("protocol", None, None).await.unwrap();
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.metadata[0].course_title, "Introduction to MCP");
        assert_eq!(results.metadata[0].lesson_number, Some(1));
    }

    #[tokio::test]
    async fn test_search_scoped_by_fuzzy_course_name() {
        let store = sample();
        let results = store.search("retrieval", Some("chroma"), None).await.unwrap();
        assert_eq!(results.documents.len(), 1);
        assert_eq!(
            results.metadata[0].course_title,
            "Advanced Retrieval with Chroma"
        );
    }

    #[tokio::test]
    async fn test_search_scoped_by_lesson() {
        let store = sample();
        let results = store.search("mcp", Some("MCP"), Some(2)).await.unwrap();
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.metadata[0].lesson_number, Some(2));
    }

    #[tokio::test]
    async fn test_search_unknown_course_reports_error() {
        let store = sample();
        let results = store.search("anything", Some("quantum"), None).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(
            results.error.as_deref(),
            Some("No course found matching 'quantum'")
        );
    }

    #[tokio::test]
    async fn test_search_respects_max_results() {
        let mut store = MemoryCourseStore::new(2);
        for i in 0..5 {
            store.add_chunk("Course", Some(i), "same text everywhere");
        }
        let results = store.search("same text", None, None).await.unwrap();
        assert_eq!(results.documents.len(), 2);
        assert_eq!(results.metadata.len(), 2);
    }

    #[tokio::test]
    async fn test_forced_failure_is_one_shot() {
        let store = sample();
        store.fail_next_search("index offline");

        let failed = store.search("protocol", None, None).await.unwrap();
        assert_eq!(failed.error.as_deref(), Some("index offline"));
        assert!(failed.is_empty());

        let ok = store.search("protocol", None, None).await.unwrap();
        assert!(ok.error.is_none());
        assert_eq!(ok.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_lesson_link_lookup() {
        let store = sample();
        assert_eq!(
            store.get_lesson_link("Introduction to MCP", 1).await.unwrap(),
            Some("https://example.com/mcp/1".to_string())
        );
        assert_eq!(store.get_lesson_link("Introduction to MCP", 2).await.unwrap(), None);
        assert_eq!(store.get_lesson_link("No Such Course", 1).await.unwrap(), None);
    }
}
