//! Course store contract and the shared retrieval data model

pub mod memory;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One citation surfaced alongside an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display label, e.g. `"Introduction to MCP - Lesson 2"`
    pub text: String,
    /// Target to open when the citation is clicked, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Catalog position of one retrieved chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<u32>,
}

/// Results of one store search.
///
/// `documents` and `metadata` are parallel sequences of equal length.
/// When `error` is set both are empty and callers must check it first.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub error: Option<String>,
}

impl SearchResults {
    /// Empty results carrying a store-side failure message
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            documents: Vec::new(),
            metadata: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// One lesson within a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Catalog metadata for one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMetadata {
    pub title: String,
    #[serde(default)]
    pub course_link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Read-side contract over the embedded course corpus.
///
/// Implementations own ranking, filtering, and their result limit; the
/// orchestration layer never reaches past this trait.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Search course chunks, optionally scoped to a course (fuzzy name)
    /// and a lesson number
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults>;

    /// Catalog metadata for every indexed course
    async fn get_all_courses_metadata(&self) -> Result<Vec<CourseMetadata>>;

    /// Link for one lesson of one course, when the catalog has it
    async fn get_lesson_link(
        &self,
        course_title: &str,
        lesson_number: u32,
    ) -> Result<Option<String>>;
}
