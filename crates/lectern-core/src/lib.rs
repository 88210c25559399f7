//! Lectern Core Library
//!
//! Retrieval orchestration for course-material RAG assistants.
//!
//! # Features
//! - Tool-dispatching generation loop with a bounded tool budget
//! - Schema-described retrieval tools with per-request source tracking
//! - Fuzzy course-title resolution over the store catalog
//! - Bounded multi-turn conversation history
//! - Gemini generateContent backend adapter

pub mod config;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod resolver;
pub mod session;
pub mod store;
pub mod tools;

pub use config::Config;
pub use error::{BackendFault, Error, LecternError, Result};
pub use llm::{
    Completion, CompletionRequest, GeminiBackend, GenerationClient, LlmBackend, ToolExchange,
};
pub use orchestrator::{CourseAnalytics, QueryOrchestrator, QueryOutcome};
pub use resolver::resolve_course_title;
pub use session::{Role, SessionStore, Turn};
pub use store::{
    memory::MemoryCourseStore, ChunkMetadata, CourseMetadata, CourseStore, Lesson, SearchResults,
    Source,
};
pub use tools::{
    CourseOutlineTool, CourseSearchTool, RetrievalTool, SourceTracker, ToolDefinition, ToolSet,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "lectern";
