//! Retrieval tools exposed to the generation model

pub mod outline;
pub mod search;

use crate::store::{CourseStore, Source};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub use outline::CourseOutlineTool;
pub use search::CourseSearchTool;

/// Wire-facing description of one tool: name, usage text, and a JSON
/// schema for its arguments
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A retrieval operation the model may invoke.
///
/// Tools communicate entirely through text: lookup failures are
/// rendered into the returned string so a bad call never aborts the
/// surrounding query.
#[async_trait]
pub trait RetrievalTool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn invoke(&self, args: &Value) -> String;
}

/// Citations recorded by the most recent tool call.
///
/// Cloning shares the underlying buffer, so every tool in a set writes
/// to the same place. Each successful call replaces the previous
/// contents outright.
#[derive(Clone, Default)]
pub struct SourceTracker {
    sources: Arc<Mutex<Vec<Source>>>,
}

impl SourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked citations with this call's
    pub fn record(&self, sources: Vec<Source>) {
        *self.lock_sources() = sources;
    }

    /// Copy of the currently tracked citations
    pub fn snapshot(&self) -> Vec<Source> {
        self.lock_sources().clone()
    }

    pub fn reset(&self) {
        self.lock_sources().clear();
    }

    fn lock_sources(&self) -> std::sync::MutexGuard<'_, Vec<Source>> {
        // A poisoned lock still holds a usable citation list
        self.sources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The retrieval tools available to one query.
///
/// Built fresh per request so that tracked sources can never leak
/// between concurrent queries.
pub struct ToolSet {
    tools: Vec<(String, Arc<dyn RetrievalTool>)>,
    tracker: SourceTracker,
}

impl ToolSet {
    /// Build the standard tool pair over one store
    pub fn for_store(store: Arc<dyn CourseStore>) -> Self {
        let tracker = SourceTracker::new();
        let search = CourseSearchTool::new(store.clone(), tracker.clone());
        let outline = CourseOutlineTool::new(store, tracker.clone());

        let tools: Vec<(String, Arc<dyn RetrievalTool>)> = vec![
            (search.definition().name, Arc::new(search)),
            (outline.definition().name, Arc::new(outline)),
        ];

        Self { tools, tracker }
    }

    /// Definitions in registration order, for the backend request
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, tool)| tool.definition()).collect()
    }

    /// Run a named tool; unknown names come back as error text
    pub async fn dispatch(&self, name: &str, args: &Value) -> String {
        match self.tools.iter().find(|(tool_name, _)| tool_name == name) {
            Some((_, tool)) => tool.invoke(args).await,
            None => format!("Unknown tool: {}", name),
        }
    }

    /// Citations from the most recent successful tool call
    pub fn get_last_sources(&self) -> Vec<Source> {
        self.tracker.snapshot()
    }

    pub fn reset_sources(&self) {
        self.tracker.reset();
    }
}
