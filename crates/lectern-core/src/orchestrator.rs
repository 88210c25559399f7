//! Query orchestration across sessions, tools, and generation

use crate::config::Config;
use crate::error::Result;
use crate::llm::GenerationClient;
use crate::session::SessionStore;
use crate::store::{CourseStore, Source};
use crate::tools::ToolSet;
use serde::Serialize;
use std::sync::Arc;

/// Completed answer for one query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<Source>,
    pub session_id: String,
}

/// Catalog statistics for the analytics surface
#[derive(Debug, Clone, Serialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// Top-level entry point tying together the course store, the session
/// log, and the tool-dispatching generation client.
///
/// Each query gets its own `ToolSet`, so tracked sources cannot leak
/// between concurrent requests. A failed generation records nothing:
/// the session log only ever holds completed exchanges.
pub struct QueryOrchestrator {
    store: Arc<dyn CourseStore>,
    client: GenerationClient,
    sessions: SessionStore,
}

impl QueryOrchestrator {
    pub fn new(config: &Config, store: Arc<dyn CourseStore>, client: GenerationClient) -> Self {
        Self {
            store,
            client,
            sessions: SessionStore::new(config.max_history),
        }
    }

    /// Answer one user query, threading conversation state by session id.
    ///
    /// A missing session id creates a fresh session; the id used either
    /// way is returned in the outcome so the caller can continue the
    /// conversation.
    pub async fn query(&self, text: &str, session_id: Option<&str>) -> Result<QueryOutcome> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => self.sessions.create_session(),
        };

        tracing::info!("Handling query for session {}", session_id);

        let tools = ToolSet::for_store(self.store.clone());
        tools.reset_sources();

        let history = self.sessions.get_history(&session_id);

        let answer = self
            .client
            .generate(text, history.as_deref(), Some(&tools))
            .await?;

        let sources = tools.get_last_sources();
        self.sessions.add_exchange(&session_id, text, &answer);

        tracing::debug!(
            "Query answered for session {} with {} sources",
            session_id,
            sources.len()
        );

        Ok(QueryOutcome {
            answer,
            sources,
            session_id,
        })
    }

    /// Course catalog statistics, titles in store order
    pub async fn get_course_analytics(&self) -> Result<CourseAnalytics> {
        let courses = self.store.get_all_courses_metadata().await?;
        Ok(CourseAnalytics {
            total_courses: courses.len(),
            course_titles: courses.into_iter().map(|course| course.title).collect(),
        })
    }

    /// The session store backing this orchestrator
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
