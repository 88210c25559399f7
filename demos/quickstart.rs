//! Minimal end-to-end wiring: an in-memory course store, the Gemini
//! backend, and two queries sharing one session.
//!
//! Requires LECTERN_API_KEY (or GEMINI_API_KEY) to be set.
//!
//! Run with: cargo run --example quickstart

use lectern_core::{
    Config, CourseMetadata, GeminiBackend, GenerationClient, Lesson, MemoryCourseStore,
    QueryOrchestrator,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    config.validate()?;
    println!("lectern config: {}", config.debug_summary());

    let mut store = MemoryCourseStore::new(config.max_results);
    store.add_course(CourseMetadata {
        title: "Introduction to MCP".to_string(),
        course_link: Some("https://example.com/courses/mcp".to_string()),
        instructor: Some("R. Rivera".to_string()),
        lessons: vec![
            Lesson {
                number: 1,
                title: "What is MCP?".to_string(),
                link: Some("https://example.com/courses/mcp/lesson-1".to_string()),
            },
            Lesson {
                number: 2,
                title: "Writing an MCP Server".to_string(),
                link: Some("https://example.com/courses/mcp/lesson-2".to_string()),
            },
        ],
    });
    store.add_chunk(
        "Introduction to MCP",
        Some(1),
        "MCP is an open protocol that standardizes how applications provide \
         context to large language models. It separates the concerns of tool \
         hosting from model integration.",
    );
    store.add_chunk(
        "Introduction to MCP",
        Some(2),
        "An MCP server exposes tools and resources over a transport such as \
         stdio or HTTP. Each tool declares a JSON schema for its arguments.",
    );

    let backend = GeminiBackend::new(&config)?;
    let client = GenerationClient::new(
        Arc::new(backend),
        config.max_tool_rounds,
        config.timeout_secs,
    );
    let orchestrator = QueryOrchestrator::new(&config, Arc::new(store), client);

    let analytics = orchestrator.get_course_analytics().await?;
    println!(
        "Indexed {} course(s): {}",
        analytics.total_courses,
        analytics.course_titles.join(", ")
    );

    let outcome = orchestrator
        .query("What does lesson 1 of the MCP course cover?", None)
        .await?;
    println!("\nAnswer:\n{}", outcome.answer);
    if !outcome.sources.is_empty() {
        println!("\nSources:");
        for source in &outcome.sources {
            match &source.link {
                Some(link) => println!("  - {} ({})", source.text, link),
                None => println!("  - {}", source.text),
            }
        }
    }

    let followup = orchestrator
        .query("And which lesson should I read next?", Some(&outcome.session_id))
        .await?;
    println!("\nFollow-up:\n{}", followup.answer);

    Ok(())
}
