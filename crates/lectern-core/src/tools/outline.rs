//! Course outline tool

use super::{RetrievalTool, SourceTracker, ToolDefinition};
use crate::resolver::resolve_course_title;
use crate::store::{CourseStore, Source};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Returns a course's outline: title, instructor, link, and its
/// numbered lesson list. Records the matched course as the single
/// tracked citation.
pub struct CourseOutlineTool {
    store: Arc<dyn CourseStore>,
    tracker: SourceTracker,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn CourseStore>, tracker: SourceTracker) -> Self {
        Self { store, tracker }
    }
}

#[async_trait]
impl RetrievalTool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_course_outline".to_string(),
            description: "Get a course's outline: title, link, and its numbered lesson list"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "course_title": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_title"]
            }),
        }
    }

    async fn invoke(&self, args: &Value) -> String {
        let fragment = match args.get("course_title").and_then(|v| v.as_str()) {
            Some(t) if !t.trim().is_empty() => t,
            _ => return "A course title is required.".to_string(),
        };

        tracing::debug!("Resolving course outline for {:?}", fragment);

        let courses = match self.store.get_all_courses_metadata().await {
            Ok(courses) => courses,
            Err(e) => return format!("Failed to load the course catalog: {}", e),
        };

        let titles: Vec<&str> = courses.iter().map(|c| c.title.as_str()).collect();
        let course = resolve_course_title(fragment, &titles)
            .and_then(|title| courses.iter().find(|c| c.title == title));

        let Some(course) = course else {
            return format!(
                "No course found matching '{}'. Available courses: {}",
                fragment,
                titles.join(", ")
            );
        };

        let mut out = format!("Course: {}\n", course.title);
        out.push_str(&format!(
            "Instructor: {}\n",
            course.instructor.as_deref().unwrap_or("Unknown")
        ));
        if let Some(ref link) = course.course_link {
            out.push_str(&format!("Course link: {}\n", link));
        }

        if course.lessons.is_empty() {
            out.push_str("No lessons listed for this course.");
        } else {
            out.push_str(&format!("Lessons ({}):\n", course.lessons.len()));
            let lines: Vec<String> = course
                .lessons
                .iter()
                .map(|lesson| match &lesson.link {
                    Some(link) => format!("{}. {} - {}", lesson.number, lesson.title, link),
                    None => format!("{}. {}", lesson.number, lesson.title),
                })
                .collect();
            out.push_str(&lines.join("\n"));
        }

        self.tracker.record(vec![Source {
            text: course.title.clone(),
            link: course.course_link.clone(),
        }]);

        out
    }
}
