//! Task list parsing and derived queries.
//!
//! The task document is a flat checkbox list, one task per line:
//!
//! ```text
//! - [ ] Task title ^task-20260204-001 [P1] due:2026-02-10 pillar:infra
//! ```
//!
//! Trailing tags are order-sensitive suffix annotations. Every query
//! re-parses the document; nothing here is cached, and a missing document
//! reads as an empty list.

use std::path::Path;

use chrono::Utc;
use regex::Regex;

use crate::types::{Priority, TaskRecord, TaskStatus, TaskSummary};
use crate::util;

/// Words that signal the text is actually discussing tasks, gating the
/// fuzzy title match in [`find_task_references`].
const TASK_TRIGGER_WORDS: &[&str] = &["task", "todo", "action item"];

/// Maximum number of tasks returned by a reference lookup.
const MAX_REFERENCES: usize = 5;

/// Parse every task line in the document.
///
/// Missing document yields an empty list, never an error.
pub fn parse_tasks(tasks_path: &Path) -> Vec<TaskRecord> {
    let Ok(content) = std::fs::read_to_string(tasks_path) else {
        return Vec::new();
    };
    parse_task_lines(&content)
}

fn parse_task_lines(content: &str) -> Vec<TaskRecord> {
    let line_re = Regex::new(
        r"(?m)^- \[([ xX])\] (.+?)(?:\s+\^(task-\d{8}-\d{3}))?(?:\s+\[(P[0-3])\])?(?:\s+due:(\d{4}-\d{2}-\d{2}))?(?:\s+pillar:([^\n]+))?$",
    )
    .unwrap();

    let mut tasks = Vec::new();
    for caps in line_re.captures_iter(content) {
        let checkbox = &caps[1];
        let raw_title = &caps[2];
        let title_lower = raw_title.to_lowercase();

        let status = if checkbox.eq_ignore_ascii_case("x") {
            TaskStatus::Done
        } else if title_lower.contains("[blocked]") || title_lower.contains("blocked:") {
            TaskStatus::Blocked
        } else if title_lower.contains("[started]") || title_lower.contains("wip") {
            TaskStatus::Started
        } else {
            TaskStatus::NotStarted
        };

        tasks.push(TaskRecord {
            id: caps
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(generate_task_id),
            title: clean_task_title(raw_title),
            status,
            priority: caps
                .get(4)
                .and_then(|m| Priority::parse(m.as_str()))
                .unwrap_or_default(),
            pillar: caps.get(6).map(|m| m.as_str().trim().to_string()),
            due_date: caps.get(5).map(|m| m.as_str().to_string()),
            context: None,
        });
    }
    tasks
}

/// Remove status markers from a title after status has been derived.
fn clean_task_title(title: &str) -> String {
    let markers_re = Regex::new(r"(?i)\[blocked\]|\[started\]|blocked:|wip").unwrap();
    let spaces_re = Regex::new(r"\s+").unwrap();
    let cleaned = markers_re.replace_all(title, "");
    spaces_re.replace_all(&cleaned, " ").trim().to_string()
}

/// Synthesize an id for a line that carries none.
///
/// Time-based modulo counter, weakly collision-resistant. Good enough for
/// interactive task creation rates; not globally unique.
fn generate_task_id() -> String {
    let date = Utc::now().format("%Y%m%d");
    let counter = (Utc::now().timestamp_millis() % 900) + 100;
    format!("task-{}-{:03}", date, counter)
}

/// Tasks not yet done.
pub fn open_tasks(tasks_path: &Path) -> Vec<TaskRecord> {
    parse_tasks(tasks_path)
        .into_iter()
        .filter(|t| t.status != TaskStatus::Done)
        .collect()
}

/// Open tasks whose due date has passed.
pub fn overdue_tasks(tasks_path: &Path) -> Vec<TaskRecord> {
    let today = util::today_iso();
    open_tasks(tasks_path)
        .into_iter()
        .filter(|t| t.due_date.as_deref().map_or(false, |d| d < today.as_str()))
        .collect()
}

/// Open tasks tagged P0.
pub fn p0_tasks(tasks_path: &Path) -> Vec<TaskRecord> {
    open_tasks(tasks_path)
        .into_iter()
        .filter(|t| t.priority == Priority::P0)
        .collect()
}

/// Aggregate counts for status displays.
pub fn task_summary(tasks_path: &Path) -> TaskSummary {
    let all = parse_tasks(tasks_path);
    let today = util::today_iso();
    let open: Vec<&TaskRecord> = all.iter().filter(|t| t.status != TaskStatus::Done).collect();

    TaskSummary {
        open: open.len(),
        total: all.len(),
        overdue: open
            .iter()
            .filter(|t| t.due_date.as_deref().map_or(false, |d| d < today.as_str()))
            .count(),
        p0_count: open.iter().filter(|t| t.priority == Priority::P0).count(),
    }
}

/// Find tasks referenced by arbitrary free text.
///
/// Exact id matches are always included. When the text contains a task
/// trigger word, tasks sharing at least two title words longer than three
/// characters with the text are added as well. Heuristic; capped at
/// [`MAX_REFERENCES`], first-found order.
pub fn find_task_references(text: &str, tasks_path: &Path) -> Vec<TaskRecord> {
    let all = parse_tasks(tasks_path);
    let text_lower = text.to_lowercase();
    let mut found: Vec<TaskRecord> = Vec::new();

    let id_re = Regex::new(r"task-\d{8}-\d{3}").unwrap();
    for id_match in id_re.find_iter(text) {
        if let Some(task) = all.iter().find(|t| t.id == id_match.as_str()) {
            if !found.iter().any(|f| f.id == task.id) {
                found.push(task.clone());
            }
        }
    }

    if TASK_TRIGGER_WORDS.iter().any(|w| text_lower.contains(w)) {
        for task in &all {
            let matched_words = task
                .title
                .to_lowercase()
                .split_whitespace()
                .filter(|word| word.len() > 3 && text_lower.contains(*word))
                .count();
            if matched_words >= 2 && !found.iter().any(|f| f.id == task.id) {
                found.push(task.clone());
            }
        }
    }

    found.truncate(MAX_REFERENCES);
    found
}

/// Render tasks as a human-readable block: a heading, then one group per
/// task with glyph, priority, title, due date, pillar, and id.
pub fn format_task_block(tasks: &[TaskRecord]) -> String {
    if tasks.is_empty() {
        return String::new();
    }

    let mut lines = vec!["## Referenced Tasks".to_string()];
    for task in tasks {
        let mut line = format!(
            "\n- {} **[{}]** {}",
            task.status.glyph(),
            task.priority.as_str(),
            task.title
        );
        if let Some(due) = &task.due_date {
            line.push_str(&format!(" (due: {})", due));
        }
        if let Some(pillar) = &task.pillar {
            line.push_str(&format!(" [{}]", pillar));
        }
        line.push_str(&format!("\n  ID: `{}`", task.id));
        lines.push(line);
    }
    lines.join("\n")
}
