//! Action dispatch for external callers.
//!
//! The transport that delivers requests (child process, RPC framing) lives
//! outside this crate; whatever it is, it lands here as an action name plus
//! a loosely-typed JSON argument bag and leaves as either a text block or a
//! `BridgeError` with a short machine-readable code.

use serde_json::Value;

use crate::cache;
use crate::config::Config;
use crate::error::BridgeError;
use crate::tasks;

/// Dispatch one action.
pub fn dispatch(config: &Config, action: &str, args: &Value) -> Result<String, BridgeError> {
    match action {
        "refresh" => refresh(config, args),
        "list_tasks" => list_tasks(config, args),
        "task_summary" => task_summary(config),
        "find_tasks" => find_tasks(config, args),
        "list_meetings" => list_meetings(config, args),
        other => Err(BridgeError::unknown_action(other)),
    }
}

fn refresh(config: &Config, args: &Value) -> Result<String, BridgeError> {
    let rebuild = args
        .get("rebuild")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let stats = cache::refresh(config, rebuild).map_err(|e| BridgeError::from(&e))?;
    Ok(format!(
        "Processed {}, skipped {}, pruned {}, total cached: {}",
        stats.processed, stats.skipped, stats.pruned, stats.total
    ))
}

fn list_tasks(config: &Config, args: &Value) -> Result<String, BridgeError> {
    let filter = args
        .get("filter")
        .and_then(Value::as_str)
        .unwrap_or("open");
    let tasks_path = config.tasks_path();

    let selected = match filter {
        "all" => tasks::parse_tasks(&tasks_path),
        "open" => tasks::open_tasks(&tasks_path),
        "overdue" => tasks::overdue_tasks(&tasks_path),
        "p0" => tasks::p0_tasks(&tasks_path),
        other => return Err(BridgeError::invalid_field("filter", other)),
    };

    if selected.is_empty() {
        return Ok("No matching tasks.".to_string());
    }
    Ok(tasks::format_task_block(&selected))
}

fn task_summary(config: &Config) -> Result<String, BridgeError> {
    let summary = tasks::task_summary(&config.tasks_path());
    Ok(format!(
        "{} open of {} total, {} overdue, {} P0",
        summary.open, summary.total, summary.overdue, summary.p0_count
    ))
}

fn find_tasks(config: &Config, args: &Value) -> Result<String, BridgeError> {
    let text = args
        .get("text")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| BridgeError::missing_field("text"))?;

    let found = tasks::find_task_references(text, &config.tasks_path());
    if found.is_empty() {
        return Ok("No matching tasks.".to_string());
    }
    Ok(tasks::format_task_block(&found))
}

fn list_meetings(config: &Config, args: &Value) -> Result<String, BridgeError> {
    let limit = args
        .get("limit")
        .and_then(Value::as_u64)
        .unwrap_or(10) as usize;

    let cached = cache::load_cache(&config.cache_path());
    if cached.meetings.is_empty() {
        return Ok("No cached meetings.".to_string());
    }

    let lines: Vec<String> = cached
        .meetings
        .iter()
        .take(limit)
        .map(|m| {
            format!(
                "- {} {} ({})",
                m.date.as_deref().unwrap_or("undated"),
                m.title,
                m.sentiment.as_str()
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch_config() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_root(dir.path());
        (dir, config)
    }

    #[test]
    fn test_unknown_action() {
        let (_dir, config) = scratch_config();
        let err = dispatch(&config, "explode", &json!({})).unwrap_err();
        assert_eq!(err.code, "unknown_action");
    }

    #[test]
    fn test_find_tasks_requires_text() {
        let (_dir, config) = scratch_config();
        let err = dispatch(&config, "find_tasks", &json!({})).unwrap_err();
        assert_eq!(err.code, "missing_field");

        let err = dispatch(&config, "find_tasks", &json!({"text": "  "})).unwrap_err();
        assert_eq!(err.code, "missing_field");
    }

    #[test]
    fn test_list_tasks_rejects_unknown_filter() {
        let (_dir, config) = scratch_config();
        let err = dispatch(&config, "list_tasks", &json!({"filter": "sideways"})).unwrap_err();
        assert_eq!(err.code, "invalid_field");
    }

    #[test]
    fn test_list_tasks_tolerates_missing_document() {
        let (_dir, config) = scratch_config();
        let out = dispatch(&config, "list_tasks", &json!({})).unwrap();
        assert_eq!(out, "No matching tasks.");
    }

    #[test]
    fn test_task_summary_counts() {
        let (_dir, config) = scratch_config();
        std::fs::create_dir_all(config.tasks_path().parent().unwrap()).unwrap();
        std::fs::write(
            config.tasks_path(),
            "- [ ] One ^task-20260101-001 [P0]\n- [x] Two ^task-20260101-002\n",
        )
        .unwrap();

        let out = dispatch(&config, "task_summary", &json!({})).unwrap();
        assert_eq!(out, "1 open of 2 total, 0 overdue, 1 P0");
    }

    #[test]
    fn test_refresh_through_bridge() {
        let (_dir, config) = scratch_config();
        std::fs::create_dir_all(config.meetings_path()).unwrap();
        std::fs::write(config.meetings_path().join("sync.md"), "# Sync\n").unwrap();

        let out = dispatch(&config, "refresh", &json!({})).unwrap();
        assert!(out.starts_with("Processed 1"));

        let out = dispatch(&config, "list_meetings", &json!({})).unwrap();
        assert!(out.contains("Sync"));
    }

    #[test]
    fn test_list_meetings_empty_cache() {
        let (_dir, config) = scratch_config();
        let out = dispatch(&config, "list_meetings", &json!({})).unwrap();
        assert_eq!(out, "No cached meetings.");
    }
}
