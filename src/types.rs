//! Data model for the derived vault index.
//!
//! Two pipelines share this module: cached meeting records (persisted as
//! JSON, refreshed incrementally) and ephemeral task records (re-parsed from
//! the task list on every read).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Current on-disk cache schema version.
pub const CACHE_VERSION: u32 = 1;

/// Keyword-derived document sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Mixed => "mixed",
        }
    }
}

/// One extracted meeting document.
///
/// `source_file` is the identity key for upserts; everything else is
/// re-derived whenever the source document changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub date: Option<String>,
    pub title: String,
    pub source_file: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub sentiment: Sentiment,
    pub follow_up_date: Option<String>,
    pub cached_at: String,
}

/// The persisted cache aggregate.
///
/// The top-level JSON keys (`version`, `last_updated`, `meetings`,
/// `_file_mtimes`) are a contract with existing cache files and must
/// round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCache {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub meetings: Vec<MeetingRecord>,
    /// Source file path to last-seen mtime in millis. Keys must stay a
    /// subset of the meeting records' source files after pruning.
    #[serde(rename = "_file_mtimes", default)]
    pub file_mtimes: HashMap<String, i64>,
}

fn default_version() -> u32 {
    CACHE_VERSION
}

impl Default for MeetingCache {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            last_updated: None,
            meetings: Vec::new(),
            file_mtimes: HashMap::new(),
        }
    }
}

/// Task progress state, serialized as the single-letter codes used in the
/// task document conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "n")]
    NotStarted,
    #[serde(rename = "s")]
    Started,
    #[serde(rename = "b")]
    Blocked,
    #[serde(rename = "d")]
    Done,
}

impl TaskStatus {
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::NotStarted => "⬜",
            Self::Started => "🔄",
            Self::Blocked => "🚫",
            Self::Done => "✅",
        }
    }
}

/// Task priority tag. P2 when the line carries no tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    #[default]
    P2,
    P3,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "P0" => Some(Self::P0),
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

/// One line of the task document. Rebuilt on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub pillar: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    /// Reserved for future extraction; always absent today.
    pub context: Option<String>,
}

/// Aggregate counts over the task document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub open: usize,
    pub total: usize,
    pub overdue: usize,
    pub p0_count: usize,
}

/// Outcome counters for one refresh pass, reported on the log stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    pub processed: usize,
    pub skipped: usize,
    pub pruned: usize,
    pub total: usize,
}
