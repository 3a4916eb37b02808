// Task model for date-partitioned storage
// One TaskFile per calendar date; ids are unique within a file, never globally

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp layout used for `created_at` in task files
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub content: String,
    #[serde(with = "created_at_format")]
    pub created_at: NaiveDateTime,
    pub completed: bool,
}

impl Task {
    pub fn new(id: u32, content: String, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            content,
            created_at,
            completed: false,
        }
    }

    /// Checkbox-style marker used by list and history views
    pub fn status_marker(&self) -> &'static str {
        if self.completed { "[√]" } else { "[ ]" }
    }
}

/// On-disk document for one calendar date (`YYYY-MM-DD.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFile {
    pub date: NaiveDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskFile {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            tasks: Vec::new(),
        }
    }

    /// Next id for this file: one past the largest id present.
    /// Equals `len + 1` for a file that has only grown, and never
    /// collides with a surviving record after deletions.
    /// `None` once the largest id is `u32::MAX`.
    pub fn next_id(&self) -> Option<u32> {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

mod created_at_format {
    use super::CREATED_AT_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(CREATED_AT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, CREATED_AT_FORMAT).map_err(serde::de::Error::custom)
    }
}
