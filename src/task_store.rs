// Date-partitioned task storage
// One JSON document per calendar date under tasks/, whole-file read-modify-write

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DockError, Result};
use crate::models::{Task, TaskFile};
use crate::storage::{write_atomic, AppPaths};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date as used in file names and CLI arguments
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| DockError::InvalidDate(raw.to_string()))
}

/// CRUD over the per-date task files.
///
/// The "current" date is captured when the store is opened and is never
/// re-derived, so a process left running past midnight keeps writing to the
/// previous day's file. Mutations only ever target the current date.
pub struct TaskStore {
    tasks_dir: PathBuf,
    current_date: NaiveDate,
}

impl TaskStore {
    /// Open the store with an explicit current date, creating its file if absent
    pub fn open_at(paths: &AppPaths, current_date: NaiveDate) -> Result<Self> {
        fs::create_dir_all(&paths.tasks_dir)?;
        let store = Self {
            tasks_dir: paths.tasks_dir.clone(),
            current_date,
        };

        let current = store.file_path(current_date);
        if !current.exists() {
            tracing::debug!("[TaskStore::open] Creating empty task file {}", current.display());
            store.save(&TaskFile::new(current_date))?;
        }
        Ok(store)
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        self.tasks_dir.join(format!("{}.json", date.format(DATE_FORMAT)))
    }

    // ============================================
    // OPERATIONS
    // ============================================

    /// Append a task to the current date's file. Content is stored as given.
    pub fn add(&self, content: &str) -> Result<Task> {
        self.add_at(content, Local::now().naive_local())
    }

    pub(crate) fn add_at(&self, content: &str, created_at: NaiveDateTime) -> Result<Task> {
        let mut file = self.load_current()?;
        // Second precision, matching the on-disk format
        let created_at = created_at.with_nanosecond(0).unwrap_or(created_at);
        let id = file.next_id().ok_or(DockError::IdsExhausted(file.date))?;
        let task = Task::new(id, content.to_string(), created_at);
        file.tasks.push(task.clone());
        self.save(&file)?;

        tracing::info!("[add_task] Added task {} for {}", task.id, file.date);
        Ok(task)
    }

    /// Tasks for the current date, in insertion order
    pub fn get(&self) -> Result<Vec<Task>> {
        self.get_for(self.current_date)
    }

    /// Tasks for `date`; a missing file reads as empty and is not created
    pub fn get_for(&self, date: NaiveDate) -> Result<Vec<Task>> {
        let path = self.file_path(date);
        if !path.exists() {
            return Ok(Vec::new());
        }
        Ok(read_task_file(&path)?.tasks)
    }

    /// Apply the provided fields to task `id` in the current date's file.
    /// Returns `false` when no such task exists.
    pub fn update(&self, id: u32, completed: Option<bool>, content: Option<String>) -> Result<bool> {
        let mut file = self.load_current()?;
        let Some(task) = file.find_mut(id) else {
            tracing::debug!("[update_task] No task {} on {}", id, self.current_date);
            return Ok(false);
        };

        if let Some(completed) = completed {
            task.completed = completed;
        }
        if let Some(content) = content {
            task.content = content;
        }
        self.save(&file)?;
        Ok(true)
    }

    /// Remove task `id` from the current date's file.
    /// Returns `false`, without touching the file, when nothing matched.
    pub fn delete(&self, id: u32) -> Result<bool> {
        let mut file = self.load_current()?;
        let before = file.tasks.len();
        file.tasks.retain(|t| t.id != id);
        if file.tasks.len() == before {
            return Ok(false);
        }

        self.save(&file)?;
        tracing::info!("[delete_task] Deleted task {} from {}", id, file.date);
        Ok(true)
    }

    /// Dates that have a task file, most recent first
    pub fn list_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::new();
        for entry in fs::read_dir(&self.tasks_dir)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // chrono also accepts `2024-3-5`; only canonical names are readable by get_for
            match NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                Ok(date) if date.format(DATE_FORMAT).to_string() == stem => dates.push(date),
                _ => continue,
            }
        }

        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }

    /// Task lists for every date with a file in `[start, end]`.
    /// Reversed bounds are swapped.
    pub fn get_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<BTreeMap<NaiveDate, Vec<Task>>> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        let mut result = BTreeMap::new();
        for date in self.list_dates()? {
            if date < start || date > end {
                continue;
            }
            result.insert(date, self.get_for(date)?);
        }
        Ok(result)
    }

    // ============================================
    // FILE I/O
    // ============================================

    /// Load the current file; one deleted since open reads as empty
    fn load_current(&self) -> Result<TaskFile> {
        let path = self.file_path(self.current_date);
        if !path.exists() {
            return Ok(TaskFile::new(self.current_date));
        }
        read_task_file(&path)
    }

    fn save(&self, file: &TaskFile) -> Result<()> {
        write_atomic(&self.file_path(file.date), &to_pretty_json(file)?)
    }
}

fn read_task_file(path: &Path) -> Result<TaskFile> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        tracing::error!("[read_task_file] Corrupt task file {}: {}", path.display(), e);
        DockError::Json(e)
    })
}

/// Four-space indented JSON, non-ASCII written verbatim
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CREATED_AT_FORMAT;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn store_at(dir: &Path, today: &str) -> TaskStore {
        TaskStore::open_at(&AppPaths::under(dir), date(today)).unwrap()
    }

    #[test]
    fn test_open_creates_current_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        let raw = fs::read_to_string(store.file_path(date("2024-03-05"))).unwrap();
        let file: TaskFile = serde_json::from_str(&raw).unwrap();
        assert_eq!(file, TaskFile::new(date("2024-03-05")));
    }

    #[test]
    fn test_sequential_ids_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        for content in ["a", "b", "c", "d"] {
            store.add(content).unwrap();
        }
        let tasks = store.get().unwrap();
        let ids: Vec<u32> = tasks.iter().map(|t| t.id).collect();
        let contents: Vec<&str> = tasks.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(contents, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_buy_milk_example() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        let now = NaiveDateTime::parse_from_str("2024-03-05 09:00:00", CREATED_AT_FORMAT).unwrap();

        let first = store.add_at("buy milk", now).unwrap();
        assert_eq!(first, Task::new(1, "buy milk".to_string(), now));
        let second = store.add_at("call mom", now).unwrap();
        assert_eq!(second.id, 2);

        assert!(store.delete(1).unwrap());
        let remaining = store.get().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
        assert_eq!(remaining[0].content, "call mom");
    }

    #[test]
    fn test_add_does_not_validate_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        assert_eq!(store.add("   ").unwrap().content, "   ");
    }

    #[test]
    fn test_delete_then_add_never_duplicates_an_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        for content in ["a", "b", "c"] {
            store.add(content).unwrap();
        }
        store.delete(1).unwrap();
        let added = store.add("d").unwrap();
        assert_eq!(added.id, 4);

        let ids: Vec<u32> = store.get().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_add_after_max_id_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        let path = store.file_path(date("2024-03-05"));
        fs::write(
            &path,
            r#"{"date": "2024-03-05", "tasks": [{"id": 4294967295, "content": "x", "created_at": "2024-03-05 08:00:00", "completed": false}]}"#,
        )
        .unwrap();
        let before = fs::read(&path).unwrap();

        let err = store.add("y").unwrap_err();
        assert!(matches!(err, DockError::IdsExhausted(d) if d == date("2024-03-05")));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_delete_missing_id_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        store.add("a").unwrap();
        store.add("b").unwrap();
        let path = store.file_path(date("2024-03-05"));
        let before = fs::read(&path).unwrap();

        assert!(!store.delete(42).unwrap());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_delete_keeps_other_records_intact() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        let a = store.add("a").unwrap();
        store.add("b").unwrap();
        let c = store.add("c").unwrap();

        assert!(store.delete(2).unwrap());
        assert_eq!(store.get().unwrap(), vec![a, c]);
    }

    #[test]
    fn test_update_completed_only_touches_that_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        let original = store.add("water plants").unwrap();
        store.add("other").unwrap();

        assert!(store.update(1, Some(true), None).unwrap());
        let tasks = store.get().unwrap();
        assert!(tasks[0].completed);
        assert_eq!(tasks[0].content, original.content);
        assert_eq!(tasks[0].created_at, original.created_at);
        assert!(!tasks[1].completed);
    }

    #[test]
    fn test_update_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        store.add("draft").unwrap();
        assert!(store.update(1, None, Some("final".to_string())).unwrap());
        let task = &store.get().unwrap()[0];
        assert_eq!(task.content, "final");
        assert!(!task.completed);
    }

    #[test]
    fn test_update_missing_id_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        assert!(!store.update(7, Some(true), None).unwrap());
    }

    #[test]
    fn test_get_missing_date_has_no_side_effect() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        let other = date("2023-12-31");
        assert!(store.get_for(other).unwrap().is_empty());
        assert!(!store.file_path(other).exists());
    }

    #[test]
    fn test_list_dates_most_recent_first_and_ignores_strays() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(dir.path());
        for day in ["2024-03-01", "2024-03-03"] {
            TaskStore::open_at(&paths, date(day)).unwrap();
        }
        fs::write(paths.tasks_dir.join("notes.txt"), "x").unwrap();
        fs::write(paths.tasks_dir.join("backup.json"), "{}").unwrap();

        let store = TaskStore::open_at(&paths, date("2024-03-02")).unwrap();
        assert_eq!(
            store.list_dates().unwrap(),
            vec![date("2024-03-03"), date("2024-03-02"), date("2024-03-01")]
        );
    }

    #[test]
    fn test_list_dates_skips_unpadded_names() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(dir.path());
        let store = TaskStore::open_at(&paths, date("2024-03-05")).unwrap();
        fs::write(paths.tasks_dir.join("2024-3-5.json"), r#"{"date": "2024-03-05", "tasks": []}"#).unwrap();
        fs::write(paths.tasks_dir.join("2024-3-4.json"), r#"{"date": "2024-03-04", "tasks": []}"#).unwrap();

        assert_eq!(store.list_dates().unwrap(), vec![date("2024-03-05")]);
    }

    #[test]
    fn test_get_by_range_inclusive_and_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(dir.path());
        for day in ["2024-02-28", "2024-03-01", "2024-03-03", "2024-03-06"] {
            TaskStore::open_at(&paths, date(day)).unwrap().add(day).unwrap();
        }
        let store = TaskStore::open_at(&paths, date("2024-03-06")).unwrap();

        let range = store.get_by_range(date("2024-03-01"), date("2024-03-03")).unwrap();
        let keys: Vec<NaiveDate> = range.keys().copied().collect();
        assert_eq!(keys, vec![date("2024-03-01"), date("2024-03-03")]);
        assert_eq!(range[&date("2024-03-01")][0].content, "2024-03-01");

        let reversed = store.get_by_range(date("2024-03-03"), date("2024-03-01")).unwrap();
        assert_eq!(reversed, range);
    }

    #[test]
    fn test_mutations_target_the_open_date_only() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(dir.path());
        TaskStore::open_at(&paths, date("2024-03-04")).unwrap().add("yesterday").unwrap();

        let store = TaskStore::open_at(&paths, date("2024-03-05")).unwrap();
        assert!(!store.update(1, Some(true), None).unwrap());
        assert!(!store.delete(1).unwrap());
        assert!(!store.get_for(date("2024-03-04")).unwrap()[0].completed);
    }

    #[test]
    fn test_file_layout_uses_four_space_indent_and_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        store.add("买牛奶").unwrap();
        let raw = fs::read_to_string(store.file_path(date("2024-03-05"))).unwrap();
        assert!(raw.starts_with("{\n    \"date\": \"2024-03-05\""));
        assert!(raw.contains("买牛奶"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), "2024-03-05");
        fs::write(store.file_path(date("2024-03-05")), "{ not json").unwrap();
        assert!(matches!(store.add("x"), Err(DockError::Json(_))));
        assert!(matches!(store.get(), Err(DockError::Json(_))));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-03-05 ").unwrap(), date("2024-03-05"));
        assert!(matches!(parse_date("03/05/2024"), Err(DockError::InvalidDate(_))));
    }
}
