// Task commands for the task and history windows

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::Task;
use crate::storage::AppState;
use crate::task_store::{parse_date, DATE_FORMAT};

#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskInfo {
    pub id: u32,
    pub content: String,
    pub created_at: String,
    pub completed: bool,
    pub display: String,
}

impl From<&Task> for TaskInfo {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id,
            content: t.content.clone(),
            created_at: t.created_at.format(crate::models::CREATED_AT_FORMAT).to_string(),
            completed: t.completed,
            display: format_task_line(t),
        }
    }
}

/// `[√] content` / `[ ] content`
pub fn format_task_line(task: &Task) -> String {
    format!("{} {}", task.status_marker(), task.content)
}

pub fn add_task(state: &AppState, content: &str) -> Result<TaskInfo, String> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Task content cannot be empty".to_string());
    }
    tracing::info!("[add_task] Adding to {}", state.tasks.current_date());

    let task = state.tasks.add(content).map_err(|e| e.to_string())?;
    tracing::info!("[add_task] Added task {}", task.id);
    Ok((&task).into())
}

/// Tasks for `date` (defaults to the current date)
pub fn get_tasks(state: &AppState, date: Option<&str>) -> Result<Vec<TaskInfo>, String> {
    let tasks = match date {
        Some(raw) => {
            let date = parse_date(raw).map_err(|e| e.to_string())?;
            state.tasks.get_for(date)
        }
        None => state.tasks.get(),
    }
    .map_err(|e| e.to_string())?;

    tracing::debug!("[get_tasks] Returning {} tasks", tasks.len());
    Ok(tasks.iter().map(TaskInfo::from).collect())
}

pub fn set_task_completed(state: &AppState, id: u32, completed: bool) -> Result<(), String> {
    tracing::info!("[set_task_completed] id: {}, completed: {}", id, completed);
    let found = state
        .tasks
        .update(id, Some(completed), None)
        .map_err(|e| e.to_string())?;
    if !found {
        return Err(format!("Task {} not found", id));
    }
    Ok(())
}

pub fn update_task_content(state: &AppState, id: u32, content: &str) -> Result<(), String> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Task content cannot be empty".to_string());
    }
    tracing::info!("[update_task_content] id: {}", id);

    let found = state
        .tasks
        .update(id, None, Some(content.to_string()))
        .map_err(|e| e.to_string())?;
    if !found {
        return Err(format!("Task {} not found", id));
    }
    Ok(())
}

pub fn delete_task(state: &AppState, id: u32) -> Result<(), String> {
    tracing::info!("[delete_task] id: {}", id);
    let found = state.tasks.delete(id).map_err(|e| e.to_string())?;
    if !found {
        return Err(format!("Task {} not found", id));
    }
    Ok(())
}

pub fn get_history_dates(state: &AppState) -> Result<Vec<String>, String> {
    let dates = state.tasks.list_dates().map_err(|e| e.to_string())?;
    Ok(dates.iter().map(|d| d.format(DATE_FORMAT).to_string()).collect())
}

/// Tasks grouped by date. Missing bounds default to the oldest and newest dates on disk.
pub fn get_history(
    state: &AppState,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<BTreeMap<NaiveDate, Vec<Task>>, String> {
    let dates = state.tasks.list_dates().map_err(|e| e.to_string())?;
    let (Some(&newest), Some(&oldest)) = (dates.first(), dates.last()) else {
        tracing::info!("[get_history] No task files yet");
        return Ok(BTreeMap::new());
    };

    let start = from.map(parse_date).transpose().map_err(|e| e.to_string())?.unwrap_or(oldest);
    let end = to.map(parse_date).transpose().map_err(|e| e.to_string())?.unwrap_or(newest);
    tracing::info!("[get_history] Range {} to {}", start, end);

    state.tasks.get_by_range(start, end).map_err(|e| e.to_string())
}

/// Plain-text history, most recent date first
pub fn format_history(history: &BTreeMap<NaiveDate, Vec<Task>>) -> String {
    let mut out = String::new();
    for (date, tasks) in history.iter().rev() {
        out.push_str(&format!("=== {} ===\n", date.format(DATE_FORMAT)));
        for task in tasks {
            out.push_str(&format_task_line(task));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AppPaths;

    fn state_at(root: &std::path::Path, date: NaiveDate) -> AppState {
        AppState::open_at(AppPaths::under(root), date).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_add_task_rejects_blank_content() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_at(dir.path(), day(5));
        assert!(add_task(&state, "   ").is_err());
        assert!(get_tasks(&state, None).unwrap().is_empty());

        let added = add_task(&state, "  buy milk ").unwrap();
        assert_eq!(added.id, 1);
        assert_eq!(added.content, "buy milk");
        assert_eq!(added.display, "[ ] buy milk");
    }

    #[test]
    fn test_unknown_ids_surface_errors() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_at(dir.path(), day(5));
        add_task(&state, "one").unwrap();

        assert_eq!(delete_task(&state, 7), Err("Task 7 not found".to_string()));
        assert!(set_task_completed(&state, 7, true).is_err());
        assert!(update_task_content(&state, 7, "x").is_err());

        set_task_completed(&state, 1, true).unwrap();
        assert_eq!(get_tasks(&state, None).unwrap()[0].display, "[√] one");
    }

    #[test]
    fn test_get_tasks_for_other_date() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_at(dir.path(), day(5));
        add_task(&state, "today").unwrap();
        assert!(get_tasks(&state, Some("2024-03-04")).unwrap().is_empty());
        assert_eq!(get_tasks(&state, Some("2024-03-05")).unwrap().len(), 1);
        assert!(get_tasks(&state, Some("not-a-date")).is_err());
    }

    #[test]
    fn test_history_defaults_to_full_range_and_renders_descending() {
        let dir = tempfile::tempdir().unwrap();
        let earlier = state_at(dir.path(), day(3));
        add_task(&earlier, "old").unwrap();
        set_task_completed(&earlier, 1, true).unwrap();

        let state = state_at(dir.path(), day(5));
        add_task(&state, "new").unwrap();

        assert_eq!(get_history_dates(&state).unwrap(), vec!["2024-03-05", "2024-03-03"]);

        let history = get_history(&state, None, None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            format_history(&history),
            "=== 2024-03-05 ===\n[ ] new\n\n=== 2024-03-03 ===\n[√] old\n\n"
        );

        let only_new = get_history(&state, Some("2024-03-04"), None).unwrap();
        assert_eq!(only_new.keys().copied().collect::<Vec<_>>(), vec![day(5)]);
    }

    #[test]
    fn test_history_empty_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_at(dir.path(), day(5));
        std::fs::remove_file(state.tasks.file_path(state.tasks.current_date())).unwrap();
        assert!(get_history(&state, None, None).unwrap().is_empty());
        assert_eq!(format_history(&BTreeMap::new()), "");
    }
}
