// Command-line front end over the command handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{image, settings, startup, task};
use crate::dialogs::{report, Notifier};
use crate::models::SettingsOverride;
use crate::storage::AppState;

/// Daily tasks and theme images from the desktop dock, on the command line.
#[derive(Parser, Debug)]
#[command(name = "daily-dock", version, about = "Daily to-do list and theme image dock")]
pub struct Cli {
    /// Directory holding tasks/, images/ and chat_logs/.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Show errors in native dialogs instead of only logging them.
    #[arg(long, global = true)]
    pub dialogs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to today's list.
    Add {
        content: String,
    },

    /// List tasks for today or another date.
    List {
        /// Date as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
    },

    /// Mark a task as completed.
    Done {
        id: u32,
    },

    /// Mark a task as not completed.
    Undo {
        id: u32,
    },

    /// Replace the text of a task.
    Edit {
        id: u32,
        content: String,
    },

    /// Delete a task from today's list.
    Rm {
        id: u32,
    },

    /// Dates that have a task file, most recent first.
    Dates,

    /// Print tasks grouped by date.
    History {
        /// First date (inclusive). Defaults to the oldest file.
        #[arg(long)]
        from: Option<String>,
        /// Last date (inclusive). Defaults to the newest file.
        #[arg(long)]
        to: Option<String>,
    },

    /// Resolve today's theme image.
    Image {
        /// Skip copying the bundled images first.
        #[arg(long)]
        no_stage: bool,
        /// Screen size used for scaling, as WIDTHxHEIGHT.
        #[arg(long, default_value = "1920x1080", value_parser = parse_screen)]
        screen: (i32, i32),
    },

    /// Register or unregister launch at login.
    Autostart {
        #[arg(value_enum)]
        action: AutostartAction,
    },

    /// Show or change settings.
    Settings {
        /// Print settings without changing them.
        #[arg(long)]
        show: bool,
        #[arg(long)]
        initial_delay_ms: Option<u64>,
        #[arg(long)]
        hide_delay_ms: Option<u64>,
        #[arg(long)]
        full_hide_delay_ms: Option<u64>,
        #[arg(long)]
        release_delay_ms: Option<u64>,
        #[arg(long)]
        poll_interval_ms: Option<u64>,
        #[arg(long)]
        peek_px: Option<i32>,
        #[arg(long)]
        opacity: Option<f64>,
        #[arg(long)]
        default_image: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutostartAction {
    On,
    Off,
    Status,
}

fn parse_screen(raw: &str) -> Result<(i32, i32), String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", raw))?;
    let w: i32 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let h: i32 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;
    if w <= 0 || h <= 0 {
        return Err("screen size must be positive".to_string());
    }
    Ok((w, h))
}

/// Run one command and return what should be printed
pub fn execute(state: &AppState, command: Commands) -> Result<String, String> {
    match command {
        Commands::Add { content } => {
            let added = task::add_task(state, &content)?;
            Ok(format!("Added task {}: {}", added.id, added.content))
        }
        Commands::List { date } => {
            let tasks = task::get_tasks(state, date.as_deref())?;
            if tasks.is_empty() {
                return Ok("No tasks".to_string());
            }
            Ok(tasks
                .iter()
                .map(|t| format!("{:>3}  {}", t.id, t.display))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Commands::Done { id } => {
            task::set_task_completed(state, id, true)?;
            Ok(format!("Completed task {}", id))
        }
        Commands::Undo { id } => {
            task::set_task_completed(state, id, false)?;
            Ok(format!("Reopened task {}", id))
        }
        Commands::Edit { id, content } => {
            task::update_task_content(state, id, &content)?;
            Ok(format!("Updated task {}", id))
        }
        Commands::Rm { id } => {
            task::delete_task(state, id)?;
            Ok(format!("Deleted task {}", id))
        }
        Commands::Dates => Ok(task::get_history_dates(state)?.join("\n")),
        Commands::History { from, to } => {
            let history = task::get_history(state, from.as_deref(), to.as_deref())?;
            if history.is_empty() {
                return Ok("No history".to_string());
            }
            Ok(task::format_history(&history).trim_end().to_string())
        }
        Commands::Image { no_stage, screen } => {
            if !no_stage {
                image::stage_bundled_images(state)?;
            }
            let info = image::show_theme_image(state, screen)?;
            Ok(format!(
                "{} ({}x{}, {} for today, viewer {}x{} at {},{})",
                info.path.display(),
                info.width,
                info.height,
                info.images.len(),
                info.viewer_size.0,
                info.viewer_size.1,
                info.viewer_position.x,
                info.viewer_position.y
            ))
        }
        Commands::Autostart { action } => {
            let exe = std::env::current_exe().map_err(|e| e.to_string())?;
            match action {
                AutostartAction::On => startup::set_startup(state, &exe, true),
                AutostartAction::Off => startup::set_startup(state, &exe, false),
                AutostartAction::Status => Ok(if startup::startup_status(state) {
                    "Startup is enabled".to_string()
                } else {
                    "Startup is disabled".to_string()
                }),
            }
        }
        Commands::Settings {
            show,
            initial_delay_ms,
            hide_delay_ms,
            full_hide_delay_ms,
            release_delay_ms,
            poll_interval_ms,
            peek_px,
            opacity,
            default_image,
        } => {
            let input = SettingsOverride {
                initial_delay_ms,
                hide_delay_ms,
                full_hide_delay_ms,
                release_delay_ms,
                poll_interval_ms,
                peek_px,
                visible_opacity: opacity,
                default_image,
            };
            let current = if show || input_is_empty(&input) {
                settings::get_settings(state)
            } else {
                settings::update_settings(state, &input)?
            };
            settings::describe_settings(&current)
        }
    }
}

fn input_is_empty(input: &SettingsOverride) -> bool {
    input.initial_delay_ms.is_none()
        && input.hide_delay_ms.is_none()
        && input.full_hide_delay_ms.is_none()
        && input.release_delay_ms.is_none()
        && input.poll_interval_ms.is_none()
        && input.peek_px.is_none()
        && input.visible_opacity.is_none()
        && input.default_image.is_none()
}

/// Execute and print; errors go through `notifier`. Returns whether the command succeeded.
pub fn execute_and_print(state: &AppState, command: Commands, notifier: &dyn Notifier) -> bool {
    match report(notifier, "Daily Dock", execute(state, command)) {
        Some(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::AppPaths;
    use chrono::NaiveDate;

    fn state(root: &std::path::Path) -> AppState {
        AppState::open_at(AppPaths::under(root), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()).unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("daily-dock").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = parse(&["list", "--date", "2024-03-01", "--data-dir", "/tmp/dd"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/dd")));
        assert!(matches!(cli.command, Commands::List { date: Some(ref d) } if d == "2024-03-01"));
    }

    #[test]
    fn test_parse_screen() {
        assert_eq!(parse_screen("1280x720"), Ok((1280, 720)));
        assert!(parse_screen("1280").is_err());
        assert!(parse_screen("0x720").is_err());
        let cli = parse(&["image", "--screen", "800X600", "--no-stage"]);
        assert!(matches!(cli.command, Commands::Image { no_stage: true, screen: (800, 600) }));
    }

    #[test]
    fn test_task_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        assert_eq!(execute(&state, parse(&["add", "buy milk"]).command).unwrap(), "Added task 1: buy milk");
        execute(&state, parse(&["add", "call mom"]).command).unwrap();
        execute(&state, parse(&["done", "2"]).command).unwrap();
        execute(&state, parse(&["rm", "1"]).command).unwrap();

        assert_eq!(execute(&state, parse(&["list"]).command).unwrap(), "  2  [√] call mom");
        assert_eq!(
            execute(&state, parse(&["history"]).command).unwrap(),
            "=== 2024-03-05 ===\n[√] call mom"
        );
        assert!(execute(&state, parse(&["add", "  "]).command).is_err());
        assert!(execute(&state, parse(&["rm", "9"]).command).is_err());
    }

    #[test]
    fn test_settings_show_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());

        let shown = execute(&state, parse(&["settings"]).command).unwrap();
        assert!(shown.contains("peekPx: 40"));

        let updated = execute(&state, parse(&["settings", "--peek-px", "20"]).command).unwrap();
        assert!(updated.contains("peekPx: 20"));
        assert!(execute(&state, parse(&["settings", "--peek-px", "500"]).command).is_err());

        let delayed = execute(&state, parse(&["settings", "--initial-delay-ms", "2500"]).command).unwrap();
        assert!(delayed.contains("initialDelayMs: 2500"));
        assert_eq!(state.current_settings().initial_delay_ms, 2500);
    }
}
