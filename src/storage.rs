// Filesystem layout and shared state for Daily Dock
// Paths are resolved once into AppPaths and handed to each component

use chrono::{Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{DockError, Result};
use crate::images::ImageManager;
use crate::models::{Settings, SettingsOverride, MAX_DELAY_MS};
use crate::task_store::TaskStore;

const APP_DIR_NAME: &str = "daily-dock";

// ============================================
// PATH HELPERS
// ============================================

/// Every directory and file location the app touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub tasks_dir: PathBuf,
    pub images_dir: PathBuf,
    pub chat_logs_dir: PathBuf,
    pub config_path: PathBuf,
    /// OS folder whose launchers run at login
    pub startup_dir: PathBuf,
}

impl AppPaths {
    /// Resolve platform directories, honouring `DAILY_DOCK_DATA_DIR` and
    /// `DAILY_DOCK_CONFIG_DIR`
    pub fn resolve() -> Self {
        let data_dir = std::env::var_os("DAILY_DOCK_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME));
        let config_dir = std::env::var_os("DAILY_DOCK_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join(APP_DIR_NAME)))
            .unwrap_or_else(|| data_dir.clone());

        Self {
            tasks_dir: data_dir.join("tasks"),
            images_dir: data_dir.join("images"),
            chat_logs_dir: data_dir.join("chat_logs"),
            config_path: config_dir.join("config.md"),
            startup_dir: default_startup_dir(),
            data_dir,
        }
    }

    /// Everything rooted under one directory, startup folder included
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.to_path_buf(),
            tasks_dir: root.join("tasks"),
            images_dir: root.join("images"),
            chat_logs_dir: root.join("chat_logs"),
            config_path: root.join("config.md"),
            startup_dir: root.join("startup"),
        }
    }

    /// Re-root the data folders, keeping config and startup locations
    pub fn with_data_dir(self, data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            tasks_dir: data_dir.join("tasks"),
            images_dir: data_dir.join("images"),
            chat_logs_dir: data_dir.join("chat_logs"),
            ..self
        }
    }
}

#[cfg(target_os = "windows")]
fn default_startup_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join("Startup")
}

#[cfg(target_os = "macos")]
fn default_startup_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join("Library").join("LaunchAgents")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_startup_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_default().join("autostart")
}

/// Write through a sibling temp file, then rename over the target
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ============================================
// FRONTMATTER PARSING
// ============================================

/// Parse YAML frontmatter from markdown content
pub fn parse_frontmatter<T: serde::de::DeserializeOwned>(content: &str) -> Option<(T, String)> {
    let content = content.trim();
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let yaml = rest[..end].trim();
    let body = rest[end + 4..].trim().to_string();

    let frontmatter: T = serde_yaml::from_str(yaml).ok()?;
    Some((frontmatter, body))
}

/// Serialize frontmatter + body to markdown
pub fn to_markdown<T: serde::Serialize>(frontmatter: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

// ============================================
// SETTINGS FILE
// ============================================

const CONFIG_BODY: &str = "# Daily Dock\n\nTimings are in milliseconds, distances in pixels.\n";

/// Load settings; a missing or unparsable file yields defaults
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        tracing::debug!("[load_settings] {} does not exist, using defaults", path.display());
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match parse_frontmatter::<Settings>(&content) {
            Some((settings, _)) => settings,
            None => {
                tracing::warn!("[load_settings] Failed to parse frontmatter in {}, using defaults", path.display());
                Settings::default()
            }
        },
        Err(e) => {
            tracing::warn!("[load_settings] Cannot read {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let content = to_markdown(settings, CONFIG_BODY)?;
    write_atomic(path, content.as_bytes())
}

// ============================================
// APP STATE
// ============================================

/// Shared state reached by every command handler
pub struct AppState {
    pub paths: AppPaths,
    pub settings: RwLock<Settings>,
    pub tasks: TaskStore,
    pub images: Mutex<ImageManager>,
}

impl AppState {
    pub fn new(paths: AppPaths) -> Result<Self> {
        Self::open_at(paths, Local::now().date_naive())
    }

    /// State whose task store treats `current_date` as today
    pub fn open_at(paths: AppPaths, current_date: NaiveDate) -> Result<Self> {
        tracing::info!("[AppState::new] Data directory: {}", paths.data_dir.display());

        let settings = load_settings(&paths.config_path);
        let tasks = TaskStore::open_at(&paths, current_date)?;
        let images = ImageManager::new(&paths, settings.default_image.clone())?;

        Ok(Self {
            settings: RwLock::new(settings),
            tasks,
            images: Mutex::new(images),
            paths,
        })
    }

    pub fn current_settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Apply a partial update and persist it
    pub fn update_settings(&self, over: &SettingsOverride) -> Result<Settings> {
        let merged = self.settings.read().with_override(over);
        if merged.peek_px < 0 || merged.peek_px > merged.widget_width {
            return Err(DockError::Config(format!(
                "peekPx must be between 0 and {}",
                merged.widget_width
            )));
        }
        if let Some((name, ms)) = merged.delays_ms().into_iter().find(|&(_, ms)| ms > MAX_DELAY_MS) {
            return Err(DockError::Config(format!(
                "{} must be at most {} (got {})",
                name, MAX_DELAY_MS, ms
            )));
        }
        save_settings(&self.paths.config_path, &merged)?;
        self.images.lock().set_default_image(merged.default_image.clone());
        *self.settings.write() = merged.clone();
        Ok(merged)
    }
}

pub type StorageState = Arc<AppState>;

/// Initialize shared state from resolved paths
pub fn init_state(paths: AppPaths) -> Result<StorageState> {
    Ok(Arc::new(AppState::new(paths)?))
}
