// Login autostart registration
// A launcher file in the OS startup folder; its presence is the on/off state

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::storage::{write_atomic, AppPaths};

#[cfg(target_os = "windows")]
const ENTRY_NAME: &str = "DailyDock.cmd";
#[cfg(target_os = "macos")]
const ENTRY_NAME: &str = "com.dailydock.app.plist";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const ENTRY_NAME: &str = "daily-dock.desktop";

pub struct Autostart {
    startup_dir: PathBuf,
}

impl Autostart {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            startup_dir: paths.startup_dir.clone(),
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.startup_dir.join(ENTRY_NAME)
    }

    pub fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }

    /// Write a launcher for `exe`, replacing any existing one
    pub fn enable(&self, exe: &Path) -> Result<PathBuf> {
        let path = self.entry_path();
        write_atomic(&path, launcher_contents(exe).as_bytes())?;
        tracing::info!("[autostart] Registered {}", path.display());
        Ok(path)
    }

    /// Remove the launcher. Returns false if there was none.
    pub fn disable(&self) -> Result<bool> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        tracing::info!("[autostart] Removed {}", path.display());
        Ok(true)
    }

    /// Flip the registration; returns the new state
    pub fn toggle(&self, exe: &Path) -> Result<bool> {
        if self.is_enabled() {
            self.disable()?;
            Ok(false)
        } else {
            self.enable(exe)?;
            Ok(true)
        }
    }
}

/// Working directory for the launched process: the folder holding the executable
fn working_dir(exe: &Path) -> &Path {
    exe.parent().unwrap_or(exe)
}

#[cfg(target_os = "windows")]
fn launcher_contents(exe: &Path) -> String {
    format!(
        "@echo off\r\ncd /d \"{}\"\r\nstart \"\" \"{}\"\r\n",
        working_dir(exe).display(),
        exe.display()
    )
}

#[cfg(target_os = "macos")]
fn launcher_contents(exe: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>com.dailydock.app</string>
    <key>ProgramArguments</key>
    <array>
        <string>{}</string>
    </array>
    <key>WorkingDirectory</key>
    <string>{}</string>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        exe.display(),
        working_dir(exe).display()
    )
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn launcher_contents(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\nType=Application\nName=Daily Dock\nExec=\"{}\"\nPath={}\nX-GNOME-Autostart-enabled=true\n",
        exe.display(),
        working_dir(exe).display()
    )
}
