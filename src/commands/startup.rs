// Autostart commands

use std::path::Path;

use crate::autostart::Autostart;
use crate::storage::AppState;

pub fn startup_status(state: &AppState) -> bool {
    Autostart::new(&state.paths).is_enabled()
}

pub fn set_startup(state: &AppState, exe: &Path, enabled: bool) -> Result<String, String> {
    let autostart = Autostart::new(&state.paths);
    tracing::info!("[set_startup] enabled: {}", enabled);
    if enabled {
        let entry = autostart.enable(exe).map_err(|e| e.to_string())?;
        Ok(format!("Added to startup ({})", entry.display()))
    } else {
        let removed = autostart.disable().map_err(|e| e.to_string())?;
        Ok(if removed { "Removed from startup" } else { "Startup was not enabled" }.to_string())
    }
}

/// Flip autostart the way the dock's startup button does
pub fn toggle_startup(state: &AppState, exe: &Path) -> Result<String, String> {
    let enabled = Autostart::new(&state.paths).toggle(exe).map_err(|e| {
        tracing::error!("[toggle_startup] {}", e);
        format!("Failed to change startup settings: {}", e)
    })?;
    Ok(if enabled { "Added to startup" } else { "Removed from startup" }.to_string())
}
