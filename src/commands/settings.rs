// Settings commands

use crate::models::{Settings, SettingsOverride};
use crate::storage::AppState;

pub fn get_settings(state: &AppState) -> Settings {
    let settings = state.current_settings();
    tracing::debug!(
        "[get_settings] hideDelayMs: {}, peekPx: {}",
        settings.hide_delay_ms,
        settings.peek_px
    );
    settings
}

pub fn update_settings(state: &AppState, input: &SettingsOverride) -> Result<Settings, String> {
    tracing::info!("[update_settings] Updates: {:?}", input);
    state.update_settings(input).map_err(|e| {
        tracing::error!("[update_settings] {}", e);
        e.to_string()
    })
}

/// Settings rendered as the YAML block stored in config.md
pub fn describe_settings(settings: &Settings) -> Result<String, String> {
    serde_yaml::to_string(settings).map_err(|e| e.to_string())
}
