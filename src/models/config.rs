// Configuration models for Daily Dock
// Stored as YAML frontmatter in config.md; every field has a default

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for every delay and the poll period (one day)
pub const MAX_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

/// All user-tunable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub initial_delay_ms: u64,
    pub hide_delay_ms: u64,
    pub full_hide_delay_ms: u64,
    pub release_delay_ms: u64,
    pub poll_interval_ms: u64,
    pub edge_trigger_px: i32,
    pub peek_px: i32,
    pub widget_width: i32,
    pub widget_height: i32,
    pub visible_opacity: f64,
    pub image_display_fraction: f64,
    pub default_image: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            hide_delay_ms: 1000,
            full_hide_delay_ms: 3000,
            release_delay_ms: 500,
            poll_interval_ms: 50,
            edge_trigger_px: 2,
            peek_px: 40,
            widget_width: 80,
            widget_height: 100,
            visible_opacity: 0.9,
            image_display_fraction: 0.8,
            default_image: "daily-theme.png".to_string(),
        }
    }
}

/// Timing and geometry constants consumed by the dock controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockTimings {
    pub initial_delay: Duration,
    pub hide_delay: Duration,
    pub full_hide_delay: Duration,
    pub release_delay: Duration,
    pub poll_interval: Duration,
    pub edge_trigger_px: i32,
    pub peek_px: i32,
    pub visible_opacity: f64,
}

impl Default for DockTimings {
    fn default() -> Self {
        Settings::default().dock_timings()
    }
}

/// Partial settings update (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_hide_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peek_px: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
}

impl Settings {
    /// Merge with a partial update
    pub fn with_override(&self, over: &SettingsOverride) -> Self {
        Self {
            initial_delay_ms: over.initial_delay_ms.unwrap_or(self.initial_delay_ms),
            hide_delay_ms: over.hide_delay_ms.unwrap_or(self.hide_delay_ms),
            full_hide_delay_ms: over.full_hide_delay_ms.unwrap_or(self.full_hide_delay_ms),
            release_delay_ms: over.release_delay_ms.unwrap_or(self.release_delay_ms),
            poll_interval_ms: over.poll_interval_ms.unwrap_or(self.poll_interval_ms),
            peek_px: over.peek_px.unwrap_or(self.peek_px),
            visible_opacity: over.visible_opacity.map(|o| o.clamp(0.0, 1.0)).unwrap_or(self.visible_opacity),
            default_image: over.default_image.clone().unwrap_or_else(|| self.default_image.clone()),
            ..self.clone()
        }
    }

    /// Delay fields by their config.md names
    pub fn delays_ms(&self) -> [(&'static str, u64); 5] {
        [
            ("initialDelayMs", self.initial_delay_ms),
            ("hideDelayMs", self.hide_delay_ms),
            ("fullHideDelayMs", self.full_hide_delay_ms),
            ("releaseDelayMs", self.release_delay_ms),
            ("pollIntervalMs", self.poll_interval_ms),
        ]
    }

    /// Durations for the dock controller. Delays are capped at [`MAX_DELAY_MS`]
    /// so deadline arithmetic on `Instant` cannot overflow.
    pub fn dock_timings(&self) -> DockTimings {
        let delay = |ms: u64| Duration::from_millis(ms.min(MAX_DELAY_MS));
        DockTimings {
            initial_delay: delay(self.initial_delay_ms),
            hide_delay: delay(self.hide_delay_ms),
            full_hide_delay: delay(self.full_hide_delay_ms),
            // A zero period would make tokio's interval panic
            poll_interval: delay(self.poll_interval_ms.max(1)),
            release_delay: delay(self.release_delay_ms),
            edge_trigger_px: self.edge_trigger_px,
            peek_px: self.peek_px,
            visible_opacity: self.visible_opacity,
        }
    }
}
