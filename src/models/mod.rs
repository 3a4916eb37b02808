// Models module for Daily Dock
// Task records, settings and the dock's geometry types

pub mod common;
pub mod config;
pub mod task;

pub use common::{DockGeometry, DockSide, DockWindowState, HiddenState, Point, WindowKind};
pub use config::{DockTimings, Settings, SettingsOverride, MAX_DELAY_MS};
pub use task::{Task, TaskFile, CREATED_AT_FORMAT};
