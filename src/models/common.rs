// Common types shared by the dock controller and its host
// Screen coordinates are integer pixels, origin top-left

use serde::{Deserialize, Serialize};

/// Absolute screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen and widget dimensions the controller lays out against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockGeometry {
    pub screen_width: i32,
    pub screen_height: i32,
    pub width: i32,
    pub height: i32,
}

/// Screen edge the widget is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
    Left,
    Right,
}

impl DockSide {
    /// Side for a widget whose left edge sits at `x`
    pub fn for_x(x: i32, screen_width: i32) -> Self {
        if x < screen_width / 2 { Self::Left } else { Self::Right }
    }
}

/// Retraction level of the dock widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenState {
    #[default]
    None,
    Semi,
    Full,
}

/// Snapshot of the widget's transient state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DockWindowState {
    pub position: Point,
    pub dragging: bool,
    pub hidden: HiddenState,
}

/// Auxiliary windows opened from the dock buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Image,
    Tasks,
    History,
}
