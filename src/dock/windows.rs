// Singleton auxiliary windows opened from the dock buttons
// Each kind is either Closed or Open(handle); a second activation closes it

use crate::models::{Point, WindowKind};

/// A native window the dock opened and may later close
pub trait AuxWindow {
    fn close(self);
}

/// Outcome of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Opened,
    Closed,
}

#[derive(Debug)]
pub enum WindowSlot<W> {
    Closed,
    Open(W),
}

impl<W> Default for WindowSlot<W> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<W: AuxWindow> WindowSlot<W> {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn handle(&self) -> Option<&W> {
        match self {
            Self::Open(w) => Some(w),
            Self::Closed => None,
        }
    }

    /// Open through `open` unless already open. A failed open leaves the slot closed.
    pub fn open_with<E>(&mut self, open: impl FnOnce() -> Result<W, E>) -> Result<bool, E> {
        if self.is_open() {
            return Ok(false);
        }
        *self = Self::Open(open()?);
        Ok(true)
    }

    /// Close the window if open
    pub fn close(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Open(w) => {
                w.close();
                true
            }
            Self::Closed => false,
        }
    }

    /// Forget a window the user already closed through the window manager
    pub fn mark_closed(&mut self) {
        *self = Self::Closed;
    }

    pub fn toggle<E>(&mut self, open: impl FnOnce() -> Result<W, E>) -> Result<Toggle, E> {
        if self.close() {
            return Ok(Toggle::Closed);
        }
        self.open_with(open)?;
        Ok(Toggle::Opened)
    }
}

/// One slot per auxiliary window kind
#[derive(Debug)]
pub struct AuxWindows<W> {
    image: WindowSlot<W>,
    tasks: WindowSlot<W>,
    history: WindowSlot<W>,
}

impl<W> Default for AuxWindows<W> {
    fn default() -> Self {
        Self {
            image: WindowSlot::Closed,
            tasks: WindowSlot::Closed,
            history: WindowSlot::Closed,
        }
    }
}

impl<W: AuxWindow> AuxWindows<W> {
    pub fn slot(&self, kind: WindowKind) -> &WindowSlot<W> {
        match kind {
            WindowKind::Image => &self.image,
            WindowKind::Tasks => &self.tasks,
            WindowKind::History => &self.history,
        }
    }

    pub fn slot_mut(&mut self, kind: WindowKind) -> &mut WindowSlot<W> {
        match kind {
            WindowKind::Image => &mut self.image,
            WindowKind::Tasks => &mut self.tasks,
            WindowKind::History => &mut self.history,
        }
    }

    pub fn toggle<E: std::fmt::Display>(
        &mut self,
        kind: WindowKind,
        open: impl FnOnce() -> Result<W, E>,
    ) -> Result<Toggle, E> {
        let result = self.slot_mut(kind).toggle(open);
        match &result {
            Ok(outcome) => tracing::debug!("[toggle_window] {:?} -> {:?}", kind, outcome),
            Err(e) => tracing::warn!("[toggle_window] Opening {:?} failed: {}", kind, e),
        }
        result
    }

    pub fn close_all(&mut self) -> usize {
        [WindowKind::Image, WindowKind::Tasks, WindowKind::History]
            .into_iter()
            .filter(|&kind| self.slot_mut(kind).close())
            .count()
    }
}

// ============================================
// LAYOUT
// ============================================

/// Top-left corner that centers a `width`×`height` window on screen
pub fn centered(width: i32, height: i32, screen_width: i32, screen_height: i32) -> Point {
    Point::new((screen_width - width) / 2, (screen_height - height) / 2)
}

pub const TASK_WINDOW_SIZE: (i32, i32) = (300, 400);
pub const HISTORY_WINDOW_SIZE: (i32, i32) = (500, 600);

/// Size and position of the image viewer for a scaled image.
/// Margins leave room for the scrollbar and, with several images, the navigation bar.
pub fn image_viewer_rect(
    image_width: u32,
    image_height: u32,
    image_count: usize,
    screen_width: i32,
    screen_height: i32,
) -> (Point, (i32, i32)) {
    let nav_height = if image_count > 1 { 40 } else { 0 };
    let max_w = (screen_width as f64 * 0.9) as i32;
    let max_h = (screen_height as f64 * 0.9) as i32;
    let width = (image_width as i32 + 40).min(max_w);
    let height = (image_height as i32 + 20 + nav_height).min(max_h);
    (centered(width, height, screen_width, screen_height), (width, height))
}

/// Index into today's images with wrap-around navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCarousel {
    index: usize,
    total: usize,
}

impl ImageCarousel {
    pub fn new(total: usize) -> Self {
        Self { index: 0, total }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_navigate(&self) -> bool {
        self.total > 1
    }

    pub fn next(&mut self) -> usize {
        if self.can_navigate() {
            self.index = (self.index + 1) % self.total;
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.can_navigate() {
            self.index = (self.index + self.total - 1) % self.total;
        }
        self.index
    }

    /// `i/N`, or `0/0` with nothing to show
    pub fn label(&self) -> String {
        if self.total == 0 {
            return "0/0".to_string();
        }
        format!("{}/{}", self.index + 1, self.total)
    }
}
