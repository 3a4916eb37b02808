// Edge-docking state machine for the floating widget
// Timers are deadlines checked on each poll; the controller owns the geometry it writes

use std::time::Instant;

use crate::models::{DockGeometry, DockSide, DockTimings, DockWindowState, HiddenState, Point, Settings};

/// Offset of the launch position from the right screen edge
const LAUNCH_EDGE_OFFSET: i32 = 30;

/// The native window the controller drives. Writes are fire-and-forget.
pub trait HostWindow {
    fn set_position(&mut self, position: Point);
    fn set_opacity(&mut self, opacity: f64);
}

/// Pointer input delivered by the host's event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
    /// Primary button down at an absolute screen position
    Press(Point),
    /// Pointer moved to an absolute screen position
    Motion(Point),
    Release,
}

pub struct DockController<H: HostWindow> {
    host: H,
    geometry: DockGeometry,
    timings: DockTimings,
    state: DockWindowState,
    last_pointer: Point,
    semi_hide_at: Option<Instant>,
    full_hide_at: Option<Instant>,
}

impl<H: HostWindow> DockController<H> {
    /// Place the widget at its launch position and schedule the first retraction
    pub fn new(mut host: H, geometry: DockGeometry, timings: DockTimings, now: Instant) -> Self {
        let position = Point::new(
            geometry.screen_width - LAUNCH_EDGE_OFFSET,
            geometry.screen_height / 2,
        );
        host.set_position(position);
        host.set_opacity(timings.visible_opacity);

        Self {
            host,
            geometry,
            timings,
            state: DockWindowState {
                position,
                ..Default::default()
            },
            last_pointer: Point::default(),
            semi_hide_at: Some(now + timings.initial_delay),
            full_hide_at: None,
        }
    }

    /// Controller sized and timed from persisted settings for a `screen` of (width, height)
    pub fn from_settings(host: H, screen: (i32, i32), settings: &Settings, now: Instant) -> Self {
        let geometry = DockGeometry {
            screen_width: screen.0,
            screen_height: screen.1,
            width: settings.widget_width,
            height: settings.widget_height,
        };
        Self::new(host, geometry, settings.dock_timings(), now)
    }

    pub fn geometry(&self) -> DockGeometry {
        self.geometry
    }

    pub fn state(&self) -> DockWindowState {
        self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn timings(&self) -> &DockTimings {
        &self.timings
    }

    /// Side the widget would dock to if a transition fired now
    pub fn side(&self) -> DockSide {
        DockSide::for_x(self.state.position.x, self.geometry.screen_width)
    }

    pub fn visible_x(&self, side: DockSide) -> i32 {
        match side {
            DockSide::Left => 0,
            DockSide::Right => self.geometry.screen_width - self.geometry.width,
        }
    }

    pub fn semi_hidden_x(&self, side: DockSide) -> i32 {
        match side {
            DockSide::Left => self.timings.peek_px - self.geometry.width,
            DockSide::Right => self.geometry.screen_width - self.timings.peek_px,
        }
    }

    /// Earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.semi_hide_at, self.full_hide_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ============================================
    // INPUT
    // ============================================

    pub fn handle(&mut self, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Enter => self.pointer_enter(),
            PointerEvent::Leave => self.pointer_leave(now),
            PointerEvent::Press(at) => self.press(at),
            PointerEvent::Motion(at) => self.motion(at),
            PointerEvent::Release => self.release(now),
        }
    }

    /// Cancel pending hides and bring the widget fully into view
    pub fn pointer_enter(&mut self) {
        self.cancel_timers();
        self.show();
    }

    pub fn pointer_leave(&mut self, now: Instant) {
        if self.state.dragging {
            return;
        }
        self.semi_hide_at = Some(now + self.timings.hide_delay);
    }

    pub fn press(&mut self, at: Point) {
        self.state.dragging = true;
        self.last_pointer = at;
        self.cancel_timers();
    }

    pub fn motion(&mut self, at: Point) {
        if !self.state.dragging {
            return;
        }
        let dx = at.x - self.last_pointer.x;
        let dy = at.y - self.last_pointer.y;
        self.last_pointer = at;
        self.move_to(Point::new(self.state.position.x + dx, self.state.position.y + dy));
    }

    pub fn release(&mut self, now: Instant) {
        if !self.state.dragging {
            return;
        }
        self.state.dragging = false;
        self.semi_hide_at = Some(now + self.timings.release_delay);
    }

    /// Fire due timers, then reveal a fully hidden widget when the pointer
    /// touches either screen edge
    pub fn poll(&mut self, pointer: Option<Point>, now: Instant) {
        if self.semi_hide_at.is_some_and(|at| at <= now) {
            self.semi_hide_at = None;
            self.semi_hide(now);
        }
        if self.full_hide_at.is_some_and(|at| at <= now) {
            self.full_hide_at = None;
            self.full_hide();
        }

        if self.state.hidden != HiddenState::Full {
            return;
        }
        let Some(pointer) = pointer else {
            return;
        };
        let edge = self.timings.edge_trigger_px;
        if pointer.x <= edge || pointer.x >= self.geometry.screen_width - edge {
            tracing::debug!("[dock] Pointer at screen edge ({}), revealing", pointer.x);
            self.show();
        }
    }

    // ============================================
    // TRANSITIONS
    // ============================================

    fn show(&mut self) {
        if self.state.dragging {
            return;
        }
        let x = self.visible_x(self.side());
        self.move_to(Point::new(x, self.state.position.y));
        if self.state.hidden == HiddenState::Full {
            self.host.set_opacity(self.timings.visible_opacity);
        }
        self.state.hidden = HiddenState::None;
    }

    fn semi_hide(&mut self, now: Instant) {
        if self.state.dragging {
            return;
        }
        let x = self.semi_hidden_x(self.side());
        self.move_to(Point::new(x, self.state.position.y));
        if self.state.hidden == HiddenState::Full {
            // Re-hiding from full keeps the widget invisible
            return;
        }
        self.state.hidden = HiddenState::Semi;
        self.full_hide_at = Some(now + self.timings.full_hide_delay);
    }

    fn full_hide(&mut self) {
        if self.state.dragging || self.state.hidden != HiddenState::Semi {
            return;
        }
        self.state.hidden = HiddenState::Full;
        self.host.set_opacity(0.0);
    }

    fn move_to(&mut self, position: Point) {
        self.state.position = position;
        self.host.set_position(position);
    }

    fn cancel_timers(&mut self) {
        self.semi_hide_at = None;
        self.full_hide_at = None;
    }
}
