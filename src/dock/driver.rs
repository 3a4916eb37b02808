// Single-threaded loop that feeds the dock controller
// Pointer events arrive over a channel; a fixed-period tick fires timers and polls the cursor

use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::controller::{DockController, HostWindow, PointerEvent};
use crate::models::Point;
use crate::storage::AppState;

/// Source of the absolute cursor position
pub trait PointerSource {
    /// `None` when the position cannot be read right now
    fn cursor_position(&self) -> Option<Point>;
}

/// Handle the host keeps to talk to a running dock loop
#[derive(Clone)]
pub struct DockHandle {
    events: mpsc::UnboundedSender<PointerEvent>,
    cancel: CancellationToken,
}

impl DockHandle {
    /// Forward a pointer event. Returns false once the loop has stopped.
    pub fn send(&self, event: PointerEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Receiving half consumed by [`run_dock_loop`]
pub struct DockInbox {
    events: mpsc::UnboundedReceiver<PointerEvent>,
    cancel: CancellationToken,
}

pub fn dock_channel() -> (DockHandle, DockInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    (
        DockHandle { events: tx, cancel: cancel.clone() },
        DockInbox { events: rx, cancel },
    )
}

/// Drive `controller` until the handle is shut down.
///
/// Meant for a current-thread runtime next to the UI; nothing here is `Send`-bound.
pub async fn run_dock_loop<H, P>(controller: &mut DockController<H>, pointer: &P, mut inbox: DockInbox)
where
    H: HostWindow,
    P: PointerSource + ?Sized,
{
    let period = controller.timings().poll_interval;
    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::info!("[dock] Loop started, polling every {:?}", period);

    loop {
        tokio::select! {
            biased;
            _ = inbox.cancel.cancelled() => break,
            Some(event) = inbox.events.recv() => {
                controller.handle(event, Instant::now().into_std());
            }
            _ = tick.tick() => {
                controller.poll(pointer.cursor_position(), Instant::now().into_std());
            }
        }
    }

    tracing::info!("[dock] Loop stopped");
}

/// Start the dock from the saved settings on a `screen` of (width, height) and run it until
/// the handle is shut down. Returns the controller so the host can read its final state.
pub async fn run_dock<H, P>(
    state: &AppState,
    host: H,
    screen: (i32, i32),
    pointer: &P,
    inbox: DockInbox,
) -> DockController<H>
where
    H: HostWindow,
    P: PointerSource + ?Sized,
{
    let settings = state.current_settings();
    tracing::info!(
        "[run_dock] Screen {}x{}, hideDelayMs: {}, peekPx: {}",
        screen.0,
        screen.1,
        settings.hide_delay_ms,
        settings.peek_px
    );
    let mut controller = DockController::from_settings(host, screen, &settings, Instant::now().into_std());
    run_dock_loop(&mut controller, pointer, inbox).await;
    controller
}
