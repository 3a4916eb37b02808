// Dock widget: edge-docking controller, its event loop and the windows it opens

pub mod controller;
pub mod driver;
pub mod windows;

pub use controller::{DockController, HostWindow, PointerEvent};
pub use driver::{dock_channel, run_dock, run_dock_loop, DockHandle, DockInbox, PointerSource};
pub use windows::{AuxWindow, AuxWindows, ImageCarousel, Toggle, WindowSlot};
